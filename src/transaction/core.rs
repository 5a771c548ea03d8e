//! Defines the core data models for transactions.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::auth::UserId;

/// The format of transaction dates on the wire and in forms, e.g. "2024-01-15".
pub(crate) const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// The data store's identifier for a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Wrap the data store's identifier for a transaction.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether money was earned or spent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a salary payment.
    #[default]
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in forms and by the data store.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => f.write_str("Income"),
            TransactionType::Expense => f.write_str("Expense"),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, assigned by the data store.
    pub id: TransactionId,
    /// The user who owns the transaction.
    pub user_id: UserId,
    /// The amount of money spent or earned, always greater than zero.
    pub amount: f64,
    /// Whether the amount was earned or spent.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// When the transaction was recorded, assigned by the data store.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The data needed to record a new transaction for a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    pub user_id: UserId,
    pub amount: f64,
    #[serde(rename = "type")]
    pub type_: TransactionType,
    pub description: String,
    #[serde(with = "iso_date")]
    pub date: Date,
}

impl NewTransaction {
    /// Tag validated form input with the user who submitted it.
    pub fn new(user_id: UserId, changes: TransactionChanges) -> Self {
        Self {
            user_id,
            amount: changes.amount,
            type_: changes.type_,
            description: changes.description,
            date: changes.date,
        }
    }
}

/// The user editable fields of a transaction.
///
/// Sent to the data store as the body of an update, and carried between the
/// browser and the server while a table row is being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionChanges {
    pub amount: f64,
    #[serde(rename = "type")]
    pub type_: TransactionType,
    pub description: String,
    #[serde(with = "iso_date")]
    pub date: Date,
}

impl From<&Transaction> for TransactionChanges {
    fn from(transaction: &Transaction) -> Self {
        Self {
            amount: transaction.amount,
            type_: transaction.type_,
            description: transaction.description.clone(),
            date: transaction.date,
        }
    }
}
