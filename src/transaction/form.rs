use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
    transaction::core::{DATE_FORMAT, TransactionChanges, TransactionType},
};

/// The raw strings entered in the transaction form or an edited table row.
///
/// Kept as strings so that bad input becomes a validation message instead
/// of a rejected request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionFormData {
    #[serde(default)]
    pub amount: String,
    #[serde(rename = "type", default)]
    pub type_: TransactionType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
}

impl TransactionFormData {
    /// Check the input and convert it into the fields of a transaction.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::InvalidAmount] if the amount is empty, not a finite number, or not greater than zero,
    /// - [Error::EmptyDescription] if the description is blank,
    /// - [Error::InvalidDate] if the date is not in the format `YYYY-MM-DD`.
    pub fn validate(self) -> Result<TransactionChanges, Error> {
        let amount = self
            .amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite() && *amount > 0.0)
            .ok_or(Error::InvalidAmount)?;

        let description = self.description.trim();
        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        let date = Date::parse(self.date.trim(), DATE_FORMAT)
            .map_err(|_| Error::InvalidDate(self.date.clone()))?;

        Ok(TransactionChanges {
            amount,
            type_: self.type_,
            description: description.to_owned(),
            date,
        })
    }
}

/// What the transaction form is filled in with when it is rendered.
pub struct TransactionFormDefaults<'a> {
    pub transaction_type: TransactionType,
    pub amount: Option<&'a str>,
    pub description: Option<&'a str>,
    pub date: Date,
}

impl TransactionFormDefaults<'_> {
    /// An empty form dated `today`, keeping the type the user last chose.
    pub fn cleared(transaction_type: TransactionType, today: Date) -> Self {
        Self {
            transaction_type,
            amount: None,
            description: None,
            date: today,
        }
    }
}

fn type_radio(transaction_type: TransactionType, checked: bool) -> Markup {
    let id = format!("transaction-type-{}", transaction_type.as_str());

    html! {
        div class="flex items-center gap-3"
        {
            input
                name="type"
                id=(id)
                type="radio"
                value=(transaction_type.as_str())
                checked[checked]
                required
                tabindex="0"
                class=(FORM_RADIO_INPUT_STYLE);

            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (transaction_type) }
        }
    }
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for transaction_type in [TransactionType::Income, TransactionType::Expense] {
                    (type_radio(transaction_type, transaction_type == defaults.transaction_type))
                }
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                min="0.01"
                placeholder="0.00"
                required
                value=[defaults.amount]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                required
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// The form for adding a transaction.
///
/// The server replies to a submission with a fresh copy of this form, so
/// the whole form is swapped out. Errors are shown in the alert container
/// and leave the entered values in place.
pub fn transaction_form(defaults: &TransactionFormDefaults<'_>) -> Markup {
    html! {
        form
            id="transaction-form"
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-disabled-elt="#submit-transaction"
            class="space-y-4"
        {
            h2 class="text-xl font-semibold" { "Add Transaction" }

            (transaction_form_fields(defaults))

            button type="submit" id="submit-transaction" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="htmx-indicator" { (loading_spinner()) }
                "Add Transaction"
            }
        }
    }
}
