use async_trait::async_trait;

use crate::{
    Error,
    auth::Session,
    transaction::{NewTransaction, Transaction, TransactionChanges, TransactionId},
};

/// Handles the creation and retrieval of transactions in the remote data store.
///
/// Every call is made on behalf of `session`, and the data store only lets a
/// session see and change the transactions of its own user.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Record a new transaction and return it as stored.
    async fn insert(
        &self,
        session: &Session,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error>;

    /// Get every transaction visible to `session`, most recent date first.
    async fn list(&self, session: &Session) -> Result<Vec<Transaction>, Error>;

    /// Overwrite the editable fields of the transaction with `id`.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingTransaction] if no such transaction is
    /// visible to `session`.
    async fn update(
        &self,
        session: &Session,
        id: &TransactionId,
        changes: TransactionChanges,
    ) -> Result<Transaction, Error>;

    /// Remove the transaction with `id`.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if no such transaction is
    /// visible to `session`.
    async fn delete(&self, session: &Session, id: &TransactionId) -> Result<(), Error>;
}
