//! Recording, listing, editing and deleting income and expense transactions.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod http_store;
mod list;
mod store;

pub use core::{NewTransaction, Transaction, TransactionChanges, TransactionId, TransactionType};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::{get_edit_row, get_view_row, update_transaction_endpoint};
pub use form::{TransactionFormDefaults, transaction_form};
pub use http_store::HttpTransactionStore;
pub use list::{get_transactions_endpoint, transactions_table_placeholder};
pub use store::TransactionStore;
