use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    auth::Session,
    transaction::{
        TransactionId,
        list::{TransactionListState, transactions_table},
    },
};

/// A route handler for deleting a transaction.
///
/// Responds with the re-fetched table and a success alert, or with only an
/// alert if the transaction could not be deleted.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionListState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    if let Err(error) = state
        .transaction_store
        .delete(&session, &transaction_id)
        .await
    {
        tracing::error!("Could not delete transaction {transaction_id}: {error}");
        return error.into_failure_alert("Failed to delete transaction");
    }

    tracing::info!("Deleted transaction {transaction_id}");

    match state.transaction_store.list(&session).await {
        Ok(transactions) => {
            let refresh = state.refresh_counter.current(&session.user_id);
            let alert = Alert::SuccessSimple {
                message: "Transaction deleted".to_owned(),
            };

            maud::html! {
                (transactions_table(&transactions, refresh))
                (alert.into_oob_html())
            }
            .into_response()
        }
        Err(error) => {
            tracing::error!("Could not fetch transactions after delete: {error}");
            error.into_failure_alert("Failed to fetch transactions")
        }
    }
}
