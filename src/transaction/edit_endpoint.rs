//! Endpoints for editing a transaction in place in the transaction table.
//!
//! Beginning and cancelling an edit only swap a table row between viewing
//! and editing mode. The row's fields travel with the request, so neither
//! touches the data store. Saving sends the edited fields to the data store
//! and re-renders the whole table.

use axum::{
    Extension,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;

use crate::{
    alert::Alert,
    auth::Session,
    transaction::{
        TransactionChanges, TransactionId,
        form::TransactionFormData,
        list::{TransactionListState, edit_row, transactions_table, view_row},
    },
};

/// Render the row of transaction `id` in editing mode, starting the scratch
/// buffer from the row's current fields.
pub async fn get_edit_row(
    Path(transaction_id): Path<TransactionId>,
    Query(fields): Query<TransactionChanges>,
) -> Response {
    edit_row(&transaction_id, &fields, &fields).into_response()
}

/// Discard the scratch buffer and render the row of transaction `id` with
/// its original fields.
pub async fn get_view_row(
    Path(transaction_id): Path<TransactionId>,
    Query(original): Query<TransactionChanges>,
) -> Response {
    view_row(&transaction_id, &original).into_response()
}

/// A route handler for saving an edited transaction.
///
/// On success the re-fetched table is returned along with a success alert.
/// On failure only an alert is returned, so the row stays in editing mode
/// with the user's changes.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionListState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let changes = match form.validate() {
        Ok(changes) => changes,
        Err(error) => return error.into_failure_alert("Failed to update transaction"),
    };

    if let Err(error) = state
        .transaction_store
        .update(&session, &transaction_id, changes)
        .await
    {
        tracing::error!("Could not update transaction {transaction_id}: {error}");
        return error.into_failure_alert("Failed to update transaction");
    }

    tracing::info!("Updated transaction {transaction_id}");

    let transactions = match state.transaction_store.list(&session).await {
        Ok(transactions) => transactions,
        Err(error) => {
            tracing::error!("Could not fetch transactions after update: {error}");
            return error.into_failure_alert("Failed to fetch transactions");
        }
    };

    let refresh = state.refresh_counter.current(&session.user_id);
    let alert = Alert::SuccessSimple {
        message: "Transaction updated".to_owned(),
    };

    maud::html! {
        (transactions_table(&transactions, refresh))
        (alert.into_oob_html())
    }
    .into_response()
}
