//! Defines the endpoint for creating a new transaction.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HX_TRIGGER;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::{AuthProvider, Session},
    refresh::RefreshCounter,
    timezone::local_today,
    transaction::{
        NewTransaction, TransactionStore,
        form::{TransactionFormData, TransactionFormDefaults, transaction_form},
    },
};

/// The state needed to create a transaction.
#[derive(Clone)]
pub struct CreateTransactionState {
    pub transaction_store: Arc<dyn TransactionStore>,
    /// Resolves the session to the user who will own the transaction.
    pub auth_provider: Arc<dyn AuthProvider>,
    pub refresh_counter: RefreshCounter,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            auth_provider: state.auth_provider.clone(),
            refresh_counter: state.refresh_counter.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Responds with a cleared form, a success alert and the refresh event so
/// the transaction table re-fetches. Invalid input is rejected before the
/// data store is contacted.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(session): Extension<Session>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let transaction_type = form.type_;
    let changes = match form.validate() {
        Ok(changes) => changes,
        Err(error) => return error.into_alert_response(),
    };

    let Some(today) = local_today(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let user = match state.auth_provider.get_user(&session.access_token).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!("Session for {} has no user", session.user_id);
            return Error::Unauthenticated.into_alert_response();
        }
        Err(error) => {
            tracing::error!("Could not get the current user: {error}");
            return error.into_failure_alert("Failed to add transaction");
        }
    };

    let transaction = match state
        .transaction_store
        .insert(&session, NewTransaction::new(user.id, changes))
        .await
    {
        Ok(transaction) => transaction,
        Err(error) => {
            tracing::error!("Could not create transaction: {error}");
            return error.into_failure_alert("Failed to add transaction");
        }
    };

    tracing::info!("Created transaction {}", transaction.id);
    let refresh = state.refresh_counter.increment(&transaction.user_id);
    let form = transaction_form(&TransactionFormDefaults::cleared(transaction_type, today));
    let alert = Alert::SuccessSimple {
        message: "Transaction added successfully".to_owned(),
    };

    (
        [(HX_TRIGGER, RefreshCounter::trigger_header(refresh))],
        maud::html! {
            (form)
            (alert.into_oob_html())
        },
    )
        .into_response()
}
