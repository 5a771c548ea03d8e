//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::{HxReswap, SwapOption};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The amount entered for a transaction is empty, not a number, or not
    /// greater than zero.
    #[error("the amount must be a number greater than zero")]
    InvalidAmount,

    /// A transaction was submitted without a description.
    #[error("the description cannot be empty")]
    EmptyDescription,

    /// The date entered for a transaction is not a valid `YYYY-MM-DD` date.
    #[error("\"{0}\" is not a valid date")]
    InvalidDate(String),

    /// The auth provider did not recognise the current session as a signed
    /// in user.
    #[error("you must be logged in to do that")]
    Unauthenticated,

    /// The email and password combination was rejected by the auth provider.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The session cookie is missing from the request or could not be read.
    #[error("no session in the cookie jar")]
    SessionMissing,

    /// The request to the data store could not be sent or its response
    /// could not be read.
    #[error("could not reach the data store: {0}")]
    StoreRequest(String),

    /// The data store rejected a request.
    #[error("the data store responded with status {status}: {body}")]
    StoreResponse {
        /// The HTTP status code of the response.
        status: u16,
        /// The response body, kept for the server logs.
        body: String,
    },

    /// The request to the auth provider could not be sent or its response
    /// could not be read.
    #[error("could not reach the auth provider: {0}")]
    AuthRequest(String),

    /// The auth provider rejected a request.
    #[error("the auth provider responded with status {status}: {body}")]
    AuthResponse {
        /// The HTTP status code of the response.
        status: u16,
        /// The response body, kept for the server logs.
        body: String,
    },

    /// The request to the news API could not be sent or its response could
    /// not be read.
    #[error("could not reach the news API: {0}")]
    NewsRequest(String),

    /// The news API responded with a non-success status code.
    #[error("the news API responded with status {0}")]
    NewsResponse(u16),

    /// Tried to update a transaction that does not exist or is not visible
    /// to the current user.
    #[error("tried to update a transaction that is not in the data store")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist or is not visible
    /// to the current user.
    #[error("tried to delete a transaction that is not in the data store")]
    DeleteMissingTransaction,

    /// The session or a value derived from it could not be serialized.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The HTTP client for talking to the external services could not be built.
    #[error("could not build the HTTP client: {0}")]
    HttpClientBuild(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl Error {
    /// Whether the error was caused by input the user can correct.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidAmount | Error::EmptyDescription | Error::InvalidDate(_)
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

/// Render `alert` into the alert container, whatever swap style the element
/// that made the request asked for.
fn alert_response(status: StatusCode, alert: Alert) -> Response {
    (status, HxReswap(SwapOption::InnerHtml), alert.into_html()).into_response()
}

impl Error {
    fn alert_status(&self) -> StatusCode {
        match self {
            error if error.is_validation_error() => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Unauthenticated | Error::SessionMissing => StatusCode::UNAUTHORIZED,
            Error::UpdateMissingTransaction | Error::DeleteMissingTransaction | Error::NotFound => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert the error into an alert headed by `message`, e.g. "Failed to
    /// update transaction".
    ///
    /// Errors the user can fix are explained in the details. The details of
    /// any other error stay in the server logs.
    pub fn into_failure_alert(self, message: &str) -> Response {
        let details = match &self {
            Error::InvalidAmount => "Please enter a valid amount.".to_owned(),
            Error::EmptyDescription => "Please enter a description.".to_owned(),
            Error::InvalidDate(date) => {
                format!("\"{date}\" is not a date in the format YYYY-MM-DD.")
            }
            Error::Unauthenticated | Error::SessionMissing => {
                "Log in again and then retry.".to_owned()
            }
            Error::UpdateMissingTransaction | Error::DeleteMissingTransaction => {
                "The transaction could not be found. Try refreshing the page.".to_owned()
            }
            _ => "Try again later or check the server logs.".to_owned(),
        };
        let alert = Alert::Error {
            message: message.to_owned(),
            details,
        };

        alert_response(self.alert_status(), alert)
    }

    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let status_code = self.alert_status();
        let alert = match self {
            Error::InvalidAmount => Alert::ErrorSimple {
                message: "Please enter a valid amount".to_owned(),
            },
            Error::EmptyDescription => Alert::ErrorSimple {
                message: "Please enter a description".to_owned(),
            },
            Error::InvalidDate(date) => Alert::Error {
                message: "Please enter a valid date".to_owned(),
                details: format!("\"{date}\" is not a date in the format YYYY-MM-DD."),
            },
            Error::Unauthenticated | Error::SessionMissing => Alert::Error {
                message: "You are not logged in".to_owned(),
                details: "Log in again and then retry.".to_owned(),
            },
            Error::InvalidTimezoneError(timezone) => Alert::Error {
                message: "Invalid Timezone Settings".to_owned(),
                details: format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            },
            Error::UpdateMissingTransaction => Alert::Error {
                message: "Failed to update transaction".to_owned(),
                details: "The transaction could not be found.".to_owned(),
            },
            Error::DeleteMissingTransaction => Alert::Error {
                message: "Failed to delete transaction".to_owned(),
                details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                    .to_owned(),
            },
            _ => Alert::Error {
                message: "Something went wrong".to_owned(),
                details: "An unexpected error occurred, check the server logs for more details."
                    .to_owned(),
            },
        };

        alert_response(status_code, alert)
    }
}
