//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered into the `#alert-container` element of the base page,
//! either as the body of an error response targeted at the container or as an
//! out-of-band swap alongside a successful response.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// An alert message shown to the user after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with extra details.
    Success {
        /// The headline of the alert.
        message: String,
        /// Extra text displayed below the headline.
        details: String,
    },
    /// A success message without details.
    SuccessSimple {
        /// The headline of the alert.
        message: String,
    },
    /// An error message with extra details.
    Error {
        /// The headline of the alert.
        message: String,
        /// Extra text displayed below the headline.
        details: String,
    },
    /// An error message without details.
    ErrorSimple {
        /// The headline of the alert.
        message: String,
    },
}

impl Alert {
    fn is_error(&self) -> bool {
        matches!(self, Alert::Error { .. } | Alert::ErrorSimple { .. })
    }

    fn parts(&self) -> (&str, Option<&str>) {
        match self {
            Alert::Success { message, details } | Alert::Error { message, details } => {
                (message, Some(details))
            }
            Alert::SuccessSimple { message } | Alert::ErrorSimple { message } => (message, None),
        }
    }

    /// Render the alert as a standalone fragment.
    pub fn into_html(self) -> Markup {
        let style = if self.is_error() {
            "flex items-start gap-3 p-4 mb-4 rounded-lg border text-red-800 \
            bg-red-50 border-red-300 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        } else {
            "flex items-start gap-3 p-4 mb-4 rounded-lg border text-green-800 \
            bg-green-50 border-green-300 dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        };
        let role = if self.is_error() { "alert" } else { "status" };
        let (message, details) = self.parts();

        html! {
            div class=(style) role=(role)
            {
                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if let Some(details) = details {
                        span class="text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    onclick="this.parentElement.remove()"
                    class="text-sm font-semibold"
                {
                    "×"
                }
            }
        }
    }

    /// Render the alert wrapped in the alert container so that htmx swaps it
    /// out-of-band next to the main response content.
    pub fn into_oob_html(self) -> Markup {
        html! {
            div id="alert-container" hx-swap-oob="innerHTML"
            {
                (self.into_html())
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}
