//! The dashboard page that brings together the transaction form, the
//! transaction table and the news panel.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_LINK_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, base},
    news::news_placeholder,
    timezone::local_today,
    transaction::{
        TransactionFormDefaults, TransactionType, transaction_form, transactions_table_placeholder,
    },
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn dashboard_view(today: Date) -> Markup {
    let form = transaction_form(&TransactionFormDefaults::cleared(
        TransactionType::default(),
        today,
    ));

    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            header class="flex items-center justify-between mb-8"
            {
                h1 class="text-2xl font-bold" { "Finance Tracker" }

                a href=(endpoints::LOG_OUT) class=(BUTTON_LINK_STYLE) { "Log out" }
            }

            div class="grid gap-8 lg:grid-cols-3"
            {
                section class={ (CARD_STYLE) " lg:col-span-1" }
                {
                    (form)
                }

                div class="lg:col-span-2"
                {
                    (transactions_table_placeholder())
                }
            }

            div class="mt-8"
            {
                (news_placeholder())
            }
        }
    };

    base("Dashboard", &content)
}

/// Display the dashboard with the transaction form, the transaction table
/// and the news panel.
///
/// The table and news panel are loaded by the browser once the page is shown.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    Ok(dashboard_view(today).into_response())
}

/// The root path '/' redirects to the dashboard page.
pub async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
