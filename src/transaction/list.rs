//! The transaction table: fetching it, and rendering it and its rows in
//! viewing or editing mode.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState,
    auth::Session,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_LINK_STYLE, BUTTON_SAVE_STYLE, CARD_STYLE,
        FORM_TEXT_INPUT_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency, format_date, truncate,
    },
    refresh::{RefreshCounter, TRANSACTIONS_REFRESH_EVENT},
    transaction::{Transaction, TransactionChanges, TransactionId, TransactionStore, TransactionType},
};

const TABLE_ID: &str = "transactions-table";
const MAX_DESCRIPTION_GRAPHEMES: usize = 48;
/// Matches the Cancel button of a row in edit mode.
const OPEN_EDIT_CANCEL_SELECTOR: &str = "tr[data-editing] [data-cancel-edit]";

/// The state needed to fetch and re-render the transaction table.
#[derive(Clone)]
pub struct TransactionListState {
    pub transaction_store: Arc<dyn TransactionStore>,
    pub refresh_counter: RefreshCounter,
}

impl FromRef<AppState> for TransactionListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            refresh_counter: state.refresh_counter.clone(),
        }
    }
}

/// Serialize `changes` for an `hx-vals` attribute.
fn hx_vals(changes: &TransactionChanges) -> String {
    serde_json::to_string(changes).unwrap_or_else(|error| {
        tracing::error!("Could not serialize transaction for hx-vals: {error}");
        "{}".to_owned()
    })
}

/// Script run before an edit starts. Only one row may be in edit mode, so any
/// open edit is cancelled first.
fn cancel_open_edit_script() -> String {
    format!(
        "document.querySelectorAll('{OPEN_EDIT_CANCEL_SELECTOR}').forEach((button) => button.click())"
    )
}

fn row_id(id: &TransactionId) -> String {
    format!("transaction-{id}")
}

/// A table row showing a transaction, with buttons to edit or delete it.
pub fn view_row(id: &TransactionId, fields: &TransactionChanges) -> Markup {
    let confirm_message = format!(
        "Are you sure you want to delete the transaction '{}'? This cannot be undone.",
        fields.description
    );
    let amount_class = match fields.type_ {
        TransactionType::Income => "text-green-600 dark:text-green-400",
        TransactionType::Expense => "text-red-600 dark:text-red-400",
    };
    let description = truncate(&fields.description, MAX_DESCRIPTION_GRAPHEMES);
    let tooltip = (description != fields.description).then_some(fields.description.as_str());

    html! {
        tr id=(row_id(id)) class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(fields.date) { (format_date(fields.date)) }
            }
            td class=(TABLE_CELL_STYLE) { (fields.type_) }
            td class={ (TABLE_CELL_STYLE) " text-right " (amount_class) }
            {
                (format_currency(fields.amount))
            }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    button
                        type="button"
                        class=(BUTTON_LINK_STYLE)
                        hx-get=(format_endpoint(endpoints::EDIT_TRANSACTION_ROW, id))
                        hx-vals=(hx_vals(fields))
                        hx-on:htmx:before-request=(cancel_open_edit_script())
                        hx-target="closest tr"
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                    {
                        "Edit"
                    }

                    button
                        type="button"
                        class=(BUTTON_DELETE_STYLE)
                        hx-delete=(format_endpoint(endpoints::TRANSACTION, id))
                        hx-confirm=(confirm_message)
                        hx-target={ "#" (TABLE_ID) }
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

/// A table row with inputs holding the scratch buffer of an edit session.
///
/// Saving sends the inputs as a form. Cancelling brings back the row for
/// `original` without asking the data store.
pub fn edit_row(
    id: &TransactionId,
    scratch: &TransactionChanges,
    original: &TransactionChanges,
) -> Markup {
    // Full precision, so saving an untouched amount stores the same value.
    let amount = scratch.amount.to_string();

    html! {
        tr id=(row_id(id)) class=(TABLE_ROW_STYLE) data-transaction-row="true" data-editing="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                input
                    name="date"
                    type="date"
                    value=(scratch.date)
                    required
                    aria-label="Date"
                    class=(FORM_TEXT_INPUT_STYLE);
            }
            td class=(TABLE_CELL_STYLE)
            {
                select name="type" aria-label="Type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for transaction_type in [TransactionType::Income, TransactionType::Expense] {
                        option
                            value=(transaction_type.as_str())
                            selected[transaction_type == scratch.type_]
                        {
                            (transaction_type)
                        }
                    }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                input
                    name="amount"
                    type="number"
                    step="any"
                    min="0.01"
                    value=(amount)
                    required
                    aria-label="Amount"
                    class=(FORM_TEXT_INPUT_STYLE);
            }
            td class=(TABLE_CELL_STYLE)
            {
                input
                    name="description"
                    type="text"
                    value=(scratch.description)
                    required
                    aria-label="Description"
                    class=(FORM_TEXT_INPUT_STYLE);
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    button
                        type="button"
                        class=(BUTTON_SAVE_STYLE)
                        hx-put=(format_endpoint(endpoints::TRANSACTION, id))
                        hx-include="closest tr"
                        hx-target={ "#" (TABLE_ID) }
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                    {
                        "Save"
                    }

                    button
                        type="button"
                        class=(BUTTON_LINK_STYLE)
                        hx-get=(format_endpoint(endpoints::TRANSACTION_ROW, id))
                        hx-vals=(hx_vals(original))
                        data-cancel-edit="true"
                        hx-target="closest tr"
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                    {
                        "Cancel"
                    }
                }
            }
        }
    }
}

/// The transaction table, which re-fetches itself whenever the refresh
/// event fires.
///
/// `refresh` is the refresh count the table was fetched at. A failed
/// re-fetch is shown in the alert container and leaves the table as it was.
pub fn transactions_table(transactions: &[Transaction], refresh: u64) -> Markup {
    html! {
        div
            id=(TABLE_ID)
            class=(CARD_STYLE)
            hx-get=(endpoints::TRANSACTIONS_API)
            hx-trigger={ (TRANSACTIONS_REFRESH_EVENT) " from:body" }
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            data-refresh=(refresh)
        {
            h2 class="text-xl font-semibold mb-4" { "Transactions" }

            @if transactions.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No transactions yet." }
            } @else {
                div class="overflow-x-auto"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                @for header in ["Date", "Type", "Amount", "Description", "Actions"] {
                                    th scope="col" class=(TABLE_CELL_STYLE) { (header) }
                                }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (view_row(&transaction.id, &TransactionChanges::from(transaction)))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The stand-in for the transaction table that fetches the table once the
/// page has loaded.
pub fn transactions_table_placeholder() -> Markup {
    html! {
        div
            id=(TABLE_ID)
            class=(CARD_STYLE)
            hx-get=(endpoints::TRANSACTIONS_API)
            hx-trigger="load"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
        {
            h2 class="text-xl font-semibold mb-4" { "Transactions" }
            p class="text-gray-500 dark:text-gray-400" { "Loading transactions..." }
        }
    }
}

/// Fetch the transactions of the session's user and render the table.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionListState>,
    Extension(session): Extension<Session>,
) -> Response {
    match state.transaction_store.list(&session).await {
        Ok(transactions) => {
            let refresh = state.refresh_counter.current(&session.user_id);
            transactions_table(&transactions, refresh).into_response()
        }
        Err(error) => {
            tracing::error!("Could not fetch transactions for {}: {error}", session.user_id);
            error.into_failure_alert("Failed to fetch transactions")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{Extension, extract::State, http::StatusCode};
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        auth::UserId,
        refresh::RefreshCounter,
        test_utils::{
            FakeAuthProvider, InMemoryTransactionStore, assert_valid_html, parse_html_fragment,
            select_text, test_transaction,
        },
        transaction::{TransactionChanges, TransactionId, TransactionType, form::TransactionFormData},
    };

    use super::{
        OPEN_EDIT_CANCEL_SELECTOR, TransactionListState, edit_row, get_transactions_endpoint,
        transactions_table, view_row,
    };

    fn changes() -> TransactionChanges {
        TransactionChanges {
            amount: 50.0,
            type_: TransactionType::Expense,
            description: "Groceries".to_owned(),
            date: date!(2024 - 01 - 15),
        }
    }

    #[tokio::test]
    async fn lists_transactions_by_date_descending() {
        let user_id = UserId::new("U1");
        let store = Arc::new(InMemoryTransactionStore::with_transactions(vec![
            test_transaction("tx-1", &user_id, date!(2024 - 01 - 01)),
            test_transaction("tx-2", &user_id, date!(2024 - 03 - 01)),
            test_transaction("tx-3", &user_id, date!(2024 - 02 - 01)),
        ]));
        let session = FakeAuthProvider::new().issue_session(&user_id);
        let state = TransactionListState {
            transaction_store: store,
            refresh_counter: RefreshCounter::new(),
        };

        let response = get_transactions_endpoint(State(state), Extension(session)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let rows = Selector::parse("tbody tr").unwrap();
        let ids: Vec<_> = html
            .select(&rows)
            .filter_map(|row| row.value().attr("id"))
            .collect();
        assert_eq!(ids, ["transaction-tx-2", "transaction-tx-3", "transaction-tx-1"]);
    }

    #[tokio::test]
    async fn only_lists_transactions_of_session_user() {
        let store = Arc::new(InMemoryTransactionStore::with_transactions(vec![
            test_transaction("tx-1", &UserId::new("U1"), date!(2024 - 01 - 01)),
            test_transaction("tx-2", &UserId::new("U2"), date!(2024 - 01 - 01)),
        ]));
        let session = FakeAuthProvider::new().issue_session(&UserId::new("U2"));
        let state = TransactionListState {
            transaction_store: store,
            refresh_counter: RefreshCounter::new(),
        };

        let response = get_transactions_endpoint(State(state), Extension(session)).await;

        let html = parse_html_fragment(response).await;
        let rows = Selector::parse("tbody tr").unwrap();
        assert_eq!(html.select(&rows).count(), 1);
    }

    #[tokio::test]
    async fn table_carries_refresh_count() {
        let user_id = UserId::new("U1");
        let counter = RefreshCounter::new();
        counter.increment(&user_id);
        counter.increment(&user_id);
        let state = TransactionListState {
            transaction_store: Arc::new(InMemoryTransactionStore::default()),
            refresh_counter: counter,
        };
        let session = FakeAuthProvider::new().issue_session(&user_id);

        let response = get_transactions_endpoint(State(state), Extension(session)).await;

        let html = parse_html_fragment(response).await;
        let table = Selector::parse("#transactions-table").unwrap();
        let table = html.select(&table).next().unwrap();
        assert_eq!(table.value().attr("data-refresh"), Some("2"));
        assert_eq!(
            table.value().attr("hx-trigger"),
            Some("transactions-refresh from:body")
        );
        assert_eq!(select_text(&html, "p"), "No transactions yet.");
    }

    #[tokio::test]
    async fn failed_fetch_shows_alert_instead_of_table() {
        let store = Arc::new(InMemoryTransactionStore::default());
        store.fail_next_request();
        let state = TransactionListState {
            transaction_store: store,
            refresh_counter: RefreshCounter::new(),
        };
        let session = FakeAuthProvider::new().issue_session(&UserId::new("U1"));

        let response = get_transactions_endpoint(State(state), Extension(session)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = parse_html_fragment(response).await;
        assert_eq!(select_text(&html, "p"), "Failed to fetch transactions");
        let table = Selector::parse("#transactions-table").unwrap();
        assert_eq!(html.select(&table).count(), 0);
    }

    #[test]
    fn view_row_formats_fields() {
        let markup = view_row(&TransactionId::new("tx-1"), &changes());
        let html = scraper::Html::parse_fragment(&format!("<table>{}</table>", markup.into_string()));

        let cells: Vec<String> = html
            .select(&Selector::parse("td").unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .take(4)
            .collect();
        assert_eq!(cells, ["Jan 15, 2024", "Expense", "$50.00", "Groceries"]);
    }

    #[test]
    fn edit_button_carries_row_fields() {
        let markup = view_row(&TransactionId::new("tx-1"), &changes());
        let html = scraper::Html::parse_fragment(&format!("<table>{}</table>", markup.into_string()));

        let edit = html
            .select(&Selector::parse("button[hx-get]").unwrap())
            .next()
            .unwrap();
        assert_eq!(
            edit.value().attr("hx-get"),
            Some("/api/transactions/tx-1/edit")
        );
        let vals: TransactionChanges =
            serde_json::from_str(edit.value().attr("hx-vals").unwrap()).unwrap();
        assert_eq!(vals, changes());
    }

    #[test]
    fn edit_row_fills_inputs_from_scratch_and_cancels_to_original() {
        let original = changes();
        let scratch = TransactionChanges {
            amount: 12.5,
            description: "Snacks".to_owned(),
            ..original.clone()
        };

        let markup = edit_row(&TransactionId::new("tx-1"), &scratch, &original);
        let html = scraper::Html::parse_fragment(&format!("<table>{}</table>", markup.into_string()));

        let input_value = |name: &str| {
            let selector = Selector::parse(&format!("input[name={name}]")).unwrap();
            html.select(&selector)
                .next()
                .and_then(|input| input.value().attr("value"))
                .map(str::to_owned)
        };
        assert_eq!(input_value("amount").as_deref(), Some("12.5"));
        assert_eq!(input_value("description").as_deref(), Some("Snacks"));
        assert_eq!(input_value("date").as_deref(), Some("2024-01-15"));

        let selected = Selector::parse("select[name=type] option[selected]").unwrap();
        assert_eq!(
            html.select(&selected).next().unwrap().value().attr("value"),
            Some("expense")
        );

        let cancel = Selector::parse("button[hx-get]").unwrap();
        let cancel = html.select(&cancel).next().unwrap();
        assert_eq!(
            cancel.value().attr("hx-get"),
            Some("/api/transactions/tx-1/row")
        );
        let vals: TransactionChanges =
            serde_json::from_str(cancel.value().attr("hx-vals").unwrap()).unwrap();
        assert_eq!(vals, original);

        let save = Selector::parse("button[hx-put]").unwrap();
        let save = html.select(&save).next().unwrap();
        assert_eq!(save.value().attr("hx-include"), Some("closest tr"));
    }

    #[test]
    fn saving_untouched_amount_keeps_its_precision() {
        let original = TransactionFormData {
            amount: "12.345".to_owned(),
            type_: TransactionType::Expense,
            description: "Groceries".to_owned(),
            date: "2024-01-15".to_owned(),
        }
        .validate()
        .unwrap();

        let markup = edit_row(&TransactionId::new("tx-1"), &original, &original);
        let html = scraper::Html::parse_fragment(&format!("<table>{}</table>", markup.into_string()));
        let input = Selector::parse("input[name=amount]").unwrap();
        let rendered = html
            .select(&input)
            .next()
            .and_then(|input| input.value().attr("value"))
            .unwrap();

        let saved = TransactionFormData {
            amount: rendered.to_owned(),
            type_: original.type_,
            description: original.description.clone(),
            date: original.date.to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(saved, original);
    }

    #[test]
    fn starting_an_edit_cancels_the_open_edit() {
        let open = TransactionChanges {
            description: "Snacks".to_owned(),
            ..changes()
        };
        let markup = maud::html! {
            table
            {
                tbody
                {
                    (edit_row(&TransactionId::new("tx-1"), &open, &open))
                    (view_row(&TransactionId::new("tx-2"), &changes()))
                }
            }
        };
        let html = scraper::Html::parse_fragment(&markup.into_string());

        let edit = html
            .select(&Selector::parse("#transaction-tx-2 button[hx-get]").unwrap())
            .next()
            .unwrap();
        let script = edit.value().attr("hx-on:htmx:before-request").unwrap();
        assert!(script.contains(OPEN_EDIT_CANCEL_SELECTOR));

        let cancels: Vec<_> = html
            .select(&Selector::parse(OPEN_EDIT_CANCEL_SELECTOR).unwrap())
            .collect();
        assert_eq!(cancels.len(), 1);
        assert_eq!(
            cancels[0].value().attr("hx-get"),
            Some("/api/transactions/tx-1/row")
        );
    }

    #[test]
    fn long_descriptions_are_truncated_with_tooltip() {
        let fields = TransactionChanges {
            description: "a".repeat(100),
            ..changes()
        };

        let markup = transactions_table(
            &[crate::transaction::Transaction {
                id: TransactionId::new("tx-1"),
                user_id: UserId::new("U1"),
                amount: fields.amount,
                type_: fields.type_,
                description: fields.description.clone(),
                date: fields.date,
                created_at: time::OffsetDateTime::UNIX_EPOCH,
            }],
            0,
        );
        let html = scraper::Html::parse_fragment(&markup.into_string());

        let cell = html
            .select(&Selector::parse("td[title]").unwrap())
            .next()
            .expect("truncated description should have a tooltip");
        assert_eq!(cell.value().attr("title"), Some(fields.description.as_str()));
    }
}
