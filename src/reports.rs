//! The reports page: the full entry history as a table and the CSV export
//! download.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::Identity,
    endpoints,
    html::{
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency, link,
    },
    ledger::{LedgerEntry, get_entries},
    navigation::NavBar,
    report::to_csv,
};

/// The state needed for the reports page and CSV export.
#[derive(Debug, Clone)]
pub struct ReportsState {
    /// The database connection for the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn history_table(entries: &[LedgerEntry]) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow w-full max-w-4xl"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Budget" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Bills" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Travel" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Misc" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Balance" }
                    }
                }
                tbody
                {
                    @for entry in entries {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (entry.date) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(entry.budget)) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(entry.bills)) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(entry.travel)) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(entry.misc)) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(entry.balance)) }
                        }
                    }
                }
            }
        }
    }
}

/// Display the user's entry history with a link to download the CSV export.
pub async fn get_reports_page(
    State(state): State<ReportsState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let mut entries = get_entries(&identity, &connection)?;
    drop(connection);

    // Latest first for display; the CSV export keeps insertion order.
    entries.sort_by_key(|entry| std::cmp::Reverse(entry.date));

    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW);

    let content = html! {
        (nav_bar.into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-3xl font-bold mb-2" { "Reports & History" }

            @if entries.is_empty() {
                p class="text-gray-500 dark:text-gray-400"
                {
                    "Your history is empty. Log your first expense in the "
                    (link(endpoints::TRACKER_VIEW, "tracker"))
                    "."
                }
            } @else {
                a
                    href=(endpoints::EXPORT_CSV)
                    class="mb-4 px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                        hover:dark:bg-blue-700 text-white rounded"
                {
                    "Download Full Report (CSV)"
                }

                (history_table(&entries))
            }
        }
    };

    Ok(base("Reports", &[], &content).into_response())
}

/// Download the user's full entry history as a CSV attachment.
pub async fn get_export_csv(
    State(state): State<ReportsState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entries = get_entries(&identity, &connection)?;
    drop(connection);

    let csv_bytes = to_csv(&entries)?;
    let file_name = format!("{identity}_expense_report.csv");

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        csv_bytes,
    )
        .into_response())
}


#[cfg(test)]
mod export_csv_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::State,
        http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        auth::Identity,
        ledger::{LedgerEntry, append_entry, create_summary_table},
        test_utils::response_text,
    };

    use super::{ReportsState, get_export_csv};

    fn get_test_state() -> ReportsState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_summary_table(&connection).expect("Could not create summary table");

        ReportsState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn export_sets_attachment_headers() {
        let state = get_test_state();

        let response = get_export_csv(State(state), Extension(Identity::new("alice")))
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/csv")
        );
        assert_eq!(
            response.headers().get(CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"alice_expense_report.csv\""
        );
    }

    #[tokio::test]
    async fn export_contains_only_the_callers_entries() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            append_entry(
                &LedgerEntry::new(
                    Identity::new("alice"),
                    date!(2024 - 01 - 01),
                    1000.0,
                    200.0,
                    100.0,
                    50.0,
                ),
                &connection,
            )
            .unwrap();
            append_entry(
                &LedgerEntry::new(
                    Identity::new("bob"),
                    date!(2024 - 01 - 02),
                    9999.0,
                    0.0,
                    0.0,
                    0.0,
                ),
                &connection,
            )
            .unwrap();
        }

        let response = get_export_csv(State(state), Extension(Identity::new("alice")))
            .await
            .unwrap();

        let text = response_text(response).await;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2, "want header + 1 row, got {:?}", lines);
        assert_eq!(lines[0], "date,budget,bills,travel,misc,balance");
        assert_eq!(lines[1], "2024-01-01,1000,200,100,50,650");
    }
}
