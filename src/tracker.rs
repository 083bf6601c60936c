//! The daily expense tracker: the entry form page and the endpoint that
//! derives the balance and appends the entry to the ledger.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::Identity,
    endpoints,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, format_currency, loading_spinner},
    ledger::{LedgerEntry, append_entry},
    navigation::NavBar,
    timezone::get_local_offset,
};

/// The default budget shown in the entry form.
const DEFAULT_BUDGET: f64 = 50_000.0;

/// The state needed for the tracker page and entry creation.
#[derive(Debug, Clone)]
pub struct TrackerState {
    /// The database connection for the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TrackerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn amount_input(name: &str, label: &str, value: Option<f64>) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                type="number"
                name=(name)
                id=(name)
                class=(FORM_TEXT_INPUT_STYLE)
                min="0"
                step="0.01"
                value=(value.map(|value| value.to_string()).unwrap_or_else(|| "0".to_owned()))
                required;
        }
    }
}

fn entry_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::ENTRIES_API)
            hx-target="#entry-result"
            hx-swap="innerHTML"
            hx-indicator="#indicator"
            class="space-y-4 w-full max-w-md"
        {
            (amount_input("budget", "Monthly Budget", Some(DEFAULT_BUDGET)))

            div class="grid grid-cols-3 gap-4"
            {
                (amount_input("bills", "Bills", None))
                (amount_input("travel", "Travel", None))
                (amount_input("misc", "Misc", None))
            }

            button
                type="submit" id="submit-button" tabindex="0"
                class="w-full px-4 py-2 bg-blue-500 dark:bg-blue-600 disabled:bg-blue-700
                    hover:enabled:bg-blue-600 hover:enabled:dark:bg-blue-700 text-white rounded"
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Save Entry"
            }

            div id="entry-result" {}
        }
    }
}

/// Display the page with the daily entry form.
pub async fn get_tracker_page(Extension(identity): Extension<Identity>) -> Response {
    let nav_bar = NavBar::new(endpoints::TRACKER_VIEW);

    let content = html! {
        (nav_bar.into_html())

        main class="flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white"
        {
            h1 class="text-3xl font-bold mb-2" { "Daily Expense Tracker" }
            p class="text-gray-500 dark:text-gray-400 mb-6"
            {
                "Log today's spending, " (identity) ". The entry date is taken from the server clock."
            }

            (entry_form())
        }
    };

    base("Tracker", &[], &content).into_response()
}

/// The raw amounts entered by the user in the entry form.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryForm {
    pub budget: f64,
    pub bills: f64,
    pub travel: f64,
    pub misc: f64,
}

fn entry_saved_alert(balance: f64) -> Markup {
    html! {
        p class="text-green-600 dark:text-green-400 text-base"
        {
            "Saved! Remaining balance: " (format_currency(balance))
        }
    }
}

fn entry_error_alert(message: &str) -> Markup {
    html! {
        p class="text-red-500 text-base" { (message) }
    }
}

/// Handler for creating a new ledger entry via the POST method.
///
/// The entry date is generated from the current clock in the configured
/// timezone; it is not user-editable. The balance is derived from the
/// submitted amounts and stored with the row. Repeated submissions simply
/// accumulate rows.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn create_entry_endpoint(
    State(state): State<TrackerState>,
    Extension(identity): Extension<Identity>,
    Form(entry_form): Form<EntryForm>,
) -> Response {
    if [
        entry_form.budget,
        entry_form.bills,
        entry_form.travel,
        entry_form.misc,
    ]
    .iter()
    .any(|amount| !amount.is_finite() || *amount < 0.0)
    {
        return entry_error_alert("Amounts must be zero or more.").into_response();
    }

    let local_offset = match get_local_offset(&state.local_timezone) {
        Some(offset) => offset,
        None => return Error::InvalidTimezone(state.local_timezone).into_response(),
    };
    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

    let entry = LedgerEntry::new(
        identity,
        today,
        entry_form.budget,
        entry_form.bills,
        entry_form.travel,
        entry_form.misc,
    );

    let result = append_entry(
        &entry,
        &state
            .db_connection
            .lock()
            .expect("Could not acquire database lock"),
    );

    match result {
        Ok(()) => entry_saved_alert(entry.balance).into_response(),
        Err(error) => {
            tracing::error!("An error occurred while inserting a ledger entry: {error}");
            error.into_response()
        }
    }
}
