//! The dashboard landing page: a greeting, stat cards for the latest entry,
//! and simple insights on how the spending compares to the budget.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::Identity,
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base, format_currency, link},
    ledger::{LedgerEntry, get_entries},
    navigation::NavBar,
    report::latest_split,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

const CARD_STYLE: &str = "rounded-lg shadow p-6 bg-white dark:bg-gray-800 min-w-[200px]";

fn stat_card(title: &str, value: &str, value_style: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (title) }
            p class={ "text-2xl font-bold " (value_style) } { (value) }
        }
    }
}

fn balance_style(balance: f64) -> &'static str {
    if balance >= 0.0 {
        "text-green-600 dark:text-green-400"
    } else {
        "text-red-600 dark:text-red-400"
    }
}

fn insights_view(latest: &LedgerEntry) -> Markup {
    html! {
        section class="w-full max-w-2xl mt-6 space-y-2"
        {
            h2 class="text-xl font-semibold mb-2" { "Insights" }

            @if latest.balance < 0.0 {
                p class="text-red-600 dark:text-red-400" { "You have exceeded your budget!" }
            } @else if latest.balance < latest.budget * 0.1 {
                p class="text-yellow-600 dark:text-yellow-400" { "Careful! Your balance is getting low." }
            } @else {
                p class="text-green-600 dark:text-green-400" { "Your balance is in a healthy range." }
            }

            @if latest.bills > latest.budget * 0.5 {
                p class="text-yellow-600 dark:text-yellow-400"
                {
                    "Bills are consuming more than half of your budget."
                }
            } @else {
                p class="text-green-600 dark:text-green-400" { "Bills are within a healthy range." }
            }
        }
    }
}

fn dashboard_view(identity: &Identity, latest: &LedgerEntry) -> Markup {
    html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-3xl font-bold mb-2" { "Welcome back, " (identity) "!" }
            p class="text-gray-500 dark:text-gray-400 mb-6" { "Here is your latest entry at a glance." }

            section class="flex flex-wrap gap-4 justify-center"
            {
                (stat_card("Budget", &format_currency(latest.budget), ""))
                (stat_card("Spent", &format_currency(latest.total_spend()), ""))
                (stat_card(
                    "Remaining Balance",
                    &format_currency(latest.balance),
                    balance_style(latest.balance),
                ))
            }

            (insights_view(latest))
        }
    }
}

fn dashboard_no_data_view(identity: &Identity) -> Markup {
    html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-3xl font-bold mb-2" { "Welcome, " (identity) "!" }

            p class="text-gray-500 dark:text-gray-400 mb-4"
            {
                "No entries yet. Start tracking your spending in the "
                (link(endpoints::TRACKER_VIEW, "tracker"))
                "."
            }
        }
    }
}

/// Display a page with an overview of the user's latest entry.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entries = get_entries(&identity, &connection)?;
    drop(connection);

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    let content = match latest_split(&entries) {
        Some(latest) => html! {
            (nav_bar.into_html())
            (dashboard_view(&identity, latest))
        },
        None => html! {
            (nav_bar.into_html())
            (dashboard_no_data_view(&identity))
        },
    };

    Ok(base("Dashboard", &[], &content).into_response())
}
