//! Chart generation and rendering for the analytics page.
//!
//! This module creates interactive ECharts visualizations for a user's
//! ledger:
//! - **Balance Trend Chart**: the stored balance of each entry over time
//! - **Spending Chart**: per-category totals alongside the latest entry's
//!   split
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript
//! initialization code.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisType, Tooltip, Trigger},
    series::{Bar, Line},
};
use maud::{Markup, PreEscaped, html};
use rusqlite::Connection;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    auth::Identity,
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, link},
    ledger::{LedgerEntry, get_entries},
    navigation::NavBar,
    report::{breakdown, latest_split, trend},
};

/// Date format for chart axis labels, e.g. "2024-01-01".
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5.5.0/dist/echarts.min.js";

/// The state needed for displaying the analytics page.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The database connection for the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// An analytics chart with its HTML container ID and ECharts configuration.
struct AnalyticsChart {
    /// The HTML element ID to use for the chart (kebab-case)
    id: &'static str,
    /// The ECharts configuration as a JSON string
    options: String,
}

/// Renders the HTML containers for the analytics charts.
fn charts_view(charts: &[AnalyticsChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for the analytics charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
fn charts_script(charts: &[AnalyticsChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

fn format_date_labels(points: &[(Date, f64)]) -> Vec<String> {
    points
        .iter()
        .map(|(date, _)| {
            date.format(DATE_FORMAT)
                .unwrap_or_else(|_| date.to_string())
        })
        .collect()
}

fn balance_trend_chart(points: &[(Date, f64)]) -> Chart {
    let labels = format_date_labels(points);
    let values: Vec<f64> = points.iter().map(|(_, balance)| *balance).collect();

    Chart::new()
        .title(Title::new().text("Balance over time"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Line::new().name("Balance").data(values))
}

fn spending_chart(entries: &[LedgerEntry]) -> Chart {
    let totals = breakdown(entries);
    let chart = Chart::new()
        .title(Title::new().text("Spending by category"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(vec!["Bills", "Travel", "Misc"]),
        )
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(
            Bar::new()
                .name("All entries")
                .data(vec![totals.bills, totals.travel, totals.misc]),
        );

    match latest_split(entries) {
        Some(latest) => chart.series(
            Bar::new()
                .name("Latest entry")
                .data(vec![latest.bills, latest.travel, latest.misc]),
        ),
        None => chart,
    }
}

fn analytics_no_data_view(nav_bar: NavBar) -> Markup {
    html! {
        (nav_bar.into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-3xl font-bold mb-2" { "Analytics" }

            p class="text-gray-500 dark:text-gray-400"
            {
                "No data to chart yet. Log some expenses in the "
                (link(endpoints::TRACKER_VIEW, "tracker"))
                " first."
            }
        }
    }
}

/// Display a page with charts summarizing the user's entries.
pub async fn get_analytics_page(
    State(state): State<AnalyticsState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entries = get_entries(&identity, &connection)?;
    drop(connection);

    let nav_bar = NavBar::new(endpoints::ANALYTICS_VIEW);

    if entries.is_empty() {
        return Ok(base("Analytics", &[], &analytics_no_data_view(nav_bar)).into_response());
    }

    let charts = [
        AnalyticsChart {
            id: "balance-trend-chart",
            options: balance_trend_chart(&trend(&entries)).to_string(),
        },
        AnalyticsChart {
            id: "spending-chart",
            options: spending_chart(&entries).to_string(),
        },
    ];

    let content = html! {
        (nav_bar.into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-3xl font-bold mb-4" { "Analytics" }

            (charts_view(&charts))
        }
    };

    let head_elements = [
        HeadElement::ScriptLink(ECHARTS_CDN.to_owned()),
        charts_script(&charts),
    ];

    Ok(base("Analytics", &head_elements, &content).into_response())
}
