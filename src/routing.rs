//! Application router configuration with protected and unprotected route
//! definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    analytics::get_analytics_page,
    auth::{auth_guard, auth_guard_hx},
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    not_found::get_404_not_found,
    register::{get_register_page, register_user},
    reports::{get_export_csv, get_reports_page},
    tracker::{create_entry_endpoint, get_tracker_page},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRACKER_VIEW, get(get_tracker_page))
        .route(endpoints::ANALYTICS_VIEW, get(get_analytics_page))
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(endpoints::EXPORT_CSV, get(get_export_csv))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // POST routes driven by HTMX need the HX-Redirect header for auth
    // redirects to work properly.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::ENTRIES_API, post(create_entry_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod routing_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, endpoints};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection, "foobar", "Etc/UTC")
            .expect("Could not create app state");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn protected_views_redirect_anonymous_users_to_log_in() {
        let server = get_test_server();

        for endpoint in [
            endpoints::ROOT,
            endpoints::DASHBOARD_VIEW,
            endpoints::TRACKER_VIEW,
            endpoints::ANALYTICS_VIEW,
            endpoints::REPORTS_VIEW,
            endpoints::EXPORT_CSV,
        ] {
            let response = server.get(endpoint).await;

            response.assert_status_see_other();
            assert_eq!(
                response.header("location"),
                endpoints::LOG_IN_VIEW,
                "GET {endpoint} should redirect to the log-in page"
            );
        }
    }

    #[tokio::test]
    async fn entry_api_redirects_anonymous_users_with_hx_header() {
        let server = get_test_server();

        let response = server
            .post(endpoints::ENTRIES_API)
            .form(&[("budget", "1000"), ("bills", "0"), ("travel", "0"), ("misc", "0")])
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn log_in_page_is_reachable_without_a_session() {
        let server = get_test_server();

        server.get(endpoints::LOG_IN_VIEW).await.assert_status_ok();
        server.get(endpoints::REGISTER_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn unknown_routes_fall_back_to_404() {
        let server = get_test_server();

        server.get("/definitely/not/a/route").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn register_log_in_and_track_an_entry_end_to_end() {
        let server = get_test_server();

        let response = server
            .post(endpoints::USERS)
            .form(&[("username", "alice"), ("password", "pw1")])
            .await;
        response.assert_status_see_other();

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("username", "alice"), ("password", "pw1")])
            .await;
        response.assert_status_see_other();
        let cookies = response.cookies();

        let response = server
            .post(endpoints::ENTRIES_API)
            .add_cookies(cookies.clone())
            .form(&[
                ("budget", "1000"),
                ("bills", "200"),
                ("travel", "100"),
                ("misc", "50"),
            ])
            .await;
        response.assert_status_ok();
        response.assert_text_contains("Remaining balance");

        let response = server
            .get(endpoints::EXPORT_CSV)
            .add_cookies(cookies)
            .await;
        response.assert_status_ok();
        let text = response.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2, "want header + 1 row, got {:?}", lines);
        assert!(lines[1].ends_with(",1000,200,100,50,650"));
    }
}
