//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{Method, header::CONTENT_TYPE},
    middleware::Next,
    response::Response,
};

/// How many body bytes are logged at the `info` level before truncating.
const BODY_PREVIEW_LIMIT: usize = 64;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Log the request and response bodies for each request.
///
/// Bodies are logged at the `info` level, truncated to a short preview with
/// the full text at the `debug` level. The password field of form
/// submissions is redacted before anything is logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_text = buffer_body(body).await;

    let is_form_post = parts.method == Method::POST
        && parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));

    if is_form_post {
        log_payload("Received request", &parts, &redact_field(&body_text, "password"));
    } else {
        log_payload("Received request", &parts, &body_text);
    }

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = buffer_body(body).await;
    log_payload("Sending response", &parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

/// Replace the value of `field_name` in a urlencoded form body with
/// asterisks.
fn redact_field(form_text: &str, field_name: &str) -> String {
    let marker = format!("{field_name}=");

    let start = match form_text.find(&marker) {
        Some(position) => position,
        None => return form_text.to_string(),
    };

    let end = form_text[start..]
        .find('&')
        .map(|offset| start + offset)
        .unwrap_or(form_text.len());

    format!(
        "{}{}********{}",
        &form_text[..start],
        marker,
        &form_text[end..]
    )
}

async fn buffer_body(body: Body) -> String {
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    String::from_utf8_lossy(&body_bytes).to_string()
}

fn log_payload(label: &str, headers: &impl std::fmt::Debug, body: &str) {
    if body.len() > BODY_PREVIEW_LIMIT {
        // Back the cut off to a char boundary so the slice cannot panic on
        // multi-byte text.
        let mut end = BODY_PREVIEW_LIMIT;
        while !body.is_char_boundary(end) {
            end -= 1;
        }

        tracing::info!("{label}: {headers:#?}\nbody: {:}...", &body[..end]);
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{label}: {headers:#?}\nbody: {body:?}");
    }
}
