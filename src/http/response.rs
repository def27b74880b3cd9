//! Maintenance responses and content negotiation.
//!
//! # Responsibilities
//! - Decide JSON vs HTML representation for the unavailable response
//! - Build the fixed 503 bodies and the 307 redirect
//!
//! # Design Decisions
//! - The JSON payload is a fixed byte string; API clients match on it
//! - Negotiation: `Accept: application/json` wins, then `/api/` paths
//!   unless the client explicitly accepts HTML
//! - Response construction is fallible; the caller maps a failure to 500

use axum::body::Body;
use axum::http::{header, Response, StatusCode};

/// Fixed payload served to API clients while the target is unavailable.
pub const MAINTENANCE_JSON: &str = r#"{"status": "unavailable", "message": "service is currently undergoing a migration. Please try again later.", "detail": "service is currently undergoing a migration. Please try again later.", "code": 503}"#;

/// Fixed maintenance page served to browsers while the target is unavailable.
pub const MAINTENANCE_HTML: &str = r#"<!doctype html>
<title>Server Migration</title>
<style>
  body { text-align: center; padding: 150px; }
  h1 { font-size: 50px; }
  body { font: 20px Helvetica, sans-serif; color: #333; }
  article { display: block; text-align: left; width: 650px; margin: 0 auto; }
  a { color: #dc8100; text-decoration: none; }
  a:hover { color: #333; text-decoration: none; }
</style>
<article>
    <h1>We&rsquo;ll be back soon!</h1>
    <div>
        <p>Sorry for the inconvenience but we&rsquo;re performing a migration at the moment. We&rsquo;ll be back online shortly!</p>
        <p>&mdash; Server Team</p>
    </div>
</article>"#;

/// Pick the unavailable-response representation.
///
/// JSON when the client asks for `application/json`, or when the path is
/// under `/api/` and the client did not explicitly ask for HTML.
pub fn wants_json(accept: Option<&str>, path: &str) -> bool {
    let accept = accept.unwrap_or_default();
    accept.contains("application/json")
        || (path.starts_with("/api/") && !accept.contains("text/html"))
}

/// Build the 503 maintenance response in the negotiated representation.
pub fn maintenance_response(
    accept: Option<&str>,
    path: &str,
) -> Result<Response<Body>, axum::http::Error> {
    let (content_type, body) = if wants_json(accept, path) {
        ("application/json", MAINTENANCE_JSON)
    } else {
        ("text/html", MAINTENANCE_HTML)
    };
    Response::builder()
        .status(StatusCode::SERVICE_UNAVAILABLE)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
}

/// Build the 307 redirect to the target.
pub fn redirect_response(location: &str) -> Result<Response<Body>, axum::http::Error> {
    Response::builder()
        .status(StatusCode::TEMPORARY_REDIRECT)
        .header(header::LOCATION, location)
        .body(Body::empty())
}
