//! Response Renderer - JSON and HTML Representations
//!
//! Turns an Upstream Result into an HTTP response. Every failure except
//! caller validation becomes a 500, including upstream 4xx: the upstream
//! status travels in the body as diagnostic detail, never as the status.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::{Value, json};

use crate::domain::{KLINE_COLUMNS, ProxyError};

/// Representation chosen by the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Json,
    Html,
}

impl OutputFormat {
    /// Render `result` in this format.
    pub fn render(self, result: Result<Value, ProxyError>) -> Response {
        match self {
            Self::Json => render_json(result),
            Self::Html => render_html(result),
        }
    }
}

/// Payload verbatim on success, structured error object otherwise.
pub fn render_json(result: Result<Value, ProxyError>) -> Response {
    match result {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(err) => {
            let (status, body) = json_error(&err);
            (status, Json(body)).into_response()
        }
    }
}

/// Status and body for a failed request in the JSON representation.
pub fn json_error(err: &ProxyError) -> (StatusCode, Value) {
    match err {
        ProxyError::Validation(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
        ProxyError::UpstreamHttp { status, body } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "error": err.kind(),
                "status_code": status,
                "detail": body,
            }),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "error": other.kind(),
                "detail": other.to_string(),
            }),
        ),
    }
}

/// Kline table on success, minimal HTML error fragment otherwise.
pub fn render_html(result: Result<Value, ProxyError>) -> Response {
    match result.and_then(|payload| kline_table(&payload)) {
        Ok(page) => (StatusCode::OK, Html(page)).into_response(),
        Err(ProxyError::Validation(message)) => (
            StatusCode::BAD_REQUEST,
            Html(format!("<p>{}</p>", escape_html(&message))),
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!(
                "<html><body><pre>Error: {}</pre></body></html>",
                escape_html(&err.to_string())
            )),
        )
            .into_response(),
    }
}

/// Render a kline array as an HTML table with the 12-column header.
///
/// Fails when the payload is not an array of arrays.
pub fn kline_table(payload: &Value) -> Result<String, ProxyError> {
    let rows = payload
        .as_array()
        .ok_or_else(|| ProxyError::Unexpected("expected a JSON array of klines".to_string()))?;

    let mut page = String::from("<html><body><h1>Binance Klines</h1><table border=\"1\"><tr>");
    for column in KLINE_COLUMNS {
        page.push_str("<th>");
        page.push_str(column);
        page.push_str("</th>");
    }
    page.push_str("</tr>");

    for (i, row) in rows.iter().enumerate() {
        let cells = row.as_array().ok_or_else(|| {
            ProxyError::Unexpected(format!("kline row {i} is not an array"))
        })?;
        page.push_str("<tr>");
        for cell in cells {
            page.push_str("<td>");
            page.push_str(&escape_html(&cell_text(cell)));
            page.push_str("</td>");
        }
        page.push_str("</tr>");
    }

    page.push_str("</table></body></html>");
    Ok(page)
}

/// Strings unquoted, everything else as its JSON text.
fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
