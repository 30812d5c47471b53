//! HTTP helper for Census API requests.
//!
//! All client methods go through [`get_json`] rather than calling
//! `reqwest::RequestBuilder::send()` directly, so every request gets the
//! same status handling and failure logging. Requests are sent once;
//! a failure is reported to the caller as-is.

use reqwest::StatusCode;

use crate::CensusError;

/// Maximum length of the response body preview included in logs and
/// errors.
const BODY_PREVIEW_LEN: usize = 500;

/// Sends a GET to `url` with `params` and parses the body as JSON.
///
/// # Errors
///
/// * [`CensusError::Http`] on transport failure.
/// * [`CensusError::NoDataFound`] on HTTP 204 or an empty body, which is
///   how the API answers a query that matches nothing.
/// * [`CensusError::Status`] on any other non-success status.
/// * [`CensusError::Json`] if the body is not JSON.
#[allow(clippy::future_not_send)]
pub async fn get_json(
    client: &reqwest::Client,
    url: &str,
    params: &[(&str, String)],
) -> Result<serde_json::Value, CensusError> {
    let response = client.get(url).query(params).send().await?;

    // Capture response metadata before consuming the body.
    let final_url = response.url().to_string();
    let status = response.status();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    log::debug!("GET {final_url} -> {status}");

    if status == StatusCode::NO_CONTENT {
        return Err(CensusError::NoDataFound { url: final_url });
    }

    let text = response.text().await?;

    if !status.is_success() {
        let body = preview(&text);
        log::warn!("Census API returned {status} for {final_url}: {body}");
        return Err(CensusError::Status {
            status: status.as_u16(),
            url: final_url,
            body,
        });
    }

    if text.trim().is_empty() {
        return Err(CensusError::NoDataFound { url: final_url });
    }

    serde_json::from_str(&text).map_err(|json_err| {
        log::error!(
            "JSON parse failed.\n  \
             url: {final_url}\n  \
             status: {status}\n  \
             content-type: {content_type:?}\n  \
             received: {} bytes\n  \
             parse error: {json_err}\n  \
             body preview: {}",
            text.len(),
            preview(&text),
        );
        CensusError::Json(json_err)
    })
}

/// Truncates `text` to [`BODY_PREVIEW_LEN`] bytes on a char boundary.
pub(crate) fn preview(text: &str) -> String {
    if text.len() <= BODY_PREVIEW_LEN {
        return text.to_string();
    }
    let mut end = BODY_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
