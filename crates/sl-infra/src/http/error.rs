use reqwest::{Response, StatusCode};

use sl_core::analysis::ApiError;

/// Longest server message kept in `ApiError::Status`.
const MAX_ERROR_BODY: usize = 512;

pub(crate) fn map_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else if let Some(status) = err.status() {
        status_error(status, err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

pub(crate) async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, body))
}

fn status_error(status: StatusCode, body: String) -> ApiError {
    if status == StatusCode::NOT_FOUND {
        return ApiError::NotFound;
    }
    let mut message = error_message(&body).unwrap_or(body);
    if message.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
    }
    if message.is_empty() {
        message = status.canonical_reason().unwrap_or("unknown").to_string();
    }
    ApiError::Status {
        code: status.as_u16(),
        message,
    }
}

/// Pulls `detail`/`message`/`error` out of a JSON error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["detail", "message", "error"]
        .iter()
        .find_map(|key| value.get(*key)?.as_str().map(str::to_string))
}
