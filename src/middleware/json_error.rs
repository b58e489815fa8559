use axum::{
    body::{Bytes, to_bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError,
    response::{error_response, log_app_error},
};

const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;

/// Rewrites plain-text or empty error responses (axum rejections, unknown
/// routes, wrong methods) into the JSON error envelope, keeping the status.
pub async fn json_error_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    if has_content_type(&response, |value| {
        value.contains("application/json") || value.contains("+json")
    }) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let message = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => body_bytes_to_message(status, bytes),
        Err(_) => default_message(status),
    };
    let app_error = AppError::new(status, message);
    if status.is_server_error() {
        log_app_error(&app_error, status);
    }

    let mut new_response = error_response(&app_error);
    copy_headers(&parts.headers, &mut new_response);
    new_response
}

fn has_content_type(response: &Response, matches: impl Fn(&str) -> bool) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| matches(&value.to_ascii_lowercase()))
        .unwrap_or(false)
}

fn body_bytes_to_message(status: StatusCode, bytes: Bytes) -> String {
    let message = String::from_utf8_lossy(&bytes).trim().to_string();
    if message.is_empty() {
        return default_message(status);
    }
    message
}

fn default_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

fn copy_headers(src: &HeaderMap, dest: &mut Response) {
    for (name, value) in src {
        if name == header::CONTENT_TYPE || name == header::CONTENT_LENGTH {
            continue;
        }
        dest.headers_mut().insert(name.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Bytes, http::StatusCode};

    use super::{body_bytes_to_message, default_message};

    #[test]
    fn blank_bodies_fall_back_to_the_reason_phrase() {
        assert_eq!(
            body_bytes_to_message(StatusCode::NOT_FOUND, Bytes::from_static(b"  \n")),
            "Not Found"
        );
        assert_eq!(
            body_bytes_to_message(StatusCode::BAD_REQUEST, Bytes::from_static(b" bad json ")),
            "bad json"
        );
        assert_eq!(default_message(StatusCode::METHOD_NOT_ALLOWED), "Method Not Allowed");
    }
}
