//! Maps a buffered `HttpResponse` to a success value or a typed failure.
//!
//! # Design
//! Success bodies are expected to be JSON whatever their declared content
//! type; only the non-2xx path looks at `Content-Type` to decide how to decode
//! the error body. HEAD, 204 and 205 carry no body by convention and are
//! rejected unless the caller opted in with `allow_empty_body`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ErrorBody, HttpFailure, ParseFailure};
use crate::http::{is_json_content_type, HttpMethod, HttpResponse};

pub fn classify<T: DeserializeOwned>(
    response: HttpResponse,
    method: HttpMethod,
    url: &str,
    allow_empty_body: bool,
) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(http_failure(response, method, url).into());
    }

    if method == HttpMethod::Head || matches!(response.status, 204 | 205) {
        return empty_body(&response, method, url, allow_empty_body);
    }

    match serde_json::from_slice::<T>(&response.body) {
        Ok(value) => Ok(value),
        Err(err) => Err(parse_failure(&response, method, url, &err).into()),
    }
}

fn http_failure(response: HttpResponse, method: HttpMethod, url: &str) -> HttpFailure {
    let text = response.text();
    let declared_json = response.content_type().is_some_and(is_json_content_type);

    let body = if text.is_empty() {
        ErrorBody::Empty
    } else if declared_json {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Text(text),
        }
    } else {
        ErrorBody::Text(text)
    };

    let message = if response.status_text.is_empty() {
        format!("{method} {url} failed with status {}", response.status)
    } else {
        format!(
            "{method} {url} failed with status {} {}",
            response.status, response.status_text
        )
    };

    HttpFailure {
        message,
        status: response.status,
        status_text: response.status_text,
        url: url.to_string(),
        method,
        headers: response.headers,
        body,
    }
}

fn empty_body<T: DeserializeOwned>(
    response: &HttpResponse,
    method: HttpMethod,
    url: &str,
    allow_empty_body: bool,
) -> Result<T, ApiError> {
    if !allow_empty_body {
        let message = format!(
            "{method} {url} returned {} with no body; empty responses are rejected unless allow_empty_body is set",
            response.status
        );
        return Err(failure_from(response, method, url, message, None).into());
    }
    T::deserialize(Value::Null).map_err(|err| {
        let message = format!("{method} {url} returned an empty body that cannot be read as the expected type: {err}");
        failure_from(response, method, url, message, None).into()
    })
}

fn parse_failure(response: &HttpResponse, method: HttpMethod, url: &str, err: &serde_json::Error) -> ParseFailure {
    let text = response.text();
    let message = if text.trim().is_empty() {
        format!("{method} {url} returned {} with an empty body; expected JSON", response.status)
    } else if serde_json::from_str::<Value>(&text).is_ok() {
        format!("{method} {url} returned JSON that does not match the expected type: {err}")
    } else {
        format!("{method} {url} returned {} with non-JSON content: {err}", response.status)
    };
    let body_text = (!text.is_empty()).then_some(text);
    failure_from(response, method, url, message, body_text)
}

fn failure_from(
    response: &HttpResponse,
    method: HttpMethod,
    url: &str,
    message: String,
    body_text: Option<String>,
) -> ParseFailure {
    ParseFailure {
        message,
        status: response.status,
        status_text: response.status_text.clone(),
        url: url.to_string(),
        method,
        content_type: response.content_type().map(str::to_string),
        body_text,
    }
}
