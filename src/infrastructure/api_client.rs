//! Data Access Client: five verb operations over an [`HttpTransport`] with a
//! uniform success/error contract.
//!
//! Every call is sent once. There are no retries, timeouts or cancellation;
//! a non-OK status is turned into an [`ApiError`] whose message is, in order:
//! the body's `error.message`, the body's `message`, or
//! `"API Error: <status text>"`. A body that is not JSON counts as empty, for
//! all five verbs alike.

use crate::error::ApiError;
use crate::infrastructure::http_transport::{HttpRequest, HttpResponse, HttpTransport};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Per-call options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Bearer credential for the `Authorization` header.
    pub credential: Option<String>,
}

impl RequestOptions {
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: Some(credential.into()),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    session_cookie: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie: None,
        }
    }

    /// Ambient session cookie attached to every request.
    pub fn with_session_cookie(mut self, cookie: Option<String>) -> Self {
        self.session_cookie = cookie;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<T, ApiError> {
        self.request(Method::GET, path, None, options).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B, options: &RequestOptions) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(body)?;
        self.request(Method::POST, path, Some(body), options).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B, options: &RequestOptions) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(body)?;
        self.request(Method::PATCH, path, Some(body), options).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B, options: &RequestOptions) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(body)?;
        self.request(Method::PUT, path, Some(body), options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, None, options).await
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        options: &RequestOptions,
    ) -> HttpRequest {
        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        if let Some(cookie) = &self.session_cookie {
            headers.push(("Cookie".to_string(), cookie.clone()));
        }
        if let Some(credential) = &options.credential {
            headers.push(("Authorization".to_string(), format!("Bearer {credential}")));
        }

        HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers,
            body,
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        options: &RequestOptions,
    ) -> Result<T, ApiError> {
        let request = self.build_request(method, path, body, options);
        tracing::debug!(method = %request.method, url = %request.url, "API request");

        let response = self.transport.send(request).await?;
        if !response.is_ok() {
            let err = normalize_error(&response);
            tracing::debug!(status = response.status, error = %err, "API request failed");
            return Err(err);
        }

        decode(&response)
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    // 204 and friends carry no body; let callers decode that as `null`.
    let text = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Build the error for a non-OK response.
pub fn normalize_error(response: &HttpResponse) -> ApiError {
    let parsed: Value =
        serde_json::from_str(&response.body).unwrap_or_else(|_| Value::Object(Default::default()));

    let nested = parsed.get("error");
    let message = nested
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .or_else(|| parsed.get("message").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("API Error: {}", response.status_text));
    let code = nested
        .and_then(|e| e.get("code"))
        .and_then(Value::as_str)
        .map(str::to_string);

    ApiError::Status {
        status: response.status,
        message,
        code,
    }
}
