//! The one HTTP client every API call goes through.
//!
//! Requests are JSON in and JSON out (uploads are multipart in, JSON out).
//! Failures of any kind are flattened into [`TransportError`], logged once
//! here, and handed back unchanged. Nothing is retried.

use super::error::TransportError;
use crate::util::truncate;
use reqwest::header::ACCEPT;
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// How much of a non-JSON error body is kept in the message
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::Client,
    base_url: String,
}

impl Transport {
    /// Bind a client to `base_url`. `timeout: None` waits indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Single call primitive: `method path [json body]` decoded as `T`.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut builder = self
            .client
            .request(method.clone(), self.url(path))
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(method, path, builder).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        self.request::<T, ()>(Method::DELETE, path, None).await
    }

    /// Multipart POST; the response is still JSON.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, TransportError> {
        let builder = self
            .client
            .post(self.url(path))
            .header(ACCEPT, "application/json")
            .multipart(form);
        self.execute(Method::POST, path, builder).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, TransportError> {
        let result = self.send_and_decode(builder).await;
        match &result {
            Ok(_) => tracing::debug!(%method, path, "request completed"),
            Err(err) => tracing::warn!(
                %method,
                path,
                status = ?err.status,
                error = %err.message,
                "request failed"
            ),
        }
        result
    }

    async fn send_and_decode<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, TransportError> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(TransportError::new(
                Some(status.as_u16()),
                error_message(&text, status),
            ));
        }

        serde_json::from_str(&text).map_err(|e| {
            TransportError::new(
                Some(status.as_u16()),
                format!(
                    "unexpected response body: {} ({})",
                    e,
                    truncate(&text, ERROR_BODY_PREVIEW_CHARS)
                ),
            )
        })
    }
}

/// Prefer the service's `{"detail": ...}` payload; fall back to the raw body.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(other) => return truncate(&other.to_string(), ERROR_BODY_PREVIEW_CHARS),
            None => {}
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        truncate(trimmed, ERROR_BODY_PREVIEW_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_url_join_tolerates_slashes() {
        let transport = Transport::new("http://localhost:8000/", None).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8000");
        assert_eq!(transport.url("/chat"), "http://localhost:8000/chat");
        assert_eq!(transport.url("chat/history"), "http://localhost:8000/chat/history");
    }

    #[test]
    fn test_error_message_prefers_detail() {
        let msg = error_message(
            r#"{"detail": "Repository analysis failed: clone error"}"#,
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        );
        assert_eq!(msg, "Repository analysis failed: clone error");
    }

    #[test]
    fn test_error_message_falls_back_to_reason_for_empty_body() {
        let msg = error_message("", reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(msg, "Bad Gateway");
    }

    #[tokio::test]
    async fn test_request_sends_json_and_decodes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = Transport::new(&mock_server.uri(), None).unwrap();
        let value: serde_json::Value = transport
            .post("/echo", &json!({ "message": "hi" }))
            .await
            .unwrap();
        assert_eq!(value, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_non_success_status_maps_to_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/suggestions"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "detail": "backend exploded" })),
            )
            .mount(&mock_server)
            .await;

        let transport = Transport::new(&mock_server.uri(), None).unwrap();
        let err = transport
            .get::<serde_json::Value>("/suggestions")
            .await
            .unwrap_err();
        assert_eq!(err.status, Some(500));
        assert_eq!(err.message, "backend exploded");
    }

    #[tokio::test]
    async fn test_undecodable_body_is_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let transport = Transport::new(&mock_server.uri(), None).unwrap();
        let err = transport
            .get::<serde_json::Value>("/health")
            .await
            .unwrap_err();
        assert_eq!(err.status, Some(200));
        assert!(err.message.contains("unexpected response body"));
    }

    #[tokio::test]
    async fn test_unreachable_service_has_no_status() {
        // Port 9 (discard) on localhost is essentially never listening.
        let transport = Transport::new("http://127.0.0.1:9", Some(Duration::from_secs(2))).unwrap();
        let err = transport
            .get::<serde_json::Value>("/health")
            .await
            .unwrap_err();
        assert_eq!(err.status, None);
    }
}
