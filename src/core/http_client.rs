use crate::core::ConfigProvider;
use crate::utils::error::{ApiError, Result};
use reqwest::{header, Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Thin JSON transport over the backend. One request per call, no retries.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms());
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::config("http_client", e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.build_url(path, query)?;
        tracing::debug!("➡️ {} {}", method, url);

        let mut builder = self
            .client
            .request(method, url)
            .timeout(self.timeout)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        tracing::debug!("⬅️ {} {}", status, path);

        if !status.is_success() {
            let text = response.text().await.map_err(map_transport_error)?;
            return Err(ApiError::HttpStatus {
                code: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Decode {
                    message: e.to_string(),
                }
            }
        })
    }

    fn build_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ApiError::config("api.base_url", format!("Invalid URL format: {}", e)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

fn map_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        tracing::warn!("⏱️ request timed out: {}", e);
        ApiError::Timeout
    } else {
        tracing::warn!("🔌 network failure: {}", e);
        ApiError::NetworkUnavailable
    }
}

/// Prefers the backend's `{"error": "..."}` body over the status line.
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => json
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16())),
        Err(_) => format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        ),
    }
}
