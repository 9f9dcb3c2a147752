use crate::core::http_client::HttpClient;
use crate::core::retry::{with_retry, RetryPolicy};
use crate::core::{ConfigProvider, DisasterApi};
use crate::domain::model::{
    AidRequest, Instruction, KitItem, NewsArticle, Organization, Shelter, SosAlert,
};
use crate::utils::error::{ApiError, Result};
use crate::utils::validation::{
    validate_max_length, validate_non_empty_string, validate_phone, validate_required_fields,
    Validate, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const DEFAULT_NEWS_LOCATION: &str = "India";
pub const DEFAULT_NEWS_CATEGORY: &str = "disaster";

impl Validate for SosAlert {
    fn validate(&self) -> Result<()> {
        validate_required_fields(&[
            ("name", self.name.as_str()),
            ("phone", self.phone.as_str()),
            ("location", self.location.as_str()),
            ("emergency_type", self.emergency_type.as_str()),
            ("message", self.message.as_str()),
        ])?;
        validate_phone("phone", &self.phone)?;
        validate_max_length(
            "name",
            &self.name,
            MAX_NAME_LENGTH,
            "Name must be at most 255 characters",
        )?;
        validate_max_length(
            "location",
            &self.location,
            MAX_DESCRIPTION_LENGTH,
            "Location description must be at most 1000 characters",
        )
    }
}

impl Validate for AidRequest {
    fn validate(&self) -> Result<()> {
        validate_required_fields(&[
            ("name", self.name.as_str()),
            ("location", self.location.as_str()),
            ("aid_needed", self.aid_needed.as_str()),
        ])?;
        validate_max_length(
            "name",
            &self.name,
            MAX_NAME_LENGTH,
            "Name must be at most 255 characters",
        )?;
        validate_max_length(
            "location",
            &self.location,
            MAX_DESCRIPTION_LENGTH,
            "Location description must be at most 1000 characters",
        )?;
        validate_max_length(
            "aid_needed",
            &self.aid_needed,
            MAX_DESCRIPTION_LENGTH,
            "Aid description must be at most 1000 characters",
        )
    }
}

/// Backend client: validates locally, then calls the endpoint.
#[derive(Debug, Clone)]
pub struct ClimaAidApi {
    http: HttpClient,
}

impl ClimaAidApi {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    pub fn from_http(http: HttpClient) -> Self {
        Self { http }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        context: &str,
    ) -> Result<T> {
        let result = match self.http.get(path, query).await {
            Ok(body) => decode(body),
            Err(e) => Err(e),
        };
        result.map_err(|e| {
            tracing::error!("Error calling {}: {}", path, e);
            e.with_context(context)
        })
    }

    async fn submit(&self, path: &str, body: Value, context: &str) -> Result<Value> {
        self.http.post(path, &body).await.map_err(|e| {
            tracing::error!("Error calling {}: {}", path, e);
            e.with_context(context)
        })
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}

fn to_body<T: serde::Serialize>(payload: &T) -> Result<Value> {
    serde_json::to_value(payload).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}

#[async_trait]
impl DisasterApi for ClimaAidApi {
    async fn get_news(&self, location: &str) -> Result<Vec<NewsArticle>> {
        validate_non_empty_string("location", location, "Location is required")?;
        self.fetch(
            "/prepare/news",
            &[("location", location.trim())],
            "Failed to fetch news",
        )
        .await
    }

    async fn get_location_news(&self, location: &str, category: &str) -> Result<Vec<NewsArticle>> {
        validate_non_empty_string("location", location, "Location is required")?;
        let location = location.trim();
        let category = if category.trim().is_empty() {
            DEFAULT_NEWS_CATEGORY
        } else {
            category
        };
        self.fetch(
            "/prepare/news",
            &[("location", location), ("category", category)],
            &format!("Failed to fetch news for {}", location),
        )
        .await
    }

    async fn get_kit_items(&self) -> Result<Vec<KitItem>> {
        self.fetch("/prepare/kit", &[], "Failed to fetch emergency kit items")
            .await
    }

    async fn get_instructions(&self) -> Result<Vec<Instruction>> {
        self.fetch("/prepare/instructions", &[], "Failed to fetch safety instructions")
            .await
    }

    async fn get_shelters(&self) -> Result<Vec<Shelter>> {
        self.fetch("/respond/shelters", &[], "Failed to fetch shelter information")
            .await
    }

    async fn send_sos_alert(&self, alert: &SosAlert) -> Result<Value> {
        alert.validate()?;
        tracing::info!("🚨 sending SOS alert ({})", alert.emergency_type);
        self.submit("/respond/sos", to_body(alert)?, "Failed to send SOS alert")
            .await
    }

    async fn get_organizations(&self) -> Result<Vec<Organization>> {
        self.fetch(
            "/recover/organizations",
            &[],
            "Failed to fetch recovery organizations",
        )
        .await
    }

    async fn submit_aid_request(&self, request: &AidRequest) -> Result<Value> {
        request.validate()?;
        self.submit(
            "/recover/request-aid",
            to_body(request)?,
            "Failed to submit aid request",
        )
        .await
    }

    async fn health_check(&self) -> Result<Value> {
        self.http.get("/health", &[]).await.map_err(|e| {
            tracing::error!("Health check failed: {}", e);
            e
        })
    }

    async fn test_database_connection(&self) -> Result<Value> {
        self.http.get("/test/db", &[]).await.map_err(|e| {
            tracing::error!("Database test failed: {}", e);
            e
        })
    }
}

/// Wraps any [`DisasterApi`] so read operations are retried on transient
/// failures. Submissions pass straight through.
pub struct RetryingApi<A: DisasterApi> {
    inner: A,
    policy: RetryPolicy,
}

impl<A: DisasterApi> RetryingApi<A> {
    pub fn new(inner: A, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

#[async_trait]
impl<A: DisasterApi> DisasterApi for RetryingApi<A> {
    async fn get_news(&self, location: &str) -> Result<Vec<NewsArticle>> {
        with_retry(&self.policy, || self.inner.get_news(location)).await
    }

    async fn get_location_news(&self, location: &str, category: &str) -> Result<Vec<NewsArticle>> {
        with_retry(&self.policy, || self.inner.get_location_news(location, category)).await
    }

    async fn get_kit_items(&self) -> Result<Vec<KitItem>> {
        with_retry(&self.policy, || self.inner.get_kit_items()).await
    }

    async fn get_instructions(&self) -> Result<Vec<Instruction>> {
        with_retry(&self.policy, || self.inner.get_instructions()).await
    }

    async fn get_shelters(&self) -> Result<Vec<Shelter>> {
        with_retry(&self.policy, || self.inner.get_shelters()).await
    }

    // 不重送，避免重複的求救通知
    async fn send_sos_alert(&self, alert: &SosAlert) -> Result<Value> {
        self.inner.send_sos_alert(alert).await
    }

    async fn get_organizations(&self) -> Result<Vec<Organization>> {
        with_retry(&self.policy, || self.inner.get_organizations()).await
    }

    async fn submit_aid_request(&self, request: &AidRequest) -> Result<Value> {
        self.inner.submit_aid_request(request).await
    }

    async fn health_check(&self) -> Result<Value> {
        with_retry(&self.policy, || self.inner.health_check()).await
    }

    async fn test_database_connection(&self) -> Result<Value> {
        with_retry(&self.policy, || self.inner.test_database_connection()).await
    }
}
