use crate::domain::model::{
    AidRequest, Instruction, KitItem, MessageKind, NewsArticle, Organization, Shelter, SosAlert,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout_ms(&self) -> u64;
    fn retry_attempts(&self) -> u32;
    fn retry_delay_ms(&self) -> u64;
}

/// One operation per backend capability.
#[async_trait]
pub trait DisasterApi: Send + Sync {
    async fn get_news(&self, location: &str) -> Result<Vec<NewsArticle>>;
    async fn get_location_news(&self, location: &str, category: &str) -> Result<Vec<NewsArticle>>;
    async fn get_kit_items(&self) -> Result<Vec<KitItem>>;
    async fn get_instructions(&self) -> Result<Vec<Instruction>>;
    async fn get_shelters(&self) -> Result<Vec<Shelter>>;
    async fn send_sos_alert(&self, alert: &SosAlert) -> Result<Value>;
    async fn get_organizations(&self) -> Result<Vec<Organization>>;
    async fn submit_aid_request(&self, request: &AidRequest) -> Result<Value>;
    async fn health_check(&self) -> Result<Value>;
    async fn test_database_connection(&self) -> Result<Value>;
}

/// Presentation side of the dashboard. Empty slices mean "show the empty state".
pub trait Renderer: Send + Sync {
    fn render_news(&self, articles: &[NewsArticle]);
    fn render_location_news(&self, articles: &[NewsArticle]);
    fn render_kit_items(&self, items: &[KitItem]);
    fn render_instructions(&self, instructions: &[Instruction]);
    fn render_organizations(&self, organizations: &[Organization]);
    fn show_message(&self, message: &str, kind: MessageKind);
    fn set_loading(&self, loading: bool);
}

pub trait MapWidget: Send + Sync {
    fn init_map(&self);
    /// Clears existing markers before drawing the given shelters.
    fn add_shelter_markers(&self, shelters: &[Shelter]);
    fn invalidate_map_size(&self);
}
