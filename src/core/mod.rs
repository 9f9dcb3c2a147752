pub mod api;
pub mod http_client;
pub mod orchestrator;
pub mod retry;

pub use crate::domain::model::{DataSource, MessageKind, Page, PageState};
pub use crate::domain::ports::{ConfigProvider, DisasterApi, MapWidget, Renderer};
pub use crate::utils::error::Result;
