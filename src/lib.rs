pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::terminal::{TerminalMap, TerminalRenderer};
pub use config::RequestConfig;
pub use core::{
    api::{ClimaAidApi, RetryingApi},
    orchestrator::{FetchResult, LoadOutcome, PageOrchestrator},
    retry::{with_retry, RetryPolicy},
};
pub use utils::error::{ApiError, Result};
