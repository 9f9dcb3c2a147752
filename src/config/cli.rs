use crate::config::toml_config::TomlConfig;
use crate::config::RequestConfig;
use crate::domain::model::{AidRequest, SosAlert};
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "climaaid")]
#[command(about = "Disaster preparedness dashboard client")]
pub struct CliConfig {
    /// Optional TOML file with an [api] table
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub timeout_ms: Option<u64>,

    #[arg(long)]
    pub retry_attempts: Option<u32>,

    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    #[arg(long, help = "Retry transient failures on read requests")]
    pub retry: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Load one or more pages (dashboard, prepare, respond, recovery)
    Page {
        #[arg(default_value = "dashboard")]
        pages: Vec<String>,
    },
    /// Fetch news for a specific location
    News {
        #[arg(long)]
        location: String,
        #[arg(long, default_value = "disaster")]
        category: String,
    },
    /// Send an SOS alert to emergency services
    Sos(SosArgs),
    /// Submit a recovery aid request
    Aid(AidArgs),
    /// Check the backend and its database
    Health,
}

#[derive(Debug, Clone, Args)]
pub struct SosArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub location: String,
    #[arg(long)]
    pub emergency_type: String,
    #[arg(long)]
    pub message: String,
    /// Confirm this is a real emergency
    #[arg(long)]
    pub yes: bool,
}

#[derive(Debug, Clone, Args)]
pub struct AidArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub location: String,
    #[arg(long)]
    pub aid_needed: String,
}

impl From<&SosArgs> for SosAlert {
    fn from(args: &SosArgs) -> Self {
        SosAlert {
            name: args.name.trim().to_string(),
            phone: args.phone.trim().to_string(),
            location: args.location.trim().to_string(),
            emergency_type: args.emergency_type.clone(),
            message: args.message.trim().to_string(),
        }
    }
}

impl From<&AidArgs> for AidRequest {
    fn from(args: &AidArgs) -> Self {
        AidRequest {
            name: args.name.trim().to_string(),
            location: args.location.trim().to_string(),
            aid_needed: args.aid_needed.trim().to_string(),
        }
    }
}

impl CliConfig {
    /// Flags override the config file, which overrides the defaults.
    pub fn request_config(&self) -> Result<RequestConfig> {
        let base = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.request_config(),
            None => RequestConfig::default(),
        };

        Ok(RequestConfig {
            base_url: self.base_url.clone().unwrap_or(base.base_url),
            timeout_ms: self.timeout_ms.unwrap_or(base.timeout_ms),
            retry_attempts: self.retry_attempts.unwrap_or(base.retry_attempts),
            retry_delay_ms: self.retry_delay_ms.unwrap_or(base.retry_delay_ms),
        })
    }
}
