use clap::Parser;
use climaaid::config::cli::{Command, CliConfig};
use climaaid::core::DisasterApi;
use climaaid::domain::model::{AidRequest, SosAlert};
use climaaid::utils::error::{ApiError, ErrorSeverity};
use climaaid::utils::{logger, validation::Validate};
use climaaid::{
    ClimaAidApi, PageOrchestrator, RetryPolicy, RetryingApi, TerminalMap, TerminalRenderer,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting ClimaAid client");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 2,
            ErrorSeverity::Medium => 3,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 4,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: &CliConfig) -> Result<(), ApiError> {
    // 載入並驗證配置
    let config = cli.request_config()?;
    config.validate()?;
    tracing::debug!("Request config: {:?}", config);

    let api = ClimaAidApi::new(&config)?;
    if cli.retry {
        tracing::info!(
            "🔁 Retrying reads up to {} times",
            config.retry_attempts
        );
        execute(RetryingApi::new(api, RetryPolicy::from_config(&config)), &cli.command).await
    } else {
        execute(api, &cli.command).await
    }
}

async fn execute<A: DisasterApi>(api: A, command: &Command) -> Result<(), ApiError> {
    let orchestrator = PageOrchestrator::new(api, TerminalRenderer::new(), TerminalMap::new());

    match command {
        Command::Page { pages } => {
            for page_id in pages {
                let outcome = orchestrator.load_page_by_id(page_id).await?;
                tracing::debug!("{}: {:?}", page_id, outcome);
            }
        }
        Command::News { location, category } => {
            let count = orchestrator.update_location_news(location, category).await?;
            tracing::debug!("{} articles for {}", count, location);
        }
        Command::Sos(args) => {
            if !args.yes {
                eprintln!("⚠️ An SOS alert notifies emergency services immediately.");
                eprintln!("   Only proceed if this is a real emergency; re-run with --yes to send.");
                return Ok(());
            }
            orchestrator.submit_sos(&SosAlert::from(args)).await?;
        }
        Command::Aid(args) => {
            orchestrator
                .submit_aid_request(&AidRequest::from(args))
                .await?;
        }
        Command::Health => {
            let health = orchestrator.api().health_check().await?;
            println!("health: {}", health);
            let db = orchestrator.api().test_database_connection().await?;
            println!("database: {}", db);
        }
    }

    Ok(())
}
