use anyhow::{Context, Result};
use clap::Parser;
use devops_gpt_tui::api::{ApiClient, Backend};
use devops_gpt_tui::config::{Config, Overrides};
use devops_gpt_tui::session::{Request, Session};
use devops_gpt_tui::ui::{App, SettingsView};
use devops_gpt_tui::{app, logging};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "devops-gpt",
    about = "Terminal client for the DevOps GPT analysis service",
    version
)]
struct Args {
    /// Base URL of the service (overrides config and DEVOPS_GPT_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Request timeout in seconds, 0 to wait indefinitely
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Load the service's chat history and current analysis at startup
    #[arg(long)]
    resume: bool,

    /// Submit a repository for analysis at startup
    #[arg(long, value_name = "URL")]
    analyze: Option<String>,

    /// Check the service is reachable and exit (no TUI)
    #[arg(long)]
    check: bool,

    /// Write the effective API URL and timeout to the config file
    #[arg(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_path = match logging::init() {
        Ok(path) => Some(path),
        Err(e) => {
            eprintln!("  Warning: logging disabled: {}", e);
            None
        }
    };

    let mut config = Config::load();
    config.apply_env()?;
    config.apply_overrides(&Overrides {
        api_url: args.api_url.clone(),
        timeout_secs: args.timeout,
    });
    config.validate()?;

    if args.save_config {
        let path = config.save()?;
        eprintln!("  Saved config to {}", path.display());
    }

    let client = ApiClient::new(&config.api_base_url, config.request_timeout())
        .context("Failed to create HTTP client")?;
    tracing::info!(api = %client.base_url(), timeout = ?config.request_timeout(), "client configured");

    if args.check {
        return run_check(&client).await;
    }

    let mut session = Session::new();
    let mut startup: Vec<Request> = Vec::new();
    if args.resume {
        startup.extend(session.request_history());
    }
    match args.analyze {
        Some(url) => {
            session.repo_url_draft = url;
            startup.extend(session.submit_repository_url());
        }
        None if args.resume => startup.extend(session.request_current_analysis()),
        None => {}
    }

    let settings = SettingsView {
        api_base_url: config.api_base_url.clone(),
        request_timeout: config.request_timeout(),
        config_path: Config::config_path(),
        log_path,
    };
    let backend: Arc<dyn Backend> = Arc::new(client);

    app::run_tui(App::new(session, settings), backend, startup).await
}

/// Probe `GET /health` and report on stdout.
async fn run_check(client: &ApiClient) -> Result<()> {
    let status = client
        .health()
        .await
        .with_context(|| format!("Service at {} is unreachable", client.base_url()))?;
    if !status.is_healthy() {
        anyhow::bail!("Service at {} reports {:?}", client.base_url(), status.status);
    }
    println!(
        "{} is {}{}",
        client.base_url(),
        status.status,
        status
            .service
            .map(|s| format!(" ({})", s))
            .unwrap_or_default()
    );
    Ok(())
}
