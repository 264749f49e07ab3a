use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::Router;
use clap::{Parser, Subcommand};
use environment_provider::{EnvironmentProviderConfig, EnvironmentProviderModule};
use mimalloc::MiMalloc;
use teco_bootstrap::{AppConfig, CliArgs, module_config_or_default};
use tower_http::trace::TraceLayer;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Key of the environment provider section under `modules`.
const ENVIRONMENT_PROVIDER: &str = "environment_provider";

const REDACTED: &str = "***REDACTED***";

/// Teco Server - starts test containers on demand and serves their
/// connection settings as a Spring Cloud Config environment
#[derive(Parser)]
#[command(name = "teco-server")]
#[command(about = "Teco Server - on-demand test containers behind a config-server API")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Print effective module configuration (JSON, secrets redacted) and exit
    #[arg(long)]
    dump_modules_config_json: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // 1) defaults -> 2) YAML (if provided) -> 3) env (APP__*) -> 4) CLI overrides
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    // Dumps go to stdout before logging is set up so the output stays parseable.
    if args.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }
    if cli.dump_modules_config_json {
        println!("{}", render_modules_config(&config)?);
        return Ok(());
    }

    let _logging = teco_bootstrap::init_logging(&config.logging)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Teco server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.server.socket_addr()?;
    environment_provider_config(config)?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

fn environment_provider_config(config: &AppConfig) -> Result<EnvironmentProviderConfig> {
    Ok(module_config_or_default(config, ENVIRONMENT_PROVIDER)?)
}

/// Effective module sections with defaults filled in.
fn render_modules_config(config: &AppConfig) -> Result<String> {
    let mut provider = environment_provider_config(config)?;
    provider.mysql.password = REDACTED.to_owned();

    let rendered = serde_json::json!({
        ENVIRONMENT_PROVIDER: { "config": provider },
    });
    serde_json::to_string_pretty(&rendered).context("Failed to serialize modules configuration")
}

async fn run_server(config: AppConfig) -> Result<()> {
    let addr = config.server.socket_addr()?;
    let module = EnvironmentProviderModule::new(&environment_provider_config(&config)?);

    let app = module
        .register_rest(Router::new())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener to {addr}"))?;
    tracing::info!(%addr, "HTTP server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated with an error");

    module.shutdown();
    served
}

async fn shutdown_signal() {
    match teco_bootstrap::wait_for_shutdown().await {
        Ok(signal) => {
            tracing::info!(?signal, "shutdown: stopping HTTP server, then removing containers");
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "shutdown: primary waiter failed, falling back to ctrl_c()"
            );
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}
