//! Health/info service entry point.

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use e2e_app::api::{bind, serve, AppState};
use e2e_app::config::{self, Config};
use e2e_app::metrics;
use e2e_app::verifier::{self, CredentialSource, PollPolicy, VerifierConfig};

/// Minimal health/info HTTP service.
#[derive(Parser, Debug)]
#[command(name = "e2e-app")]
#[command(about = "Health and info HTTP service with an end-to-end verifier")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Listening port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (default).
    Serve,

    /// Print the resolved configuration.
    CheckConfig,

    /// Poll a deployed instance's /health endpoint.
    Verify {
        /// Base URL of the service (overrides APP_URL).
        #[arg(long)]
        url: Option<String>,
    },

    /// Show which cluster credentials the verifier would use.
    Cluster,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    let loaded = Config::load();
    let json_logs = loaded.as_ref().map(Config::json_logs).unwrap_or(false);

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("e2e_app=debug,info")
    } else {
        EnvFilter::new(config::resolve("RUST_LOG", "info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    let mut config = loaded.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    if let Some(port) = args.port {
        config.port = port;
    }

    match args.command {
        None | Some(Command::Serve) => cmd_serve(config).await,
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Verify { url }) => cmd_verify(url).await,
        Some(Command::Cluster) => cmd_cluster(),
    }
}

/// Run the HTTP service until a shutdown signal.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    if let Some(port) = &config.metrics_port {
        match port.parse::<u16>() {
            Ok(port) => {
                if let Err(e) = metrics::install_exporter(port) {
                    warn!("Failed to start metrics exporter: {}", e);
                }
            }
            Err(e) => warn!("Ignoring invalid METRICS_PORT {:?}: {}", port, e),
        }
    }

    info!("Server starting on port {}", config.port);
    let listener = bind(&config.bind_addr()).await?;

    serve(listener, AppState::new(config)).await?;
    info!("Server stopped");

    Ok(())
}

/// Print the resolved configuration.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    let verifier_config = VerifierConfig::load()?;
    let policy = PollPolicy::default();

    println!("======================================================================");
    println!("E2E APP - CONFIGURATION");
    println!("======================================================================");
    println!("  Bind Address: {}", config.bind_addr());
    println!("  App Version: {}", config.app_version);
    println!("  Environment: {}", config.environment);
    println!("  Log Format: {}", config.log_format);
    println!(
        "  Metrics Port: {}",
        config.metrics_port.as_deref().unwrap_or("disabled")
    );
    println!("----------------------------------------------------------------------");
    println!("  Verifier Target: {}", verifier_config.health_url());
    println!("  Max Attempts: {}", policy.max_attempts);
    println!("  Retry Delay: {:?}", policy.delay);
    println!("  Request Timeout: {:?}", policy.timeout);
    println!("======================================================================");

    verifier_config.validate()?;
    Ok(())
}

/// Run the verifier once against APP_URL or `--url`.
async fn cmd_verify(url: Option<String>) -> anyhow::Result<()> {
    let mut verifier_config = VerifierConfig::load()?;
    if let Some(url) = url {
        verifier_config.app_url = url;
    }
    let attempts = verifier::run_verifier(&verifier_config, PollPolicy::default()).await?;

    info!("E2E check completed successfully after {} attempt(s)", attempts);
    Ok(())
}

/// Print the discovered cluster credential source.
fn cmd_cluster() -> anyhow::Result<()> {
    let settings = verifier::discover_from_env()?;

    match &settings.source {
        CredentialSource::InCluster {
            host,
            port,
            token_path,
        } => {
            println!("In-cluster: https://{}:{}", host, port);
            println!("  Token: {}", token_path.display());
        }
        CredentialSource::Kubeconfig(path) => {
            println!("Kubeconfig: {}", path.display());
        }
    }
    println!("  Timeout: {:?}", settings.timeout);

    Ok(())
}
