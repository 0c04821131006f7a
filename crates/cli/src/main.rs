use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use compose::ComposeCli;
use server::config::{AppConfig, DEFAULT_CONFIG_FILE};
use server::{create_router, state::AppState};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stackctl")]
#[command(about = "HTTP control surface for a local container stack", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Stack directory holding the manifest and env file
    #[arg(long, global = true)]
    stack_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API and dashboard
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,

        /// Open the dashboard in a browser once listening
        #[arg(long)]
        open: bool,
    },
    /// Print the services the orchestrator reports
    Status,
    /// Verify the orchestrator and stack files are in place
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = AppConfig::load(&cli.config)
        .await
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    if let Some(dir) = cli.stack_dir {
        config.stack.dir = dir;
    }

    match cli.command {
        Some(Commands::Serve { host, port, open }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config, open).await
        }
        Some(Commands::Status) => status(config).await,
        Some(Commands::Check) => check(config),
        None => serve(config, false).await,
    }
}

async fn serve(config: AppConfig, open_browser: bool) -> Result<()> {
    tracing::info!("Stack directory: {}", config.stack.dir.display());
    tracing::info!("Orchestrator: {}", config.stack.command.join(" "));

    let mut state = AppState::new(config.stack.clone());
    if let Some(dashboard_dir) = config.server.dashboard_dir.clone() {
        state = state.with_dashboard_dir(dashboard_dir);
    }
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr()))?;
    let local_addr = listener.local_addr()?;

    println!();
    println!("Stack Control - {}", config.stack.manifest_path().display());
    println!("════════════════════════════════════════");
    println!();
    println!("  Dashboard:   http://localhost:{}", local_addr.port());
    println!("  Swagger UI:  http://localhost:{}/swagger-ui", local_addr.port());
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    if open_browser {
        let url = format!("http://localhost:{}", local_addr.port());
        tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        });
    }

    tracing::info!("Server listening on {}", local_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn status(config: AppConfig) -> Result<()> {
    let compose = ComposeCli::new(config.stack);
    let listing = compose.status().await?;

    println!();
    if listing.services.is_empty() {
        println!("No services running.");
    } else {
        println!("Services ({}):", listing.services.len());
        for record in &listing.services {
            let name = record.service_name().unwrap_or("?");
            let state = record.state().unwrap_or("unknown");
            let state_str = match state {
                "running" => state.green(),
                "exited" | "dead" => state.red(),
                _ => state.yellow(),
            };
            match record.health() {
                Some(health) => println!("  {:<24} {} ({})", name, state_str, health),
                None => println!("  {:<24} {}", name, state_str),
            }
        }
    }

    for failure in &listing.failures {
        println!(
            "  {} line {}: {}",
            "unreadable".red(),
            failure.line,
            failure.error
        );
    }
    println!();

    Ok(())
}

fn check(config: AppConfig) -> Result<()> {
    let stack = &config.stack;
    let mut failed = 0;

    let mut report = |ok: bool, label: String| {
        if ok {
            println!("  {} {}", "✓".green(), label);
        } else {
            failed += 1;
            println!("  {} {}", "✗".red(), label);
        }
    };

    println!();
    report(
        which::which(stack.program()).is_ok(),
        format!("{} on PATH", stack.program()),
    );
    report(
        stack.dir.is_dir(),
        format!("stack directory {}", stack.dir.display()),
    );
    report(
        stack.manifest_path().is_file(),
        format!("manifest {}", stack.manifest_path().display()),
    );
    report(
        stack.env_path().is_file(),
        format!("env file {}", stack.env_path().display()),
    );
    report(
        !stack.services.is_empty(),
        format!("{} services configured", stack.services.len()),
    );
    println!();

    if failed > 0 {
        bail!("{} check(s) failed", failed);
    }

    println!("All checks passed.");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "stackctl=info,server=info,compose=info,tower_http=info".into()
            }),
        )
        .init();
}
