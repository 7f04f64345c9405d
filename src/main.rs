//! zonebrew - band-constrained recipe search service
//!
//! # Usage
//!
//! ```bash
//! # Serve the JSON API (default 0.0.0.0:8080)
//! zonebrew
//!
//! # Serve with a custom catalog and address
//! zonebrew --catalog catalog.json --addr 127.0.0.1:9000
//!
//! # One-off search from a JSON request file
//! zonebrew solve --request request.json --pretty
//!
//! # Validate a catalog file
//! zonebrew check-catalog catalog.json
//! ```
//!
//! # Environment Variables
//!
//! - `ZONEBREW_CONFIG`: Path to the service TOML config
//! - `ZONEBREW_CATALOG`: Path to a JSON catalog
//! - `ZONEBREW_CORS_ORIGINS`: Comma-separated allowed CORS origins
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use zonebrew::api::handlers::SolveResponse;
use zonebrew::api::request::SolveRequest;
use zonebrew::api::{create_app, AppState};
use zonebrew::config::{self, ServiceConfig};
use zonebrew::{search, Catalog};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "zonebrew")]
#[command(about = "Band-constrained recipe search engine")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// JSON catalog file; takes precedence over ZONEBREW_CATALOG and the config
    #[arg(short, long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Run the HTTP API (the default)
    Serve,

    /// Run one search from a JSON request file and print the outcome
    Solve {
        /// Path to the request JSON (same shape as POST /api/v1/solve)
        #[arg(long, short)]
        request: PathBuf,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a JSON catalog file and print a summary
    CheckCatalog {
        path: PathBuf,
    },
}

// ============================================================================
// Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    if let Some(SubCommand::CheckCatalog { path }) = &args.command {
        return check_catalog(path);
    }

    // Load service configuration
    config::init(ServiceConfig::load());
    let cfg = config::get();

    let catalog = match &args.catalog {
        Some(path) => Catalog::load_from_file(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => Catalog::load(cfg.catalog.path.as_deref()).context("Failed to load catalog")?,
    };
    info!(
        ingredients = catalog.len(),
        styles = catalog.styles().len(),
        "Catalog ready"
    );

    match args.command {
        Some(SubCommand::Solve { request, pretty }) => run_solve(&catalog, cfg, &request, pretty),
        Some(SubCommand::CheckCatalog { .. }) => Ok(()),
        Some(SubCommand::Serve) | None => {
            let addr = args.addr.unwrap_or_else(|| cfg.server.addr.clone());
            serve(catalog, cfg.clone(), &addr).await
        }
    }
}

// ============================================================================
// Subcommands
// ============================================================================

async fn serve(catalog: Catalog, cfg: ServiceConfig, addr: &str) -> Result<()> {
    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let app = create_app(AppState::new(catalog, cfg));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!("HTTP server listening on {}", addr);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
            info!("[HttpServer] Received shutdown signal");
        })
        .await;

    match result {
        Ok(()) => {
            info!("[HttpServer] Graceful shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("[HttpServer] Server error: {}", e);
            Err(anyhow::anyhow!("HTTP server error: {}", e))
        }
    }
}

fn run_solve(catalog: &Catalog, cfg: &ServiceConfig, request: &Path, pretty: bool) -> Result<()> {
    let raw = std::fs::read_to_string(request)
        .with_context(|| format!("Failed to read {}", request.display()))?;
    let body: SolveRequest = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid solve request {}", request.display()))?;

    let parsed = body.parse(&cfg.solver, catalog);
    let outcome = search(catalog, &parsed.style, &parsed.requests, &parsed.params)?;
    info!(
        style = %parsed.style,
        solutions = outcome.solutions.len(),
        total = outcome.total_solutions,
        partial = outcome.partial,
        visited_nodes = outcome.visited_nodes,
        "Search finished"
    );

    let response = SolveResponse {
        style: parsed.style,
        requests: parsed.requests,
        messages: outcome.notes.iter().map(ToString::to_string).collect(),
        outcome,
    };
    let out = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{out}");
    Ok(())
}

fn check_catalog(path: &Path) -> Result<()> {
    let catalog = Catalog::load_from_file(path)
        .with_context(|| format!("Catalog {} is invalid", path.display()))?;
    println!(
        "{}: {} ingredients, {} styles",
        path.display(),
        catalog.len(),
        catalog.styles().len()
    );
    for ing in catalog.ingredients() {
        match &ing.seasonal_type {
            Some(kind) => println!("  ingredient {} [{}] cost {:.2} ({kind})", ing.id, ing.display_name(), ing.cost),
            None => println!("  ingredient {} [{}] cost {:.2}", ing.id, ing.display_name(), ing.cost),
        }
    }
    for style in catalog.styles() {
        println!("  style {} (requires {} ingredient(s))", style.id, style.min_counts.len());
    }
    Ok(())
}
