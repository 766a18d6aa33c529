#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod commands;
mod config;
mod server;

use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use servlm_florence::{FlorenceClient, FlorenceConfig, FlorenceProvider};
use servlm_server::{ModelRegistry, ServiceState, router};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{FlorenceArgs, ServerConfig};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "servlm_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "servlm_cli::shutdown";
pub const TRACING_TARGET_CLIENT: &str = "servlm_cli::client";

/// Vision-language model serving and invocation.
#[derive(Debug, Parser)]
#[command(name = "servlm", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server against a Florence-2 model runtime.
    Serve {
        #[command(flatten)]
        server: ServerConfig,
        #[command(flatten)]
        florence: FlorenceArgs,
    },
    /// Caption an image through a running server.
    Caption(commands::CaptionArgs),
    /// Read text out of an image through a running server.
    Ocr(commands::OcrArgs),
    /// Detect objects in an image through a running server.
    Detect(commands::DetectArgs),
}

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    #[cfg(feature = "dotenv")]
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Serve { server, florence } => serve(server, florence).await,
        Command::Caption(args) => commands::caption(args).await,
        Command::Ocr(args) => commands::ocr(args).await,
        Command::Detect(args) => commands::detect(args).await,
    }
}

/// Builds the provider registry and runs the HTTP server.
async fn serve(server_config: ServerConfig, florence: FlorenceArgs) -> anyhow::Result<()> {
    server_config
        .validate()
        .context("invalid server configuration")?;

    log_startup_info(&server_config, &florence);

    let runtime_config = FlorenceConfig::builder()
        .with_base_url(&florence.runtime_url)?
        .build()
        .context("invalid Florence runtime configuration")?;
    let client = FlorenceClient::new(runtime_config)
        .context("failed to create Florence runtime client")?;
    let provider = FlorenceProvider::new(client, florence.model);

    let state = ServiceState::new(ModelRegistry::new(Arc::new(provider)));
    server::serve(router(state), server_config).await?;

    Ok(())
}

/// Initializes tracing with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Logs startup information.
fn log_startup_info(server_config: &ServerConfig, florence: &FlorenceArgs) {
    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting servlm server"
    );

    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        pid = process::id(),
        host = %server_config.host,
        port = server_config.port,
        runtime_url = %florence.runtime_url,
        model = %florence.model,
        "server configuration loaded"
    );
}
