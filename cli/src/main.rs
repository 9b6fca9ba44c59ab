//! Bike charging service: CLI launcher
//!
//! ```sh
//! # Run with default config (~/.config/bike-charging/config.toml)
//! bike-charging-service
//!
//! # Custom config path and port
//! bike-charging-service --config /etc/bike-charging/config.toml --port 9090
//!
//! # Validate config without starting
//! bike-charging-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use bike_charging::config::AppConfig;
use bike_charging::server::{init_tracing, ServerHandle, ServerOptions};

/// HTTP service for bike battery records and background charging.
#[derive(Parser, Debug)]
#[command(
    name = "bike-charging-service",
    version,
    about = "Bike battery charging service",
    long_about = "REST API over bike batteries and charging stations, with a \
                  background charging loop per battery.\n\n\
                  Default config: ~/.config/bike-charging/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "BIKE_CHARGING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the HTTP listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the database URL.
    #[arg(long)]
    database_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(bike_charging::default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref url) = cli.database_url {
        config.database.url = url.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    if cli.check {
        if let Err(e) = &loaded {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        config.validate()?;
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.api_address());
        println!("   Database    : {}", config.database.connection_url());
        println!("   Log level   : {}", config.logging.level);
        println!("   Tick        : {} ms", config.charging.tick_interval_ms);
        println!("   Recovery    : {:?}", config.charging.startup_recovery);
        return Ok(());
    }

    init_tracing(&config);
    match &loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
