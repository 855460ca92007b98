//! PsicoEspacios scheduling service, command-line launcher
//!
//! ```sh
//! # Default config (~/.config/psicoespacios/config.toml)
//! psicoespacios-service
//!
//! # Custom config and port
//! psicoespacios-service --config /etc/psicoespacios/config.toml --port 9090
//!
//! # Validate the configuration and exit
//! psicoespacios-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use psicoespacios::server::{init_tracing, ServerHandle, ServerOptions};
use psicoespacios::{default_config_path, AppConfig};

/// Recurring room packs, conflict detection and monthly billing for psychology clinics.
#[derive(Parser, Debug)]
#[command(name = "psicoespacios-service", version)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "PSICO_CONFIG")]
    config: Option<PathBuf>,

    /// Override the HTTP listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(default_config_path);

    let loaded = AppConfig::load(&config_path);
    if cli.check {
        return match loaded {
            Ok(config) => {
                println!("Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   Address     : {}", config.server.address());
                println!("   Database    : {}", config.database.url);
                println!("   Log level   : {}", config.logging.level);
                println!(
                    "   Deadlines   : default {} months, max {} months",
                    config.scheduling.default_months, config.scheduling.max_months
                );
                Ok(())
            }
            Err(e) => {
                eprintln!("Invalid configuration in {}: {}", config_path.display(), e);
                Err(e.into())
            }
        };
    }

    let mut config = match loaded {
        Ok(cfg) => cfg,
        Err(ref e) => {
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            AppConfig::default()
        }
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    init_tracing(&config);
    info!("Configuration: {}", config_path.display());

    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Startup failed: {}", e);
            return Err(e);
        }
    };
    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.wait().await;
    Ok(())
}
