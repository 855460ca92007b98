//! PsicoEspacios scheduling service
//!
//! Reads its configuration from `PSICO_CONFIG` or
//! `~/.config/psicoespacios/config.toml` and serves until SIGINT / SIGTERM.
//! The `psicoespacios-cli` binary adds command-line overrides.

use tracing::{error, info};

use psicoespacios::server::{init_tracing, ServerHandle, ServerOptions};
use psicoespacios::{resolve_config_path, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = resolve_config_path();
    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg);
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            cfg
        }
    };

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: true,
    })
    .await?;
    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.wait().await;
    Ok(())
}
