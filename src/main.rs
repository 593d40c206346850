//! Signing gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                 SIGN GATEWAY                  │
//!                         │                                               │
//!   multipart request     │  ┌────────┐    ┌──────────────┐    ┌───────┐  │
//!   ──────────────────────┼─▶│  http  │───▶│ orchestrator │───▶│engine │  │
//!                         │  │ server │    │   guards     │    │ (caps)│  │
//!   JSON report / status  │  └────────┘    └──────┬───────┘    └───────┘  │
//!   ◀─────────────────────┼──────────             │                       │
//!                         │                       ▼                       │
//!                         │               ┌──────────────┐                │
//!   conf.json edits ──────┼──────────────▶│ config store │                │
//!        (watcher)        │               │  (ArcSwap)   │                │
//!                         │               └──────────────┘                │
//!                         └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sign_gateway::config::settings::GatewaySettings;
use sign_gateway::lifecycle;

#[derive(Parser, Debug)]
#[command(name = "sign-gateway", version, about = "Signing, validation and proof gateway")]
struct Cli {
    /// TOML settings file; defaults apply when absent
    #[arg(short, long, env = "SIGN_GATEWAY_SETTINGS")]
    settings: Option<PathBuf>,

    /// JSON configuration document
    #[arg(long, env = "SIGN_GATEWAY_CONF")]
    conf: Option<PathBuf>,

    /// Listener bind address
    #[arg(long, env = "SIGN_GATEWAY_BIND")]
    bind: Option<String>,

    /// Enforce per-configuration secrets on signing requests
    #[arg(long, env = "SIGN_GATEWAY_SECRET_ENABLED")]
    secret_enabled: Option<bool>,

    #[arg(long, env = "SIGN_GATEWAY_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    fn into_settings(self) -> Result<GatewaySettings, Box<dyn std::error::Error>> {
        let mut settings = match &self.settings {
            Some(path) => GatewaySettings::load(path)?,
            None => GatewaySettings::default(),
        };
        if let Some(conf) = self.conf {
            settings.config_path = conf;
        }
        if let Some(bind) = self.bind {
            settings.listener.bind_address = bind;
        }
        if let Some(enabled) = self.secret_enabled {
            settings.secret_enabled = enabled;
        }
        if let Some(level) = self.log_level {
            settings.observability.log_level = level;
        }
        settings.validate()?;
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match Cli::parse().into_settings() {
        Ok(settings) => settings,
        Err(e) => {
            // Logging is not up yet.
            eprintln!("sign-gateway: {e}");
            return ExitCode::FAILURE;
        }
    };

    match lifecycle::run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "sign-gateway stopped with an error");
            ExitCode::FAILURE
        }
    }
}
