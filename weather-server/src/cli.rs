use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;
use weather_core::{Config, WeatherService};

use crate::routes::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Zip code weather lookup server")]
pub struct Cli {
    /// Default log filter, e.g. "info" or "weather_core=debug". `RUST_LOG` overrides it.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the weather API and the static client bundle.
    Serve {
        /// Address to bind, e.g. "127.0.0.1".
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on; overrides the config file and `PORT`.
        #[arg(long)]
        port: Option<u16>,

        /// Directory containing `index.html` and client assets.
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Print the weather report for a zip code as JSON.
    Show {
        /// 5-digit US zip code.
        zipcode: String,
    },

    /// Print the config file location and the effective configuration.
    Config,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Serve { bind, port, static_dir } => {
                let port_env = std::env::var("PORT").ok();
                apply_serve_overrides(&mut config, port_env.as_deref(), bind, port, static_dir)?;
                serve(&config).await
            }
            Command::Show { zipcode } => {
                let service = WeatherService::from_config(&config.weather)?;
                let report = service.report(&zipcode).await?;
                let json = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize weather report")?;
                println!("{json}");
                Ok(())
            }
            Command::Config => {
                println!("# {}", Config::config_file_path()?.display());
                print!("{}", config.to_toml()?);
                Ok(())
            }
        }
    }
}

/// Layer `PORT` and then the `serve` flags over the loaded config.
fn apply_serve_overrides(
    config: &mut Config,
    port_env: Option<&str>,
    bind: Option<String>,
    port: Option<u16>,
    static_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    config.apply_port_override(port_env)?;

    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(dir) = static_dir {
        config.server.static_dir = dir;
    }
    Ok(())
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    config.validate()?;

    let service = WeatherService::from_config(&config.weather)?;
    let app = routes::router(AppState { service }, &config.server.static_dir);

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!(
        "Server is running on {addr} (static files from {})",
        config.server.static_dir.display()
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
