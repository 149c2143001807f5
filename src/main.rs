//! Ambient TV server
//!
//! Seeds the playlist from the media directories, then serves the station
//! until Ctrl+C.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ambient_tv::library::LibraryConfig;
use ambient_tv::{AmbientServer, OverflowPolicy, RegistryConfig, ServerConfig, StationConfig};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "ambient-tv")]
#[command(about = "Synchronized video channel: every viewer watches the same thing")]
#[command(version)]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "0.0.0.0:8000", env = "AMBIENT_TV_BIND")]
    bind: SocketAddr,

    /// Directory of bundled videos, served under /static
    #[arg(long, default_value = "static", env = "AMBIENT_TV_STATIC_DIR")]
    static_dir: PathBuf,

    /// Directory for uploaded videos, served under /uploads
    #[arg(long, default_value = "uploads", env = "AMBIENT_TV_UPLOADS_DIR")]
    uploads_dir: PathBuf,

    /// Seconds each static video stays on air
    #[arg(long, default_value_t = 10)]
    static_duration: u64,

    /// Seconds each uploaded video stays on air unless the upload says otherwise
    #[arg(long, default_value_t = 30)]
    upload_duration: u64,

    /// Snapshots buffered per viewer
    #[arg(long, default_value_t = 16)]
    subscriber_buffer: usize,

    /// Skip updates for lagging viewers instead of disconnecting them
    #[arg(long)]
    drop_lagging: bool,

    /// Milliseconds between playlist checks while nothing is on air
    #[arg(long, default_value_t = 1000)]
    idle_poll_ms: u64,
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        let overflow = if self.drop_lagging {
            OverflowPolicy::DropUpdate
        } else {
            OverflowPolicy::Disconnect
        };

        let station = StationConfig::default()
            .registry(
                RegistryConfig::default()
                    .subscriber_buffer(self.subscriber_buffer)
                    .overflow(overflow),
            )
            .idle_poll_interval(Duration::from_millis(self.idle_poll_ms));

        let library = LibraryConfig::default()
            .static_dir(&self.static_dir)
            .uploads_dir(&self.uploads_dir)
            .static_duration(Duration::from_secs(self.static_duration))
            .upload_duration(Duration::from_secs(self.upload_duration));

        ServerConfig::with_addr(self.bind)
            .station(station)
            .library(library)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ambient_tv=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = args.server_config();

    info!("Starting Ambient TV on {}", config.bind_addr);
    info!(
        "Media directories: static={} uploads={}",
        config.library.static_dir.display(),
        config.library.uploads_dir.display()
    );

    let server = AmbientServer::new(config);
    let items = server
        .seed_library()
        .await
        .context("Failed to scan media directories")?;
    info!("Initialized with {} videos", items);

    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("Server terminated with an error")?;

    info!("Shutdown complete");
    Ok(())
}
