//! Server configuration

use std::net::SocketAddr;
use std::time::Duration;

use crate::library::LibraryConfig;
use crate::station::StationConfig;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Interval between SSE keep-alive comments
    pub keep_alive: Duration,

    /// Largest accepted upload body
    pub max_upload_bytes: usize,

    /// Station settings
    pub station: StationConfig,

    /// Media directories and defaults
    pub library: LibraryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            keep_alive: Duration::from_secs(15),
            max_upload_bytes: 512 * 1024 * 1024, // 512MB
            station: StationConfig::default(),
            library: LibraryConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the SSE keep-alive interval
    pub fn keep_alive(mut self, interval: Duration) -> Self {
        self.keep_alive = interval;
        self
    }

    /// Set the upload size limit
    pub fn max_upload_bytes(mut self, max: usize) -> Self {
        self.max_upload_bytes = max;
        self
    }

    /// Set the station configuration
    pub fn station(mut self, station: StationConfig) -> Self {
        self.station = station;
        self
    }

    /// Set the library configuration
    pub fn library(mut self, library: LibraryConfig) -> Self {
        self.library = library;
        self
    }
}
