//! Synchronized broadcast channel
//!
//! `ambient_tv` runs a single shared "TV channel": a playlist of videos that
//! advances on a timer, watched in lock-step by any number of viewers. A
//! viewer that joins (or reconnects) at any moment immediately receives the
//! item on air and when its segment started, so it can seek to the same
//! offset as everyone else.
//!
//! # Building blocks
//!
//! - [`playlist::PlaylistStore`]: append-only items with atomic like counters
//! - [`playback::Advancer`]: the timer loop moving the station forward
//! - [`registry::SubscriberRegistry`]: attached viewers and non-blocking fan-out
//! - [`station::Station`]: ties the three together and resyncs new viewers
//! - [`server::AmbientServer`]: HTTP/SSE boundary, uploads and media files
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use ambient_tv::{Station, StationConfig};
//!
//! # async fn demo() {
//! let station = Arc::new(Station::new(StationConfig::default()));
//! station.append("/static/intro.mp4", Duration::from_secs(10)).unwrap();
//!
//! let advancer = station.spawn_advancer();
//!
//! let mut viewer = station.subscribe();
//! while let Some(snapshot) = viewer.recv().await {
//!     println!("{} (+{:?})", snapshot.video_url, snapshot.elapsed());
//! }
//! # advancer.abort();
//! # }
//! ```

pub mod error;
pub mod library;
pub mod playback;
pub mod playlist;
pub mod registry;
pub mod server;
pub mod station;

pub use error::{Error, Result};
pub use playback::{Advancer, PlaybackState, Snapshot};
pub use playlist::{PlaylistError, PlaylistStore};
pub use registry::{OverflowPolicy, RegistryConfig, Subscriber, SubscriberRegistry};
pub use server::{AmbientServer, ServerConfig};
pub use station::{Station, StationConfig};
