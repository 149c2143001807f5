//! Broadcast station
//!
//! A [`Station`] is one shared channel: the playlist store, the playback
//! state and the subscriber registry, owned together and passed around as
//! `Arc<Station>`. The advancer task moves it forward; viewer transports
//! attach through [`Station::subscribe`].
//!
//! # Resync
//!
//! `subscribe` builds the current snapshot and registers the new subscriber
//! under the playback state read lock, while `advance` swaps the segment
//! and fans the new snapshot out under the write lock. A viewer therefore
//! sees either the old segment followed by the new one, or only the new
//! one, never a mix of the two and never the same segment twice.

pub mod channel;
pub mod config;

pub use channel::{PlaylistListing, Station};
pub use config::StationConfig;
