//! Playback clock
//!
//! Tracks which playlist item is on air and since when, and drives the
//! timer loop that moves the channel from one item to the next.
//!
//! ```text
//!        Idle ──(playlist non-empty)──► Playing(0)
//!         ▲                               │ sleep(duration)
//!         │ (playlist empty)              ▼
//!         └─────────────────────── Playing((i + 1) mod len)
//! ```

pub mod advancer;
pub mod snapshot;
pub mod state;

pub use advancer::Advancer;
pub use snapshot::Snapshot;
pub use state::{PlaybackState, Segment};
