//! Playlist store
//!
//! Holds the ordered collection of playable items for the lifetime of the
//! process. Items are only ever appended; like counters are bumped in place.
//!
//! ```text
//!              Arc<PlaylistStore>
//!         ┌──────────────────────────┐
//!         │ items: RwLock<Vec<       │
//!         │   Arc<PlaylistItem> {    │
//!         │     url, duration,       │
//!         │     likes: AtomicU64,    │
//!         │   }                      │
//!         │ >                        │
//!         └────────────┬─────────────┘
//!                      │
//!        ┌─────────────┼──────────────┐
//!        ▼             ▼              ▼
//!    append()     get(index)    increment_like()
//!   (uploads)     (advancer)     (like handler)
//! ```
//!
//! Readers clone the `Arc<PlaylistItem>` out of the store, so the lock is
//! only held for the index lookup.

pub mod error;
pub mod item;
pub mod store;

pub use error::PlaylistError;
pub use item::{ItemSeed, PlaylistEntry, PlaylistItem};
pub use store::{validate_duration, PlaylistStore, MAX_ITEM_DURATION};
