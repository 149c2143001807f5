//! Subscriber registry and fan-out
//!
//! Every connected viewer owns one [`Subscriber`]: a bounded channel of
//! now-playing snapshots plus its registry membership. The registry hands
//! each broadcast to every member with a non-blocking send, so a stalled
//! viewer can never hold up the playback clock.
//!
//! # Architecture
//!
//! ```text
//!                      Arc<SubscriberRegistry>
//!                 ┌──────────────────────────────┐
//!                 │ subscribers: Mutex<HashMap<  │
//!                 │   SubscriberId,              │
//!                 │   mpsc::Sender<Arc<Snapshot>>│
//!                 │ >>                           │
//!                 └──────────────┬───────────────┘
//!                                │ try_send
//!         ┌──────────────────────┼──────────────────────┐
//!         ▼                      ▼                      ▼
//!    [Subscriber]           [Subscriber]           [Subscriber]
//!    rx.recv()              rx.recv()              rx.recv()
//!         │                      │                      │
//!         └──► SSE `data: {...}` ─► viewer
//! ```
//!
//! Snapshots travel as `Arc<Snapshot>`, so a broadcast clones a pointer per
//! subscriber, never the snapshot itself.
//!
//! A [`Subscriber`] unregisters itself when dropped; transports only need
//! to drop it when the viewer goes away.

pub mod config;
pub mod dispatch;
pub mod store;
pub mod subscriber;

pub use config::{OverflowPolicy, RegistryConfig};
pub use dispatch::{Delivery, DispatchReport};
pub use store::{RegistryStats, SubscriberRegistry};
pub use subscriber::{Subscriber, SubscriberId};
