//! HTTP boundary
//!
//! Exposes a station over HTTP: a server-sent event stream of now-playing
//! snapshots, like and listing endpoints, uploads, and the media files
//! themselves.
//!
//! | Path | Description |
//! |------|-------------|
//! | `GET /video-updates` | SSE stream, one `data: <snapshot json>` per advancement |
//! | `POST /like/{index}` | Like an item, returns the new count |
//! | `GET /videos` | Full playlist and the index on air |
//! | `POST /uploads` | Multipart form: `video` file and optional `duration` seconds |
//! | `GET /static/*`, `GET /uploads/*` | Media files |

pub mod config;
pub mod listener;
pub mod routes;

pub use config::ServerConfig;
pub use listener::AmbientServer;
pub use routes::{router, AppState};
