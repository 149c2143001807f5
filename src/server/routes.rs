//! Route handlers

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::PathRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use tokio::sync::watch;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::config::ServerConfig;
use crate::library::{LibraryError, UploadStore};
use crate::playback::Snapshot;
use crate::playlist::{validate_duration, PlaylistError};
use crate::registry::Subscriber;
use crate::station::{PlaylistListing, Station};

/// Shared state passed to all request handlers
#[derive(Clone)]
pub struct AppState {
    pub station: Arc<Station>,
    pub uploads: UploadStore,
    /// Duration for uploads that do not set one
    pub upload_duration: Duration,
    pub keep_alive: Duration,
    /// Flips to `true` when the server shuts down; ends open event streams
    pub shutdown: watch::Receiver<bool>,
}

impl AppState {
    pub fn new(station: Arc<Station>, config: &ServerConfig, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            station,
            uploads: UploadStore::new(&config.library),
            upload_duration: config.library.upload_duration,
            keep_alive: config.keep_alive,
            shutdown,
        }
    }
}

/// Build the router for a station
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/video-updates", get(video_updates))
        .route("/like/{index}", post(like_video))
        .route("/videos", get(list_videos))
        .nest_service("/static", ServeDir::new(&config.library.static_dir))
        .nest("/uploads", uploads_router(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `POST /uploads` takes new videos; anything else under `/uploads` is
/// served from the uploads directory
fn uploads_router(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(upload_video).layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
        .fallback_service(ServeDir::new(&config.library.uploads_dir))
}

/// GET /video-updates - now-playing event stream
///
/// The first event is the resync snapshot (when something is on air), then
/// one event per advancement. The subscriber is dropped, and so
/// unregistered, when the client goes away or the server shuts down.
async fn video_updates(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscriber = state.station.subscribe();
    tracing::debug!(subscriber = %subscriber.id(), "Event stream opened");

    let events = snapshot_stream(subscriber, state.shutdown.clone()).filter_map(|snapshot| async move {
        match Event::default().json_data(&*snapshot) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize snapshot");
                None
            }
        }
    });

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(state.keep_alive)
            .text("keep-alive"),
    )
}

fn snapshot_stream(
    subscriber: Subscriber,
    shutdown: watch::Receiver<bool>,
) -> impl Stream<Item = Arc<Snapshot>> + Send + 'static {
    stream::unfold((subscriber, shutdown), |(mut subscriber, mut shutdown)| async move {
        let snapshot = subscriber
            .recv_until(async {
                let signalled = shutdown.wait_for(|stop| *stop).await.is_ok();
                if !signalled {
                    // Sender gone without a shutdown; keep streaming
                    std::future::pending::<()>().await;
                }
            })
            .await?;
        Some((snapshot, (subscriber, shutdown)))
    })
}

#[derive(Debug, Serialize)]
struct LikeResponse {
    success: bool,
    likes: u64,
}

/// POST /like/{index}
///
/// Negative or non-numeric indexes get the same answer as out-of-range ones.
async fn like_video(
    State(state): State<AppState>,
    index: Result<Path<usize>, PathRejection>,
) -> Result<Json<LikeResponse>, ApiError> {
    let Path(index) = index.map_err(|e| {
        tracing::debug!(error = %e, "Unparseable like index");
        ApiError::invalid_index()
    })?;
    let likes = state.station.like(index)?;
    Ok(Json(LikeResponse {
        success: true,
        likes,
    }))
}

/// GET /videos
async fn list_videos(State(state): State<AppState>) -> Json<PlaylistListing> {
    Json(state.station.listing())
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    success: bool,
    message: &'static str,
    url: String,
    index: usize,
}

/// POST /uploads - multipart form
///
/// Fields: `video` (the file, named by its part file name) and an optional
/// `duration` in seconds.
async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut video = None;
    let mut duration = state.upload_duration;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("video") => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let data = field.bytes().await?;
                video = Some((file_name, data));
            }
            Some("duration") => {
                let text = field.text().await?;
                let secs = text.trim().parse::<u64>().map_err(|_| {
                    ApiError::new(StatusCode::BAD_REQUEST, format!("Invalid duration: {text}"))
                })?;
                duration = Duration::from_secs(secs);
            }
            _ => {}
        }
    }

    let Some((file_name, data)) = video else {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Missing video file"));
    };

    // Reject before anything is written to disk
    validate_duration(&file_name, duration)?;

    let stored = state.uploads.save(&file_name, data).await?;
    let index = state.station.append(stored.url.clone(), duration)?;

    Ok(Json(UploadResponse {
        success: true,
        message: "Video uploaded successfully",
        url: stored.url,
        index,
    }))
}

/// Error response: `{"success": false, "message": ...}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn invalid_index() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Invalid video index")
    }
}

#[derive(Serialize)]
struct Failure {
    success: bool,
    message: String,
}

impl From<PlaylistError> for ApiError {
    fn from(e: PlaylistError) -> Self {
        match &e {
            PlaylistError::IndexOutOfRange { .. } => Self::invalid_index(),
            PlaylistError::InvalidDuration(_) | PlaylistError::DurationTooLong { .. } => {
                Self::new(StatusCode::BAD_REQUEST, e.to_string())
            }
            PlaylistError::DuplicateItem(_) => Self::new(StatusCode::CONFLICT, e.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::new(e.status(), format!("Malformed upload: {}", e.body_text()))
    }
}

impl From<LibraryError> for ApiError {
    fn from(e: LibraryError) -> Self {
        match e {
            LibraryError::InvalidFileType(_) => Self {
                status: StatusCode::BAD_REQUEST,
                message: "Invalid file type. Only video files are allowed.".to_string(),
            },
            LibraryError::Io(e) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("Upload failed: {e}"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, message = %self.message, "Request failed");
        } else {
            tracing::debug!(status = %self.status, message = %self.message, "Request rejected");
        }

        let body = Failure {
            success: false,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
