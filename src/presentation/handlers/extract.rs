use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use crate::presentation::state::AppState;

pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

/// Serves the MP3 extraction of `video_id`, converting it on first request.
/// Every failure is a 500 carrying the error text.
#[tracing::instrument(skip(state))]
pub async fn extract_audio_handler(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Response {
    match state.extraction_service.extract(&video_id).await {
        Ok(extraction) => {
            tracing::info!(
                title = %extraction.metadata.title,
                location = %extraction.metadata.blob_location,
                "Serving extracted audio"
            );
            (
                StatusCode::OK,
                [(CONTENT_TYPE, AUDIO_MIME_TYPE)],
                Body::from_stream(extraction.audio),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Audio extraction failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
