use axum::{
    body::Body,
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use tower::util::ServiceExt;
use tower_http::services::ServeFile;

use crate::{
    error::{AppError, Result},
    state::AppState,
};

/// Stream the configured media file. The content type comes from the file
/// extension and range requests are honoured.
pub async fn get_media(State(state): State<AppState>, request: Request) -> Result<Response> {
    let path = state
        .config
        .media_file
        .as_deref()
        .ok_or_else(|| AppError::NotFound("No media file configured".to_string()))?;

    let response = match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    Ok(response.map(Body::new).into_response())
}
