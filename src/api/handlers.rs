use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{info, warn};
use std::sync::Arc;

use crate::{clues::assemble_clues, error::CrosswordError, runner::fill};

use super::{
    router::AppState,
    types::{ErrorResponse, FillResponse, TemplateRequest},
};

/// Error wrapper for API handlers
#[derive(Debug)]
pub struct ApiError(CrosswordError);

impl From<CrosswordError> for ApiError {
    fn from(e: CrosswordError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_type = match &self.0 {
            CrosswordError::InvalidTemplate(_) => "invalid_template",
            CrosswordError::Dictionary(_) => "dictionary_error",
            CrosswordError::Io(_) => "io_error",
            CrosswordError::Json(_) => "serialization_error",
            CrosswordError::Index(_) => "index_error",
            CrosswordError::Worker(_) => "worker_error",
        };
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        warn!("Request failed: {}", self.0);

        (status, Json(ErrorResponse::new(error_type, self.0.to_string()))).into_response()
    }
}

/// Fill a crossword template
pub async fn fill_crossword(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TemplateRequest>,
) -> Result<Json<FillResponse>, ApiError> {
    let template = req.into_template()?;
    info!(
        "Filling {}x{} template",
        template.width(),
        template.height()
    );

    let outcome = fill(template, Arc::clone(&state.dictionary), &state.options).await?;
    let clues = assemble_clues(&outcome.assignment, &state.dictionary);

    Ok(Json(FillResponse::new(&outcome, clues)))
}
