use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

pub const READ_FAILURE_MESSAGE: &str = "Error reading games data.";
pub const WRITE_FAILURE_MESSAGE: &str = "Error saving game.";

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Details stay in the log; clients only get the fixed message.
        let message = match &self {
            AppError::Store(err) => {
                error!(error = %err, cause = ?std::error::Error::source(err), "store operation failed");
                match err {
                    StoreError::Read { .. } => READ_FAILURE_MESSAGE,
                    StoreError::Write { .. } => WRITE_FAILURE_MESSAGE,
                }
            }
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
