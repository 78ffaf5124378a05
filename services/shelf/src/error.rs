//! Handler-level errors
//!
//! Expected failures (bad input, taken email, wrong credentials, assistant
//! outages) are handled inside the handlers. What reaches [`AppError`] is
//! unexpected and is answered with a generic error page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::{repositories::StoreError, views};

/// Custom error type for the shelf service
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, views::error_page()).into_response()
    }
}

/// Type alias for handler results
pub type AppResult<T> = Result<T, AppError>;
