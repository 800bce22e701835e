use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Shown to the submitter whenever intake fails
pub const INTAKE_ERROR_MESSAGE: &str = "Ocurrió un error al procesar tu solicitud.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid form submission: {0}")]
    Intake(#[from] FormRejection),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Intake(e) => {
                tracing::error!(error = %e, "Failed to process contact form");
                (StatusCode::INTERNAL_SERVER_ERROR, INTAKE_ERROR_MESSAGE).into_response()
            }
            AppError::Template(e) => {
                tracing::error!(error = %e, "Failed to render page");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
