use crate::render::RenderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Template file not found at: {0}")]
    TemplateNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("PDF generation failed: {0}")]
    Render(#[from] RenderError),

    #[error("Service overloaded, please try again later")]
    ServiceOverloaded,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code, cause) = match &self {
            Self::TemplateNotFound(_) => (StatusCode::BAD_REQUEST, "TemplateNotFound", None),
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "InvalidRequest", None),
            Self::Render(RenderError::EmptyOutput) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "EmptyOutput", None)
            }
            Self::Render(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "GenerationFailed",
                e.cause_message(),
            ),
            Self::ServiceOverloaded => {
                (StatusCode::SERVICE_UNAVAILABLE, "ServiceOverloaded", None)
            }
            Self::Config(_) | Self::Internal(_) => {
                tracing::error!("Internal error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalError", None)
            }
        };

        let body = Json(json!({
            "error": code,
            "message": self.to_string(),
            "cause": cause,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
