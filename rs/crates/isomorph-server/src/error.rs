use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use isomorph_embed::EmbedError;

#[derive(Debug)]
pub enum AppError {
    /// Render props could not be serialized for embedding.
    Serialization(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialization(e) => write!(f, "serialization: {}", e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let (status, msg) = match &self {
            Self::Serialization(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.as_str()),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}

// Handlers only embed, never decode, so every `EmbedError` they can see is
// a serialization failure.
impl From<EmbedError> for AppError {
    fn from(e: EmbedError) -> Self {
        Self::Serialization(e.to_string())
    }
}
