use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// why a report was rejected
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid api key")]
    Authentication,
    #[error("malformed report: {0}")]
    MalformedInput(String),
}

impl IngestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IngestError::Authentication => StatusCode::UNAUTHORIZED,
            IngestError::MalformedInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"status": "error", "message": self.to_string()});
        (self.status_code(), Json(body)).into_response()
    }
}
