use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::ControlError;

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<ControlError>() {
            Some(ControlError::InvalidTimeFormat(_) | ControlError::InvalidDurationFormat(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Some(ControlError::NoDataAvailable(_)) => StatusCode::NOT_FOUND,
            Some(ControlError::UpstreamLookupFailure(_)) => StatusCode::BAD_GATEWAY,
            Some(ControlError::Storage(_)) | None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "Request failed");
        }
        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}
