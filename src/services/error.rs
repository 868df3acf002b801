//! Error taxonomy for the prediction API and its mapping to HTTP responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::history::StoreError;
use crate::constants::{
    MSG_EMPTY_UPLOAD, MSG_HISTORY_FAILED, MSG_MODEL_NOT_READY, MSG_NOT_AN_IMAGE, MSG_PREDICT_FAILED,
    MSG_SERVER_ERROR, MSG_UPLOAD_TOO_LARGE,
};
use crate::models::ApiResponse;

#[derive(Debug)]
pub enum PredictError {
    /// Uploaded image is larger than the accepted limit
    UploadTooLarge,
    /// Upload does not declare an `image/*` content type
    InvalidMediaType,
    /// No image field, or an empty one
    EmptyInput,
    /// Model has not finished loading (or failed to load)
    ModelNotReady,
    Decode(image::ImageError),
    Inference(anyhow::Error),
    StoreWrite(StoreError),
    StoreRead(StoreError),
    /// Request body could not be read for reasons other than its size
    Server(String),
    Unexpected(String),
}

impl PredictError {
    /// Status code, envelope status and user-facing message for each error kind
    pub fn response_parts(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            PredictError::UploadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "fail", MSG_UPLOAD_TOO_LARGE),
            PredictError::InvalidMediaType => (StatusCode::BAD_REQUEST, "fail", MSG_NOT_AN_IMAGE),
            PredictError::EmptyInput => (StatusCode::BAD_REQUEST, "fail", MSG_EMPTY_UPLOAD),
            PredictError::ModelNotReady => (StatusCode::INTERNAL_SERVER_ERROR, "fail", MSG_MODEL_NOT_READY),
            PredictError::Decode(_)
            | PredictError::Inference(_)
            | PredictError::StoreWrite(_)
            | PredictError::Unexpected(_) => (StatusCode::BAD_REQUEST, "fail", MSG_PREDICT_FAILED),
            PredictError::StoreRead(_) => (StatusCode::INTERNAL_SERVER_ERROR, "error", MSG_HISTORY_FAILED),
            PredictError::Server(_) => (StatusCode::INTERNAL_SERVER_ERROR, "error", MSG_SERVER_ERROR),
        }
    }
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictError::UploadTooLarge => write!(f, "Uploaded file exceeds the size limit"),
            PredictError::InvalidMediaType => write!(f, "Uploaded file is not an image"),
            PredictError::EmptyInput => write!(f, "No file uploaded or file is empty"),
            PredictError::ModelNotReady => write!(f, "Model is not loaded"),
            PredictError::Decode(e) => write!(f, "Failed to decode image: {e}"),
            PredictError::Inference(e) => write!(f, "Inference failed: {e:#}"),
            PredictError::StoreWrite(e) => write!(f, "Failed to store prediction: {e}"),
            PredictError::StoreRead(e) => write!(f, "Failed to read prediction history: {e}"),
            PredictError::Server(msg) => write!(f, "Failed to read request: {msg}"),
            PredictError::Unexpected(msg) => write!(f, "Unexpected error: {msg}"),
        }
    }
}

impl std::error::Error for PredictError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PredictError::Decode(e) => Some(e),
            PredictError::StoreWrite(e) | PredictError::StoreRead(e) => Some(e),
            _ => None,
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let (status, label, message) = self.response_parts();
        (status, Json(ApiResponse::failure(label, message))).into_response()
    }
}

/// Extension trait for logging errors and converting them to a PredictError
pub trait LogErr<T, E> {
    fn log_into(self, context: &str, kind: impl FnOnce(E) -> PredictError) -> Result<T, PredictError>;
}

impl<T, E: fmt::Display> LogErr<T, E> for Result<T, E> {
    fn log_into(self, context: &str, kind: impl FnOnce(E) -> PredictError) -> Result<T, PredictError> {
        self.map_err(|e| {
            log::error!("{}: {}", context, e);
            kind(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_errors_map_to_client_statuses() {
        assert_eq!(
            PredictError::UploadTooLarge.response_parts(),
            (StatusCode::PAYLOAD_TOO_LARGE, "fail", "Ukuran file melebihi batas maksimal: 1MB")
        );
        assert_eq!(
            PredictError::InvalidMediaType.response_parts(),
            (StatusCode::BAD_REQUEST, "fail", "File harus berupa gambar.")
        );
        assert_eq!(
            PredictError::EmptyInput.response_parts(),
            (StatusCode::BAD_REQUEST, "fail", "Tidak ada file yang diunggah atau file kosong.")
        );
    }

    #[test]
    fn test_pipeline_failures_share_one_message() {
        let failures = [
            PredictError::Inference(anyhow::anyhow!("boom")),
            PredictError::StoreWrite(StoreError::Backend("down".to_string())),
            PredictError::Unexpected("worker panicked".to_string()),
        ];
        for err in failures {
            assert_eq!(
                err.response_parts(),
                (StatusCode::BAD_REQUEST, "fail", "Terjadi kesalahan dalam melakukan prediksi.")
            );
        }
    }

    #[test]
    fn test_not_ready_and_history_are_server_errors() {
        assert_eq!(
            PredictError::ModelNotReady.response_parts(),
            (StatusCode::INTERNAL_SERVER_ERROR, "fail", "Model belum siap untuk digunakan.")
        );
        assert_eq!(
            PredictError::StoreRead(StoreError::Backend("down".to_string())).response_parts(),
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "error",
                "Terjadi kesalahan saat mengambil data riwayat prediksi."
            )
        );
    }

    #[test]
    fn test_log_into_converts_error() {
        let result: Result<(), String> = Err("disk full".to_string());
        let err = result
            .log_into("Store prediction error", |e| PredictError::Unexpected(e))
            .unwrap_err();
        assert!(matches!(err, PredictError::Unexpected(msg) if msg == "disk full"));
    }
}
