//! Prediction endpoints (/predict, /predict/histories)

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    routing::{get, post},
};
use bytes::{Bytes, BytesMut};
use std::sync::Arc;

use crate::AppState;
use crate::constants::{IMAGE_FIELD, MAX_IMAGE_UPLOAD_SIZE, MSG_PREDICT_SUCCESS, MULTIPART_OVERHEAD};
use crate::models::{ApiResponse, PredictionRecord, StoredPrediction};
use crate::policy;
use crate::preprocess;
use crate::services::error::{LogErr, PredictError};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/predict",
            post(predict).layer(DefaultBodyLimit::max(MAX_IMAGE_UPLOAD_SIZE + MULTIPART_OVERHEAD)),
        )
        .route("/predict/histories", get(list_histories))
}

/// POST /predict - Classify one uploaded image and store the verdict
/// Accepts multipart form data with a single "image" field (image/*, max 1MB)
async fn predict(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<PredictionRecord>>, PredictError> {
    // A request that is not a multipart form carries no file at all
    let upload = match multipart {
        Ok(mut multipart) => read_image_field(&mut multipart).await?,
        Err(rejection) => {
            log::warn!("No multipart form in upload: {}", rejection.body_text());
            None
        }
    };
    let record = run_prediction(&state, upload).await?;

    Ok(Json(ApiResponse::success(Some(MSG_PREDICT_SUCCESS), record)))
}

/// GET /predict/histories - Every stored prediction with its storage id
async fn list_histories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<StoredPrediction>>>, PredictError> {
    let histories = state
        .history
        .list_all()
        .await
        .log_into("Error fetching histories", PredictError::StoreRead)?;

    Ok(Json(ApiResponse::success(None, histories)))
}

/// Pull the bytes of the "image" file out of the form, rejecting uploads
/// that are not images or exceed the size limit. Other fields, and an
/// "image" part sent as plain text without a filename, are ignored. A second
/// "image" file is an unexpected field.
async fn read_image_field(multipart: &mut Multipart) -> Result<Option<Bytes>, PredictError> {
    let mut upload = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) || field.file_name().is_none() {
            continue;
        }

        if upload.is_some() {
            log::error!("Multipart error: more than one {} file", IMAGE_FIELD);
            return Err(PredictError::Server(format!("unexpected field {IMAGE_FIELD}")));
        }

        let is_image = field
            .content_type()
            .is_some_and(|content_type| content_type.starts_with("image/"));
        if !is_image {
            return Err(PredictError::InvalidMediaType);
        }

        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if data.len() + chunk.len() > MAX_IMAGE_UPLOAD_SIZE {
                return Err(PredictError::UploadTooLarge);
            }
            data.extend_from_slice(&chunk);
        }

        upload = Some(data.freeze());
    }

    Ok(upload)
}

fn multipart_error(err: MultipartError) -> PredictError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        PredictError::UploadTooLarge
    } else {
        log::error!("Multipart error: {}", err.body_text());
        PredictError::Server(err.body_text())
    }
}

/// Run one upload through the pipeline: validate, preprocess, score, decide,
/// persist. Nothing is returned unless the record was stored.
async fn run_prediction(state: &AppState, upload: Option<Bytes>) -> Result<PredictionRecord, PredictError> {
    let image = upload
        .filter(|bytes| !bytes.is_empty())
        .ok_or(PredictError::EmptyInput)?;

    if !state.model.is_ready() {
        return Err(PredictError::ModelNotReady);
    }

    let input = tokio::task::spawn_blocking(move || preprocess::image_to_tensor(&image))
        .await
        .map_err(|e| PredictError::Unexpected(format!("preprocessing task failed: {e}")))
        .and_then(|result| result)
        .log_into("Error during prediction", |e| e)?;

    let probability = state
        .model
        .score(input)
        .await
        .log_into("Error during prediction", |e| e)?;

    let record = PredictionRecord::new(policy::decide(probability));

    let storage_id = state
        .history
        .append(&record)
        .await
        .log_into("Error storing prediction", PredictError::StoreWrite)?;

    log::info!(
        "Prediction {} stored as {}: {} (score {:.4})",
        record.id,
        storage_id,
        record.result,
        probability
    );

    Ok(record)
}
