use std::path::PathBuf;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::StreamExt;
use mongodb::bson::DateTime as BsonDateTime;
use serde::Serialize;

use crate::api::error_response;
use crate::database::MongoDB;
use crate::inference::decode::round_confidence;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::PredictionReport;
use crate::services::prediction_service::{self, ClassifierState};
use crate::services::report_service;
use crate::utils::error::AppError;
use crate::utils::files::stored_filename;

/// Where uploaded images are stored; created at startup
pub struct UploadSettings {
    pub dir: PathBuf,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PredictionResponse {
    pub success: bool,
    /// Predicted class label, or "Unknown"
    pub prediction: String,
    /// Arg-max probability, rounded to the display precision
    pub confidence: f64,
    /// Stored filename of the uploaded image
    pub image: String,
    /// Present when the result could not be saved to the history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UploadFormResponse {
    pub success: bool,
    /// Multipart field name the upload must use
    pub field: String,
    pub model_available: bool,
    /// `[width, height]` the model expects, when a model is loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_size: Option<[u32; 2]>,
}

#[utoipa::path(
    get,
    path = "/api/v1/upload_img",
    tag = "Predict",
    responses(
        (status = 200, description = "Upload form descriptor", body = UploadFormResponse),
        (status = 401, description = "Login required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_form(classifier: web::Data<ClassifierState>) -> HttpResponse {
    HttpResponse::Ok().json(UploadFormResponse {
        success: true,
        field: "image".to_string(),
        model_available: classifier.available(),
        input_size: classifier
            .engine
            .as_ref()
            .map(|engine| engine.input_size())
            .map(|(width, height)| [width, height]),
    })
}

/// Pulls the `image` field out of the multipart payload.
///
/// Mirrors the classic upload checks: no `image` part at all, an empty
/// filename, and an empty payload are each user errors, reported before
/// anything touches disk or the model.
async fn read_image_field(mut payload: Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::Validation(format!("Malformed upload: {}", e)))?;

        let (name, filename) = {
            let disposition = field.content_disposition();
            (
                disposition
                    .and_then(|cd| cd.get_name())
                    .unwrap_or_default()
                    .to_string(),
                disposition
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string(),
            )
        };

        if name != "image" {
            // Drain and ignore unrelated form fields
            while let Some(_chunk) = field.next().await {}
            continue;
        }

        if filename.is_empty() {
            return Err(AppError::Validation("No selected file".to_string()));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data =
                chunk.map_err(|e| AppError::Validation(format!("Upload aborted: {}", e)))?;
            bytes.extend_from_slice(&data);
        }

        if bytes.is_empty() {
            return Err(AppError::Validation("No selected file".to_string()));
        }

        return Ok((filename, bytes));
    }

    Err(AppError::Validation("No file part".to_string()))
}

#[utoipa::path(
    post,
    path = "/api/v1/upload_img",
    tag = "Predict",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Classification result", body = PredictionResponse),
        (status = 400, description = "Missing or empty file"),
        (status = 401, description = "Login required"),
        (status = 422, description = "Corrupt or unsupported image"),
        (status = 500, description = "Model unavailable or inference failed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_image(
    user: web::ReqData<AuthenticatedUser>,
    db: web::Data<MongoDB>,
    classifier: web::Data<ClassifierState>,
    uploads: web::Data<UploadSettings>,
    payload: Multipart,
) -> HttpResponse {
    let username = &user.username;

    log::info!("🌿 POST /upload_img - user: {}", username);

    let (filename, bytes) = match read_image_field(payload).await {
        Ok(upload) => upload,
        Err(e) => {
            log::warn!("❌ Upload rejected for {}: {}", username, e);
            return error_response(&e);
        }
    };

    let stored = stored_filename(&filename);
    if let Err(e) = std::fs::write(uploads.dir.join(&stored), &bytes) {
        log::error!("❌ Failed to store upload {}: {}", stored, e);
        return error_response(&AppError::Storage(format!("Failed to store upload: {}", e)));
    }

    let prediction = match prediction_service::classify_image_bytes(&classifier, bytes).await {
        Ok(prediction) => prediction,
        Err(e) => {
            log::warn!("❌ Classification failed for {}: {}", username, e);
            return error_response(&e);
        }
    };

    log::info!(
        "✅ Prediction for {}: {} ({:.4})",
        username,
        prediction.label,
        prediction.confidence
    );

    let report = PredictionReport {
        id: None,
        username: username.clone(),
        image: stored.clone(),
        prediction: prediction.label.clone(),
        confidence: round_confidence(prediction.confidence, classifier.stored_decimals),
        timestamp: BsonDateTime::now(),
    };

    // A failed history write must not hide an already computed result
    let warning = match report_service::append(&db, &report).await {
        Ok(_) => None,
        Err(e) => {
            log::warn!("⚠️  Failed to save report for {}: {}", username, e);
            Some("Failed to save report to your history".to_string())
        }
    };

    HttpResponse::Ok().json(PredictionResponse {
        success: true,
        prediction: prediction.label,
        confidence: round_confidence(prediction.confidence, classifier.display_decimals),
        image: stored,
        warning,
    })
}
