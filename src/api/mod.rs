pub mod account;
pub mod auth;
pub mod contact;
pub mod health;
pub mod predict;
pub mod reports;
pub mod swagger;

use actix_web::HttpResponse;

use crate::utils::error::AppError;

/// Maps a service error to its HTTP response. Every error is
/// request-scoped and user-visible; nothing here is fatal to the process.
pub fn error_response(error: &AppError) -> HttpResponse {
    let body = serde_json::json!({
        "success": false,
        "error": error.to_string()
    });

    match error {
        AppError::Validation(_) => HttpResponse::BadRequest().json(body),
        AppError::DuplicateUsername => HttpResponse::Conflict().json(body),
        AppError::InvalidCredentials | AppError::Unauthorized => {
            HttpResponse::Unauthorized().json(body)
        }
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        AppError::Decode(_) => HttpResponse::UnprocessableEntity().json(body),
        AppError::Inference(_) | AppError::Storage(_) => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}
