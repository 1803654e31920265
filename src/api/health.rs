use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::services::prediction_service::ClassifierState;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub model_available: bool,
    pub classes: usize,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(classifier: web::Data<ClassifierState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "soyleaf-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_available: classifier.available(),
        classes: classifier.registry.len(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
