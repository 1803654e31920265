use actix_web::{web, HttpResponse};

use crate::api::auth::MessageResponse;
use crate::database::MongoDB;
use crate::services::feedback_service::{self, ContactRequest};

#[utoipa::path(
    post,
    path = "/api/v1/contact",
    tag = "Contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Feedback accepted", body = MessageResponse)
    )
)]
pub async fn contact(db: web::Data<MongoDB>, request: web::Json<ContactRequest>) -> HttpResponse {
    log::info!("💬 POST /contact - from: {}", request.name);

    // Fire-and-forget: a storage hiccup is logged, never surfaced
    if let Err(e) = feedback_service::record(&db, &request).await {
        log::warn!("⚠️  Failed to persist feedback from {}: {}", request.name, e);
    }

    HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: "✅ Thank you for your feedback!".to_string(),
    })
}
