use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::api::error_response;
use crate::database::MongoDB;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::ReportEntry;
use crate::services::report_service;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PastReportsResponse {
    pub success: bool,
    pub username: String,
    pub reports: Vec<ReportEntry>,
    pub count: usize,
}

#[utoipa::path(
    get,
    path = "/api/v1/past-report",
    tag = "Reports",
    responses(
        (status = 200, description = "The caller's prediction history, newest first", body = PastReportsResponse),
        (status = 401, description = "Login required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn past_report(
    user: web::ReqData<AuthenticatedUser>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    let username = &user.username;

    log::info!("📜 GET /past-report - user: {}", username);

    match report_service::list_by_user(&db, username).await {
        Ok(reports) => {
            let reports: Vec<ReportEntry> = reports.into_iter().map(ReportEntry::from).collect();

            log::info!("✅ Found {} reports for user {}", reports.len(), username);

            HttpResponse::Ok().json(PastReportsResponse {
                success: true,
                username: username.clone(),
                count: reports.len(),
                reports,
            })
        }
        Err(e) => {
            log::error!("❌ Failed to list reports for {}: {}", username, e);
            error_response(&e)
        }
    }
}
