use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::api::error_response;
use crate::database::MongoDB;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::UserProfile;
use crate::services::account_service;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DashboardResponse {
    pub success: bool,
    pub username: String,
    /// Number of prediction reports this user owns
    pub reports: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserProfile,
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Account",
    responses(
        (status = 200, description = "User dashboard summary", body = DashboardResponse),
        (status = 401, description = "Login required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn dashboard(
    user: web::ReqData<AuthenticatedUser>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    let username = &user.username;

    log::info!("🏠 GET /dashboard - user: {}", username);

    match account_service::report_count(&db, username).await {
        Ok(reports) => HttpResponse::Ok().json(DashboardResponse {
            success: true,
            username: username.clone(),
            reports,
        }),
        Err(e) => {
            log::error!("❌ Dashboard failed for {}: {}", username, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "Account",
    responses(
        (status = 200, description = "Profile without the credential hash", body = ProfileResponse),
        (status = 401, description = "Login required"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn profile(
    user: web::ReqData<AuthenticatedUser>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    let username = &user.username;

    log::info!("👤 GET /profile - user: {}", username);

    match account_service::get_profile(&db, username).await {
        Ok(profile) => HttpResponse::Ok().json(ProfileResponse {
            success: true,
            user: profile,
        }),
        Err(e) => {
            log::error!("❌ Profile lookup failed for {}: {}", username, e);
            error_response(&e)
        }
    }
}
