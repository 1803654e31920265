use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::api::error_response;
use crate::database::MongoDB;
use crate::services::account_service::{self, LoginRequest, RegisterRequest};
use crate::services::session_service::SessionStore;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    /// Opaque session token; send back as `Authorization: Bearer <token>`
    pub token: String,
    pub username: String,
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = MessageResponse),
        (status = 400, description = "Missing username or password"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn register(
    db: web::Data<MongoDB>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    log::info!("📝 POST /auth/register - username: {}", request.username);

    match account_service::register(&db, &request).await {
        Ok(_) => HttpResponse::Created().json(MessageResponse {
            success: true,
            message: "Registered successfully! You can now login.".to_string(),
        }),
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", request.username, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    sessions: web::Data<SessionStore>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/login - username: {}", request.username);

    match account_service::authenticate(&db, &request).await {
        Ok(user) => {
            let token = sessions.create(&user.username);
            log::info!("✅ Login successful: {}", user.username);

            HttpResponse::Ok().json(AuthResponse {
                success: true,
                token,
                username: user.username,
                message: "Logged in successfully!".to_string(),
            })
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.username, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session destroyed", body = MessageResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(sessions: web::Data<SessionStore>, req: HttpRequest) -> HttpResponse {
    log::info!("👋 GET /auth/logout");

    // Idempotent: logging out without a live session is still a logout
    if let Some(token) = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        sessions.destroy(token);
    }

    HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: "Logged out.".to_string(),
    })
}
