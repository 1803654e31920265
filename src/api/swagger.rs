use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Soyleaf Service API",
        version = "1.0.0",
        description = "Soybean leaf disease prediction service. \n\n**Authentication:** Register an account, login to receive an opaque session token, and send it as a Bearer token on every guarded endpoint.\n\n**Features:**\n- Account registration and session login\n- Leaf image upload and disease classification\n- Per-user prediction history\n- Contact/feedback form",
        contact(
            name = "Soyleaf Service Team"
        )
    ),
    paths(
        // Auth endpoints
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::logout,

        // Account
        crate::api::account::dashboard,
        crate::api::account::profile,

        // Prediction
        crate::api::predict::upload_form,
        crate::api::predict::upload_image,
        crate::api::reports::past_report,

        // Contact
        crate::api::contact::contact,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            // Auth
            crate::services::account_service::RegisterRequest,
            crate::services::account_service::LoginRequest,
            crate::api::auth::AuthResponse,
            crate::api::auth::MessageResponse,

            // Account
            crate::api::account::DashboardResponse,
            crate::api::account::ProfileResponse,
            crate::models::user::UserProfile,

            // Prediction
            crate::api::predict::PredictionResponse,
            crate::api::predict::UploadFormResponse,
            crate::api::reports::PastReportsResponse,
            crate::models::report::ReportEntry,

            // Contact
            crate::services::feedback_service::ContactRequest,

            // Health
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login, and logout. Login issues the opaque session token the rest of the API requires."),
        (name = "Account", description = "User-scoped dashboard and profile data. The profile never includes the credential hash."),
        (name = "Predict", description = "Leaf image upload and classification. Successful classifications are appended to the caller's history."),
        (name = "Reports", description = "Per-user prediction history, newest first."),
        (name = "Contact", description = "Contact/feedback form, open to anonymous callers."),
        (name = "Health", description = "Health check reporting model availability and class count."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Opaque session token issued by /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
