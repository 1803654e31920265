mod api;
mod database;
mod inference;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api::predict::UploadSettings;
use inference::{ClassRegistry, InferenceEngine};
use services::prediction_service::ClassifierState;
use services::session_service::SessionStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3002".to_string());
    let database_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "mongodb://localhost:27017/soyleaf_prediction".to_string());

    log::info!("🚀 Starting Soyleaf Service...");

    // Model and class registry are loaded once and shared read-only for
    // the process lifetime; both degrade gracefully when their files are
    // missing instead of blocking startup
    let model_dir = PathBuf::from(env::var("MODEL_DIR").unwrap_or_else(|_| "model".to_string()));
    let class_file = PathBuf::from(
        env::var("CLASS_NAMES_JSON").unwrap_or_else(|_| "class_names.json".to_string()),
    );
    let dataset_dir =
        PathBuf::from(env::var("DATASET_DIR").unwrap_or_else(|_| "dataset".to_string()));

    let engine = match InferenceEngine::load(&model_dir) {
        Ok(engine) => Some(Arc::new(engine)),
        Err(e) => {
            log::warn!(
                "⚠️  Model unavailable: {} - classification requests will fail until a model is provided",
                e
            );
            None
        }
    };

    let registry = ClassRegistry::load(&class_file, &dataset_dir);
    log::info!("Loaded class names: {:?}", registry.labels());

    // The registry order must line up with the model's output layer;
    // a mismatch would silently label every prediction wrong, so refuse
    // to start instead
    if let Some(engine) = &engine {
        if !registry.is_empty() && registry.len() != engine.num_classes() {
            log::error!(
                "❌ Class registry has {} labels but the model outputs {} classes - check CLASS_NAMES_JSON and MODEL_DIR",
                registry.len(),
                engine.num_classes()
            );
            std::process::exit(1);
        }
    }

    let timeout_secs: u64 = env::var("INFERENCE_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30);
    let display_decimals: u32 = env::var("CONFIDENCE_DECIMALS_DISPLAY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(2);
    let stored_decimals: u32 = env::var("CONFIDENCE_DECIMALS_STORED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(4);

    let classifier = web::Data::new(ClassifierState {
        engine,
        registry,
        display_decimals,
        stored_decimals,
        timeout: std::time::Duration::from_secs(timeout_secs),
    });

    // Upload storage
    let upload_dir =
        PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "static/uploads".to_string()));
    std::fs::create_dir_all(&upload_dir).expect("Failed to create upload directory");
    let uploads = web::Data::new(UploadSettings { dir: upload_dir });

    // Sessions live in-process; a restart just logs everyone out
    let ttl_hours: i64 = env::var("SESSION_TTL_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(24);
    let sessions = web::Data::new(SessionStore::new(chrono::Duration::hours(ttl_hours)));

    // Initialize MongoDB connection
    log::info!("📊 Database: {}", database_url);
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(classifier.clone())
            .app_data(sessions.clone())
            .app_data(uploads.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Public endpoints: registration, login, contact
            .service(
                web::scope("/api/v1/auth")
                    .route("/register", web::post().to(api::auth::register))
                    .route("/login", web::post().to(api::auth::login))
                    .route("/logout", web::get().to(api::auth::logout)),
            )
            .route("/api/v1/contact", web::post().to(api::contact::contact))
            // Everything else sits behind the session gate
            .service(
                web::scope("/api/v1")
                    .wrap(middleware::SessionGate)
                    .route("/dashboard", web::get().to(api::account::dashboard))
                    .route("/profile", web::get().to(api::account::profile))
                    .route("/past-report", web::get().to(api::reports::past_report))
                    .route("/upload_img", web::get().to(api::predict::upload_form))
                    .route("/upload_img", web::post().to(api::predict::upload_image)),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
