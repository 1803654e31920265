use crate::database::MongoDB;
use crate::models::{User, UserProfile};
use crate::utils::error::AppError;

use bcrypt::{hash, verify, DEFAULT_COST};
use mongodb::bson::{doc, DateTime as BsonDateTime};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// True when a write failed against the unique username index
fn is_duplicate_key_error(error: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match &*error.kind {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        _ => error.to_string().contains("E11000"),
    }
}

/// Creates a new account. Uniqueness is the insert's job: the unique index
/// on `username` turns a concurrent duplicate into a `DuplicateUsername`
/// error instead of a second record, so there is no check-then-write race.
pub async fn register(db: &MongoDB, request: &RegisterRequest) -> Result<String, AppError> {
    let username = request.username.trim();

    if username.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required.".to_string(),
        ));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::Storage(format!("Failed to hash password: {}", e)))?;

    let new_user = User {
        id: None,
        username: username.to_string(),
        password_hash,
        fullname: none_if_empty(request.fullname.clone()),
        email: none_if_empty(request.email.clone()),
        phone: none_if_empty(request.phone.clone()),
        dob: none_if_empty(request.dob.clone()),
        address: none_if_empty(request.address.clone()),
        created_at: BsonDateTime::now(),
    };

    let collection = db.collection::<User>("users");

    collection.insert_one(&new_user).await.map_err(|e| {
        if is_duplicate_key_error(&e) {
            AppError::DuplicateUsername
        } else {
            AppError::Storage(e.to_string())
        }
    })?;

    log::info!("✅ User registered: {}", username);

    Ok(username.to_string())
}

/// Verifies a username/password pair. Unknown usernames and wrong
/// passwords are indistinguishable to the caller.
pub async fn authenticate(db: &MongoDB, request: &LoginRequest) -> Result<User, AppError> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "username": request.username.trim() })
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?
        .ok_or(AppError::InvalidCredentials)?;

    let valid =
        verify(&request.password, &user.password_hash).map_err(|_| AppError::InvalidCredentials)?;

    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    Ok(user)
}

/// Profile view for an authenticated user - credential hash excluded
pub async fn get_profile(db: &MongoDB, username: &str) -> Result<UserProfile, AppError> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "username": username })
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("user {}", username)))?;

    Ok(UserProfile::from(user))
}

/// Count of reports owned by the user, for the dashboard summary
pub async fn report_count(db: &MongoDB, username: &str) -> Result<u64, AppError> {
    let collection = db.collection::<mongodb::bson::Document>("predictions");

    collection
        .count_documents(doc! { "username": username })
        .await
        .map_err(|e| AppError::Storage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_optional_fields_are_dropped() {
        assert_eq!(none_if_empty(Some("  ".to_string())), None);
        assert_eq!(none_if_empty(None), None);
        assert_eq!(
            none_if_empty(Some(" a@b.c ".to_string())),
            Some("a@b.c".to_string())
        );
    }

    #[test]
    fn password_hash_round_trip() {
        let hashed = hash("pw123", DEFAULT_COST).unwrap();

        assert_ne!(hashed, "pw123");
        assert!(verify("pw123", &hashed).unwrap());
        assert!(!verify("wrong", &hashed).unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn duplicate_registration_leaves_exactly_one_record() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/soyleaf_prediction_test".to_string());
        let db = crate::database::MongoDB::new(&uri).await.unwrap();

        let username = format!("dup_{}", uuid::Uuid::new_v4().simple());
        let request = RegisterRequest {
            username: username.clone(),
            password: "pw123".to_string(),
            fullname: None,
            email: None,
            phone: None,
            dob: None,
            address: None,
        };

        register(&db, &request).await.unwrap();
        let second = register(&db, &request).await;
        assert!(matches!(second, Err(AppError::DuplicateUsername)));

        let count = db
            .collection::<mongodb::bson::Document>("users")
            .count_documents(doc! { "username": &username })
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn wrong_password_is_rejected() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/soyleaf_prediction_test".to_string());
        let db = crate::database::MongoDB::new(&uri).await.unwrap();

        let username = format!("auth_{}", uuid::Uuid::new_v4().simple());
        register(
            &db,
            &RegisterRequest {
                username: username.clone(),
                password: "pw123".to_string(),
                fullname: None,
                email: None,
                phone: None,
                dob: None,
                address: None,
            },
        )
        .await
        .unwrap();

        let ok = authenticate(
            &db,
            &LoginRequest {
                username: username.clone(),
                password: "pw123".to_string(),
            },
        )
        .await;
        assert!(ok.is_ok());

        let bad = authenticate(
            &db,
            &LoginRequest {
                username,
                password: "nope".to_string(),
            },
        )
        .await;
        assert!(matches!(bad, Err(AppError::InvalidCredentials)));
    }
}
