use crate::database::MongoDB;
use crate::models::FeedbackMessage;
use crate::utils::error::AppError;

use mongodb::bson::DateTime as BsonDateTime;
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Stores a contact message. Write-only: nothing in the service ever reads
/// these back; the caller treats failures as non-fatal.
pub async fn record(db: &MongoDB, request: &ContactRequest) -> Result<(), AppError> {
    let feedback = FeedbackMessage {
        id: None,
        name: request.name.clone(),
        email: request.email.clone(),
        message: request.message.clone(),
        created_at: BsonDateTime::now(),
    };

    let collection = db.collection::<FeedbackMessage>("feedback");

    collection
        .insert_one(&feedback)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    Ok(())
}
