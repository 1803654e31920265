use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Contact form message (stored in the `feedback` collection, write-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackMessage {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub name: String,
    pub email: String,
    pub message: String,

    pub created_at: BsonDateTime,
}
