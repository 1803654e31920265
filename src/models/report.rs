use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// One completed classification (stored in the `predictions` collection).
///
/// Append-only: written exactly once per successful inference, never
/// updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Owner of the report (foreign key to users.username)
    pub username: String,

    /// Stored filename of the uploaded image
    pub image: String,

    /// Predicted class label, or "Unknown"
    pub prediction: String,

    /// Arg-max probability, rounded to the persisted precision
    pub confidence: f64,

    pub timestamp: BsonDateTime,
}

/// History entry as returned to the owning user
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ReportEntry {
    pub image: String,
    pub prediction: String,
    pub confidence: f64,
    pub timestamp: String,
}

impl From<PredictionReport> for ReportEntry {
    fn from(report: PredictionReport) -> Self {
        ReportEntry {
            image: report.image,
            prediction: report.prediction,
            confidence: report.confidence,
            timestamp: report
                .timestamp
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}
