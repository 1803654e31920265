use crate::database::MongoDB;
use crate::models::PredictionReport;
use crate::utils::error::AppError;

use futures::stream::StreamExt;
use mongodb::bson::doc;

/// Appends one report. Called exactly once per completed classification;
/// reports are immutable afterwards.
pub async fn append(db: &MongoDB, report: &PredictionReport) -> Result<(), AppError> {
    let collection = db.collection::<PredictionReport>("predictions");

    collection
        .insert_one(report)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    log::info!(
        "✅ Report saved: {} -> {} ({:.4})",
        report.username,
        report.prediction,
        report.confidence
    );

    Ok(())
}

/// The user's prediction history, newest first
pub async fn list_by_user(
    db: &MongoDB,
    username: &str,
) -> Result<Vec<PredictionReport>, AppError> {
    let collection = db.collection::<PredictionReport>("predictions");

    let mut cursor = collection
        .find(doc! { "username": username })
        .sort(doc! { "timestamp": -1 })
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    let mut reports = Vec::new();

    while let Some(result) = cursor.next().await {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => return Err(AppError::Storage(e.to_string())),
        }
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime as BsonDateTime;

    fn report(username: &str, prediction: &str, millis: i64) -> PredictionReport {
        PredictionReport {
            id: None,
            username: username.to_string(),
            image: "leaf.jpg".to_string(),
            prediction: prediction.to_string(),
            confidence: 0.9877,
            timestamp: BsonDateTime::from_millis(millis),
        }
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn history_is_per_user_and_newest_first() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/soyleaf_prediction_test".to_string());
        let db = MongoDB::new(&uri).await.unwrap();

        let owner = format!("hist_{}", uuid::Uuid::new_v4().simple());
        let other = format!("other_{}", uuid::Uuid::new_v4().simple());

        append(&db, &report(&owner, "rust", 1_000)).await.unwrap();
        append(&db, &report(&owner, "healthy", 3_000)).await.unwrap();
        append(&db, &report(&other, "bacterial_blight", 2_000))
            .await
            .unwrap();

        let reports = list_by_user(&db, &owner).await.unwrap();

        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.username == owner));
        // t=3 precedes t=1
        assert_eq!(reports[0].prediction, "healthy");
        assert_eq!(reports[1].prediction, "rust");
    }
}
