use std::sync::Arc;
use std::time::Duration;

use crate::inference::{decode, preprocess, ClassRegistry, InferenceEngine, Prediction};
use crate::utils::error::AppError;
use crate::utils::thread_pool::spawn_inference_blocking;

/// Shared read-only classification state, built once at startup and passed
/// into handlers through `web::Data` - the model and registry are never
/// mutated for the process lifetime.
pub struct ClassifierState {
    pub engine: Option<Arc<InferenceEngine>>,
    pub registry: ClassRegistry,
    pub display_decimals: u32,
    pub stored_decimals: u32,
    pub timeout: Duration,
}

impl ClassifierState {
    pub fn available(&self) -> bool {
        self.engine.is_some()
    }
}

/// Full inference pipeline: decode -> preprocess -> classify -> decode the
/// probability vector. Runs the CPU-bound part on the dedicated inference
/// pool under a timeout so a wedged runtime turns into an error instead of
/// a hung request.
pub async fn classify_image_bytes(
    state: &ClassifierState,
    bytes: Vec<u8>,
) -> Result<Prediction, AppError> {
    let engine = state
        .engine
        .clone()
        .ok_or_else(|| AppError::Inference("model is not available".to_string()))?;

    let task = spawn_inference_blocking(move || -> Result<Vec<f32>, AppError> {
        let image = preprocess::decode_image(&bytes).map_err(|e| AppError::Decode(e.to_string()))?;

        let (width, height) = engine.input_size();
        let tensor = preprocess::to_input_tensor(&image, width, height);

        engine
            .classify(tensor)
            .map_err(|e| AppError::Inference(e.to_string()))
    });

    let probabilities = tokio::time::timeout(state.timeout, task)
        .await
        .map_err(|_| AppError::Inference("inference timed out".to_string()))?
        .map_err(|e| AppError::Inference(format!("inference task failed: {}", e)))??;

    Ok(decode::decode(&probabilities, &state.registry))
}
