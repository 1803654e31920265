/// Dedicated thread pool for model inference.
///
/// Keeps CPU-bound ONNX Runtime calls off the main Tokio runtime so request
/// handling stays responsive while a classification is in flight. With
/// `INFERENCE_WORKERS=1` the pool also serializes inference calls, which is
/// the safe setting for model artifacts that are not reentrant.

use lazy_static::lazy_static;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn worker_count() -> usize {
    std::env::var("INFERENCE_WORKERS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

lazy_static! {
    /// Pool dedicated to inference (blocking) work
    pub static ref INFERENCE_POOL: Arc<Runtime> = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(worker_count())
            .thread_name("inference-worker")
            .enable_all()
            .build()
            .expect("Failed to create inference thread pool")
    );
}

/// Runs a blocking inference operation on the dedicated pool
pub async fn spawn_inference_blocking<F, R>(f: F) -> Result<R, tokio::task::JoinError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    INFERENCE_POOL.spawn_blocking(f).await
}
