use std::path::Path;

use ndarray::Array4;
use ort::inputs;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::{Session, SessionOutputs};

use super::{ModelConfig, ModelError};

/// Opaque trained model behind a single `classify` operation.
///
/// The service knows nothing about the network beyond "fixed-size RGB
/// tensor in, class-probability vector out"; architecture and weights
/// belong to the offline training pipeline that produced the artifact.
pub struct InferenceEngine {
    session: Session,
    config: ModelConfig,
    input_name: String,
    num_classes: usize,
}

impl InferenceEngine {
    /// Loads `model.onnx` and its paired `model_config.json` from a
    /// directory, then runs one warmup inference. The warmup both
    /// pre-heats the runtime and discovers the output vector length, which
    /// startup validates against the class registry.
    pub fn load(model_dir: &Path) -> Result<Self, ModelError> {
        let model_path = model_dir.join("model.onnx");
        let config_path = model_dir.join("model_config.json");

        if !model_path.exists() {
            return Err(ModelError::InvalidPath(format!(
                "Model file not found: {}",
                model_path.display()
            )));
        }
        if !config_path.exists() {
            return Err(ModelError::InvalidPath(format!(
                "Model config file not found: {}",
                config_path.display()
            )));
        }

        let config_file = std::fs::File::open(config_path)?;
        let config: ModelConfig = serde_json::from_reader(config_file)?;

        log::info!(
            "🧠 Loading ONNX model from {} (input {}x{})",
            model_path.display(),
            config.size.width,
            config.size.height
        );

        let session = SessionBuilder::new()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(num_cpus::get())?
            .commit_from_file(model_path)?;

        let input_name = config
            .input_name
            .clone()
            .unwrap_or_else(|| session.inputs[0].name.clone());

        let mut engine = Self {
            session,
            config,
            input_name,
            num_classes: 0,
        };

        let (width, height) = engine.input_size();
        let warmup = Array4::<f32>::zeros((1, height as usize, width as usize, 3));
        let probabilities = engine.run(warmup)?;
        engine.num_classes = probabilities.len();

        log::info!(
            "✅ Model ready: {} output classes, input name '{}'",
            engine.num_classes,
            engine.input_name
        );

        Ok(engine)
    }

    /// Target spatial size the model was trained at
    pub fn input_size(&self) -> (u32, u32) {
        (self.config.size.width, self.config.size.height)
    }

    /// Output vector length, discovered at load time
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Runs the model on a `[1, H, W, 3]` tensor and returns the class
    /// probability vector. Concurrent calls are safe; serialization, when
    /// required, is the caller's dedicated pool's concern.
    pub fn classify(&self, tensor: Array4<f32>) -> Result<Vec<f32>, ModelError> {
        let (width, height) = self.input_size();
        if tensor.shape() != [1, height as usize, width as usize, 3] {
            return Err(ModelError::InputShapeMismatch);
        }

        self.run(tensor)
    }

    fn run(&self, tensor: Array4<f32>) -> Result<Vec<f32>, ModelError> {
        let tensor = tensor.into_dyn();
        let inputs = inputs![self.input_name.as_str() => tensor.view()]?;

        let outputs: SessionOutputs = self.session.run(inputs)?;

        let output_name = self.session.outputs[0].name.clone();
        let output_value = outputs
            .get(&output_name)
            .ok_or(ModelError::OutputFormatUnexpected)?;

        let output_view = output_value.try_extract_tensor::<f32>()?;
        let output_slice = output_view
            .as_slice()
            .ok_or(ModelError::OutputConversion)?;

        if self.config.apply_softmax {
            Ok(softmax(output_slice))
        } else {
            Ok(output_slice.to_vec())
        }
    }
}

pub fn softmax(data: &[f32]) -> Vec<f32> {
    let max_val = data.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let exps: Vec<f32> = data.iter().map(|&x| (x - max_val).exp()).collect();
    let sum_exps: f32 = exps.iter().sum();
    exps.into_iter().map(|x| x / sum_exps).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn softmax_is_a_probability_vector() {
        let probs = softmax(&[1.0, 2.0, 3.0]);

        assert_eq!(probs.len(), 3);
        assert!(probs.iter().all(|p| *p >= 0.0));
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        // Order preserved: the largest logit keeps the largest probability
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn softmax_is_stable_for_large_logits() {
        let probs = softmax(&[1000.0, 1001.0]);

        assert!(probs.iter().all(|p| p.is_finite()));
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn missing_artifact_is_an_invalid_path_error() {
        let dir = PathBuf::from("/definitely/not/a/model/dir");

        let result = InferenceEngine::load(&dir);

        assert!(matches!(result, Err(ModelError::InvalidPath(_))));
    }

    #[test]
    #[ignore] // Requires a model artifact under MODEL_DIR
    fn loaded_model_classifies_a_zero_tensor() {
        let model_dir = std::env::var("MODEL_DIR").unwrap_or_else(|_| "model".to_string());
        let engine = InferenceEngine::load(Path::new(&model_dir)).unwrap();

        let (width, height) = engine.input_size();
        let tensor = Array4::<f32>::zeros((1, height as usize, width as usize, 3));

        let probs = engine.classify(tensor).unwrap();

        assert_eq!(probs.len(), engine.num_classes());
        assert!(probs.iter().all(|p| *p >= 0.0));
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-3);
    }
}
