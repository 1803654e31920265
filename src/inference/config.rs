use serde::Deserialize;

/// Side-car configuration stored next to the model artifact.
///
/// The target input size belongs to the trained model, not to this service,
/// so it is read from here rather than hard-coded (the two observed
/// deployments trained at 150x150 and 128x128).
#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    pub size: ImageSize,

    /// Graph input name; defaults to the session's first input when absent
    #[serde(default)]
    pub input_name: Option<String>,

    /// Set when the exported graph ends in logits instead of softmax
    #[serde(default)]
    pub apply_softmax: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_parses_with_defaults() {
        let config: ModelConfig =
            serde_json::from_str(r#"{"size": {"width": 150, "height": 150}}"#).unwrap();

        assert_eq!(config.size.width, 150);
        assert_eq!(config.size.height, 150);
        assert!(config.input_name.is_none());
        assert!(!config.apply_softmax);
    }

    #[test]
    fn full_config_parses() {
        let config: ModelConfig = serde_json::from_str(
            r#"{"size": {"width": 128, "height": 128}, "input_name": "input_1", "apply_softmax": true}"#,
        )
        .unwrap();

        assert_eq!(config.size.width, 128);
        assert_eq!(config.input_name.as_deref(), Some("input_1"));
        assert!(config.apply_softmax);
    }
}
