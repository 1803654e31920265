use super::ClassRegistry;

/// Decoded model output: the winning class and its probability
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
}

/// Turns a probability vector into `(label, confidence)`.
///
/// Arg-max with the standard convention that ties resolve to the lowest
/// index, so decoding is deterministic. Indices outside the registry
/// (including every index when the registry is empty) decode to "Unknown";
/// the confidence is still reported.
pub fn decode(probabilities: &[f32], registry: &ClassRegistry) -> Prediction {
    if probabilities.is_empty() {
        return Prediction {
            label: "Unknown".to_string(),
            confidence: 0.0,
        };
    }

    let mut best_index = 0usize;
    let mut best_value = f32::NEG_INFINITY;

    for (index, &value) in probabilities.iter().enumerate() {
        if value > best_value {
            best_value = value;
            best_index = index;
        }
    }

    let label = registry
        .label_for(best_index)
        .unwrap_or("Unknown")
        .to_string();

    Prediction {
        label,
        confidence: best_value as f64,
    }
}

/// Rounds a confidence to a fixed number of decimal places. The precision
/// differs between display (2) and persisted records (4) but must stay
/// consistent within one deployment.
pub fn round_confidence(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ClassRegistry {
        ClassRegistry::from_labels(vec![
            "bacterial_blight".to_string(),
            "healthy".to_string(),
            "rust".to_string(),
        ])
    }

    #[test]
    fn argmax_picks_the_highest_probability() {
        let prediction = decode(&[0.1, 0.7, 0.2], &registry());

        assert_eq!(prediction.label, "healthy");
        assert!((prediction.confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn ties_resolve_to_the_lowest_index() {
        let prediction = decode(&[0.4, 0.4, 0.2], &registry());

        assert_eq!(prediction.label, "bacterial_blight");
    }

    #[test]
    fn decoding_is_deterministic() {
        let probs = [0.25, 0.25, 0.5];
        let first = decode(&probs, &registry());
        let second = decode(&probs, &registry());

        assert_eq!(first, second);
    }

    #[test]
    fn out_of_range_index_decodes_to_unknown() {
        let short = ClassRegistry::from_labels(vec!["only_one".to_string()]);

        let prediction = decode(&[0.1, 0.9], &short);

        assert_eq!(prediction.label, "Unknown");
        assert!((prediction.confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn empty_registry_always_decodes_to_unknown() {
        let prediction = decode(&[0.3, 0.7], &ClassRegistry::default());

        assert_eq!(prediction.label, "Unknown");
    }

    #[test]
    fn empty_probabilities_decode_to_unknown_with_zero_confidence() {
        let prediction = decode(&[], &registry());

        assert_eq!(prediction.label, "Unknown");
        assert_eq!(prediction.confidence, 0.0);
    }

    #[test]
    fn rounding_matches_display_and_stored_precision() {
        assert_eq!(round_confidence(0.98765, 2), 0.99);
        assert_eq!(round_confidence(0.98765, 4), 0.9877);
        assert_eq!(round_confidence(0.5, 2), 0.5);
    }
}
