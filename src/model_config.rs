use serde::Deserialize;

/// The 15 classes the bundled model was trained on, in training order.
///
/// The model's output vector is interpreted positionally against this list,
/// so the order here must match the class order used at training time. A
/// `model_config.json` shipped next to the artifact can override it.
pub const DEFAULT_LABELS: [&str; 15] = [
    "Pepper__bell___Bacterial_spot",
    "Pepper__bell___healthy",
    "Potato___Early_blight",
    "Potato___Late_blight",
    "Potato___healthy",
    "Tomato_Bacterial_spot",
    "Tomato_Early_blight",
    "Tomato_Late_blight",
    "Tomato_Leaf_Mold",
    "Tomato_Septoria_leaf_spot",
    "Tomato_Spider_mites_Two_spotted_spider_mite",
    "Tomato__Target_Spot",
    "Tomato__Tomato_YellowLeaf__Curl_Virus",
    "Tomato__Tomato_mosaic_virus",
    "Tomato_healthy",
];

/// Metadata bundled alongside `model.onnx` as `model_config.json`.
///
/// Keeping the label list next to the artifact makes the positional coupling
/// between output index and label explicit: swapping the model swaps the
/// labels with it.
#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,
    #[serde(default)]
    pub size: ImageSize,
    /// Set when the exported graph ends in logits rather than a softmax.
    #[serde(default)]
    pub apply_softmax: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageSize {
    pub height: usize,
    pub width: usize,
}

impl Default for ImageSize {
    fn default() -> Self {
        Self {
            height: 224,
            width: 224,
        }
    }
}

fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|s| s.to_string()).collect()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            labels: default_labels(),
            size: ImageSize::default(),
            apply_softmax: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_full_label_set() {
        let config = ModelConfig::default();
        assert_eq!(config.labels.len(), 15);
        assert_eq!(config.size.height, 224);
        assert_eq!(config.size.width, 224);
        assert!(!config.apply_softmax);
    }

    #[test]
    fn empty_json_falls_back_to_defaults() {
        let config: ModelConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.labels, ModelConfig::default().labels);
    }

    #[test]
    fn explicit_labels_override_defaults() {
        let config: ModelConfig = serde_json::from_str(
            r#"{"labels": ["a", "b"], "size": {"height": 128, "width": 128}, "apply_softmax": true}"#,
        )
        .unwrap();
        assert_eq!(config.labels, vec!["a", "b"]);
        assert_eq!(config.size.height, 128);
        assert!(config.apply_softmax);
    }
}
