use crate::error::ModelError;
use crate::model_config::{ImageSize, ModelConfig};
use image::{DynamicImage, ImageFormat, Pixel, RgbImage};
use ndarray::{Array, IxDyn};
use ort::inputs;
use ort::session::builder::SessionBuilder;
use ort::session::{Session, SessionOutputs};
use std::path::Path;
use tracing::info;

/// A single classification outcome: the winning label and its probability
/// expressed as a percentage rounded to two decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub index: usize,
    pub label: String,
    pub confidence: f32,
}

/// The pre-trained leaf classifier, loaded once at startup.
///
/// The ONNX session is read-only after construction, so a shared reference
/// can serve concurrent requests without locking.
pub struct DiseaseModel {
    session: Session,
    config: ModelConfig,
}

impl DiseaseModel {
    /// Loads `model.onnx` (and `model_config.json`, if present) from
    /// `model_dir`. Any failure here is fatal for the process.
    pub fn new(model_dir: &Path) -> Result<Self, ModelError> {
        let model_path = model_dir.join("model.onnx");
        let config_path = model_dir.join("model_config.json");

        if !model_path.exists() {
            return Err(ModelError::InvalidPath(format!(
                "model file not found: {}",
                model_path.display()
            )));
        }

        let config = if config_path.exists() {
            let file = std::fs::File::open(&config_path)?;
            serde_json::from_reader(file)?
        } else {
            info!(
                "no model_config.json in {}, using built-in label set",
                model_dir.display()
            );
            ModelConfig::default()
        };

        info!(
            labels = config.labels.len(),
            width = config.size.width,
            height = config.size.height,
            "loading ONNX model from {}",
            model_path.display()
        );

        let session = SessionBuilder::new()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_intra_threads(num_cpus::get())?
            .commit_from_file(model_path)?;

        info!("ONNX Runtime session created");

        Ok(Self { session, config })
    }

    /// The ordered label set the output vector is interpreted against.
    pub fn labels(&self) -> &[String] {
        &self.config.labels
    }

    /// Runs the full pipeline on raw upload bytes: decode and normalize,
    /// invoke the model, interpret the probability vector.
    pub fn predict(&self, image_bytes: &[u8]) -> Result<Prediction, ModelError> {
        let tensor = normalize(image_bytes, &self.config.size)?;
        self.classify(&tensor)
    }

    /// Feeds a normalized tensor through the session and reduces the output
    /// to a `Prediction`.
    pub fn classify(&self, tensor: &Array<f32, IxDyn>) -> Result<Prediction, ModelError> {
        let input_name = self.session.inputs[0].name.clone();
        let inputs = inputs![input_name.as_str() => tensor.view()]?;

        let outputs: SessionOutputs = self.session.run(inputs)?;

        let output_name = self.session.outputs[0].name.clone();
        let output_value = outputs
            .get(&output_name)
            .ok_or(ModelError::OutputFormatUnexpected)?;

        let scores_view = output_value.try_extract_tensor::<f32>()?;
        let scores = scores_view.as_slice().ok_or(ModelError::OutputConversion)?;

        if self.config.apply_softmax {
            interpret(&softmax(scores), &self.config.labels)
        } else {
            interpret(scores, &self.config.labels)
        }
    }
}

/// Decodes uploaded bytes and produces the tensor the model expects:
/// shape `[1, height, width, 3]`, values scaled into `[0, 1]`.
///
/// Only JPEG and PNG are accepted. The Triangle filter is fixed so that
/// repeated uploads of the same file yield identical confidence scores.
pub fn normalize(image_bytes: &[u8], size: &ImageSize) -> Result<Array<f32, IxDyn>, ModelError> {
    let format = image::guess_format(image_bytes).map_err(|_| ModelError::UnsupportedFormat)?;
    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return Err(ModelError::UnsupportedFormat);
    }

    let decoded: DynamicImage = image::load_from_memory_with_format(image_bytes, format)?;

    let resized = decoded.resize_exact(
        size.width as u32,
        size.height as u32,
        image::imageops::FilterType::Triangle,
    );
    let rgb_image: RgbImage = resized.to_rgb8();

    // NHWC with a batch dimension of one, matching the exported graph.
    let mut array = Array::zeros((1, size.height, size.width, 3));
    for (x, y, pixel) in rgb_image.enumerate_pixels() {
        let rgb = pixel.to_rgb();
        for c in 0..3 {
            array[[0, y as usize, x as usize, c]] = rgb[c] as f32 / 255.0;
        }
    }

    Ok(array.into_dyn())
}

/// Reduces a probability vector to the winning label.
///
/// The vector length must equal the label count; indexing positionally into
/// a vector of the wrong length would silently report the wrong disease.
/// Ties go to the first occurrence, the conventional argmax behavior.
pub fn interpret(scores: &[f32], labels: &[String]) -> Result<Prediction, ModelError> {
    if scores.len() != labels.len() {
        return Err(ModelError::ShapeMismatch {
            expected: labels.len(),
            actual: scores.len(),
        });
    }
    if scores.is_empty() {
        return Err(ModelError::OutputFormatUnexpected);
    }

    let mut best_index = 0usize;
    let mut best_score = f32::NEG_INFINITY;
    for (i, &score) in scores.iter().enumerate() {
        if score > best_score {
            best_score = score;
            best_index = i;
        }
    }

    Ok(Prediction {
        index: best_index,
        label: labels[best_index].clone(),
        confidence: round2(100.0 * best_score),
    })
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn softmax(data: &[f32]) -> Vec<f32> {
    let max_val = data.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let exps: Vec<f32> = data.iter().map(|&x| (x - max_val).exp()).collect();
    let sum_exps: f32 = exps.iter().sum();
    exps.into_iter().map(|x| x / sum_exps).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_config::DEFAULT_LABELS;
    use std::io::Cursor;

    fn labels() -> Vec<String> {
        DEFAULT_LABELS.iter().map(|s| s.to_string()).collect()
    }

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgb([(x % 256) as u8, (y % 256) as u8, 128]);
        }
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn normalize_produces_unit_range_nhwc_tensor() {
        let size = ImageSize::default();
        for (w, h) in [(10, 10), (640, 480), (224, 224), (3, 500)] {
            let tensor = normalize(&encode_png(w, h), &size).unwrap();
            assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
            assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn normalize_rejects_non_image_bytes() {
        let size = ImageSize::default();
        let err = normalize(b"this is a text file, not an image", &size).unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedFormat));
    }

    #[test]
    fn normalize_rejects_truncated_png() {
        let size = ImageSize::default();
        let mut bytes = encode_png(64, 64);
        bytes.truncate(40);
        let err = normalize(&bytes, &size).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Decode(_) | ModelError::UnsupportedFormat
        ));
    }

    #[test]
    fn normalize_rejects_unaccepted_format() {
        // A valid GIF header; the format itself is not allowed.
        let bytes = b"GIF89a\x01\x00\x01\x00\x00\x00\x00";
        let err = normalize(bytes, &ImageSize::default()).unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedFormat));
    }

    #[test]
    fn interpret_picks_argmax_and_scales_confidence() {
        let mut scores = vec![0.01f32; 15];
        scores[5] = 0.70;
        let prediction = interpret(&scores, &labels()).unwrap();
        assert_eq!(prediction.index, 5);
        assert_eq!(prediction.label, "Tomato_Bacterial_spot");
        assert_eq!(prediction.confidence, 70.0);
    }

    #[test]
    fn interpret_rounds_to_two_decimals() {
        let mut scores = vec![0.0f32; 15];
        scores[2] = 0.333_333;
        let prediction = interpret(&scores, &labels()).unwrap();
        assert_eq!(prediction.confidence, 33.33);
    }

    #[test]
    fn interpret_breaks_ties_on_first_index() {
        let mut scores = vec![0.0f32; 15];
        scores[3] = 0.5;
        scores[9] = 0.5;
        let prediction = interpret(&scores, &labels()).unwrap();
        assert_eq!(prediction.index, 3);
    }

    #[test]
    fn interpret_rejects_mismatched_vector_length() {
        let scores = vec![0.1f32; 14];
        let err = interpret(&scores, &labels()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::ShapeMismatch {
                expected: 15,
                actual: 14
            }
        ));
    }

    #[test]
    fn softmax_normalizes_logits() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }
}
