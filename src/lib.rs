//! Plant disease detection from leaf photos.
//!
//! A pre-trained ONNX classifier maps a 224x224 RGB tensor to probabilities
//! over 15 crop/disease classes. This crate owns everything around that
//! black box: decoding and normalizing uploads, interpreting the output
//! vector, the static cause/prevention knowledge table, the downloadable
//! report, and the single-page upload UI.

pub mod disease_model;
pub mod error;
pub mod knowledge;
pub mod model_config;
pub mod report;
pub mod server;
