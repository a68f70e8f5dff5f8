// ============================================================
// Layer 5 — Predictor
// ============================================================
use anyhow::Result;
use burn::prelude::*;
use std::path::Path;

use crate::data::loader;
use crate::data::preprocessor::DigitPreprocessor;
use crate::domain::traits::Preprocessing;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::network::{DigitMlp, DigitMlpConfig};

type InferBackend = burn::backend::NdArray;

/// One classified record: the winning class and its softmax
/// probability.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class:      usize,
    pub confidence: f32,
}

pub struct Predictor {
    model:       DigitMlp<InferBackend>,
    input_width: usize,
    classes:     usize,
    device:      burn::backend::ndarray::NdArrayDevice,
}

impl Predictor {
    /// Rebuild the trained network from the persisted config and
    /// the latest checkpoint. Dropout is forced to 0 so repeated
    /// predictions agree.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let cfg    = ckpt_manager.load_config()?;

        let model_cfg =
            DigitMlpConfig::new(cfg.input_width, cfg.hidden_size, cfg.classes, 0.0);
        let model: DigitMlp<InferBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint");

        Ok(Self {
            model,
            input_width: cfg.input_width,
            classes: cfg.classes,
            device,
        })
    }

    /// Classify every record in one raw image file, preprocessed
    /// the same way training data was.
    pub fn predict(&self, path: &Path) -> Result<Vec<Prediction>> {
        let images       = loader::read_images(path)?;
        let preprocessor = DigitPreprocessor::new(self.classes)?;
        let rows         = preprocessor.preprocess_data(&images, None)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let width = rows[0].len();
        if width != self.input_width {
            anyhow::bail!(
                "record width {} does not match the trained input width {}",
                width,
                self.input_width
            );
        }

        // Forward pass over all records in one batch
        let count = rows.len();
        let flat: Vec<f32> = rows.into_iter().flatten().collect();
        let input = Tensor::<InferBackend, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([count, self.input_width]);

        let logits = self.model.forward(input);

        // Softmax probabilities, one row per record
        let probs: Vec<f32> = burn::tensor::activation::softmax(logits, 1)
            .into_data().to_vec::<f32>().unwrap_or_default();

        Ok(probs.chunks(self.classes).map(best_class).collect())
    }
}

fn best_class(row: &[f32]) -> Prediction {
    let mut class      = 0usize;
    let mut confidence = f32::NEG_INFINITY;
    for (index, &prob) in row.iter().enumerate() {
        if prob > confidence {
            class      = index;
            confidence = prob;
        }
    }
    Prediction { class, confidence }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use std::fs;

    type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

    /// Persist a width-4, two-class model so the predictor has
    /// something to load.
    fn tiny_checkpoint(dir: &Path) -> CheckpointManager {
        let ckpt = CheckpointManager::new(dir);
        let cfg = TrainConfig {
            input_width: 4,
            hidden_size: 8,
            classes:     2,
            dropout:     0.0,
            ..TrainConfig::default()
        };
        ckpt.save_config(&cfg).unwrap();

        let device = burn::backend::ndarray::NdArrayDevice::default();
        let model = DigitMlpConfig::new(4, 8, 2, 0.0).init::<TrainBackend>(&device);
        ckpt.save_model(&model, 1).unwrap();
        ckpt
    }

    fn write_idx_images(path: &Path, count: u32, rows: u32, cols: u32, pixels: &[u8]) {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2051u32.to_be_bytes());
        bytes.extend_from_slice(&count.to_be_bytes());
        bytes.extend_from_slice(&rows.to_be_bytes());
        bytes.extend_from_slice(&cols.to_be_bytes());
        bytes.extend_from_slice(pixels);
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_predicts_one_class_per_record_from_a_checkpoint() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = tiny_checkpoint(dir.path());

        let input_path = dir.path().join("digits-idx3-ubyte");
        write_idx_images(&input_path, 2, 2, 2, &[0, 64, 128, 255, 10, 20, 30, 40]);

        let predictor = Predictor::from_checkpoint(&ckpt).unwrap();
        let predictions = predictor.predict(&input_path).unwrap();

        assert_eq!(predictions.len(), 2);
        for prediction in &predictions {
            assert!(prediction.class < 2);
            assert!((0.0..=1.0).contains(&prediction.confidence));
        }
    }

    #[test]
    fn test_empty_input_file_yields_no_predictions() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = tiny_checkpoint(dir.path());

        let input_path = dir.path().join("empty-idx3-ubyte");
        write_idx_images(&input_path, 0, 2, 2, &[]);

        let predictor = Predictor::from_checkpoint(&ckpt).unwrap();
        assert!(predictor.predict(&input_path).unwrap().is_empty());
    }

    #[test]
    fn test_record_width_must_match_the_trained_width() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = tiny_checkpoint(dir.path());

        let input_path = dir.path().join("wide-idx3-ubyte");
        write_idx_images(&input_path, 1, 3, 3, &[0; 9]);

        let predictor = Predictor::from_checkpoint(&ckpt).unwrap();
        assert!(predictor.predict(&input_path).is_err());
    }

    #[test]
    fn test_best_class_picks_the_top_probability() {
        let prediction = best_class(&[0.1, 0.7, 0.2]);

        assert_eq!(prediction.class, 1);
        assert!((prediction.confidence - 0.7).abs() < 1e-6);
    }
}
