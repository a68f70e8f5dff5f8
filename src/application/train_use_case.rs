// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Build preprocessing      (Layer 4 - data)
//   Step 2: Resolve raw file names   (Layer 2)
//   Step 3: Load + preprocess splits (Layer 5 - session)
//   Step 4: Save config              (Layer 6 - infra)
//   Step 5: Run training loop        (Layer 5 - ml)
//   Step 6: Persist epoch metrics    (Layer 6 - infra)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::preprocessor::DigitPreprocessor;
use crate::domain::error::{DigitError, DigitResult};
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::session::{DataFiles, ModelSession, SplitFiles};
use crate::ml::trainer::{run_training, TrainOutcome};

// ─── Training Configuration ──────────────────────────────────────────────────
// All knobs for a training run: which raw pairs to read, how
// long to train, and the network architecture. Serialisable so
// it can be saved to disk and reloaded for prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub training_images: String,
    pub training_labels: String,
    pub test_images:     Option<String>,
    pub test_labels:     Option<String>,
    pub epochs:          usize,
    pub initial_epoch:   usize,
    pub batch_size:      usize,
    pub shuffle:         bool,
    pub lr:              f64,
    pub input_width:     usize,
    pub hidden_size:     usize,
    pub classes:         usize,
    pub dropout:         f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            training_images: "train-images-idx3-ubyte".to_string(),
            training_labels: "train-labels-idx1-ubyte".to_string(),
            test_images:     Some("t10k-images-idx3-ubyte".to_string()),
            test_labels:     Some("t10k-labels-idx1-ubyte".to_string()),
            epochs:          1,
            initial_epoch:   0,
            batch_size:      32,
            shuffle:         true,
            lr:              1e-3,
            input_width:     784,
            hidden_size:     128,
            classes:         10,
            dropout:         0.1,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and settings, runs the pipeline end to end.
pub struct TrainUseCase {
    config:   TrainConfig,
    settings: crate::application::settings::Settings,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig, settings: crate::application::settings::Settings) -> Self {
        Self { config, settings }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainOutcome> {
        let cfg = &self.config;

        // ── Step 1: Build the preprocessing capability ───────────────────────
        let preprocessor = DigitPreprocessor::new(cfg.classes)?;

        // ── Step 2: Resolve raw file names ───────────────────────────────────
        // A one-sided testing pair is a config mistake, caught
        // before any file is touched.
        let files = self.data_files()?;

        // ── Step 3: Load + preprocess both splits ────────────────────────────
        tracing::info!(
            "Loading raw pairs from '{}'",
            self.settings.data_path.display()
        );
        let mut session = ModelSession::new(&self.settings.data_path, preprocessor, &files)?;
        tracing::info!("Training records: {}", session.training_len());
        if let Some(split) = session.testing_split() {
            tracing::info!("Testing records: {}", split.len());
        }

        // ── Step 4: Save config for prediction ───────────────────────────────
        // The predictor needs the architecture to rebuild the network
        let ckpt_manager = CheckpointManager::new(&self.settings.models_path);
        ckpt_manager.save_config(cfg)?;

        // ── Step 5: Run training loop (Layer 5) ──────────────────────────────
        let outcome = run_training(cfg, &mut session, &ckpt_manager)?;

        // ── Step 6: Persist per-epoch metrics ────────────────────────────────
        let logger = MetricsLogger::new(&self.settings.models_path)?;
        logger.log_run(cfg.initial_epoch + 1, &outcome.training, outcome.testing.as_ref())?;
        tracing::info!("Metrics written to '{}'", logger.csv_path().display());

        Ok(outcome)
    }

    fn data_files(&self) -> DigitResult<DataFiles> {
        let cfg = &self.config;

        let testing = match (&cfg.test_images, &cfg.test_labels) {
            (Some(images), Some(labels)) => Some(SplitFiles::new(images.as_str(), labels.as_str())),
            (None, None) => None,
            _ => {
                return Err(DigitError::Config(
                    "test images and test labels must be named together".into(),
                ))
            }
        };

        Ok(DataFiles {
            training: Some(SplitFiles::new(
                cfg.training_images.as_str(),
                cfg.training_labels.as_str(),
            )),
            testing,
        })
    }
}
