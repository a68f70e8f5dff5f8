// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// What gets saved per checkpoint:
//   1. Model weights (.mpk file)   — all learned parameters
//   2. latest_epoch.json           — which epoch was last saved
//   3. train_config.json           — run + architecture config
//
// Why save the config separately?
//   When loading for prediction, we need to know the exact
//   architecture (input_width, hidden_size, classes) to rebuild
//   the network before loading the weights into it.
//
// File naming convention:
//   models/
//     model_epoch_1.mpk      ← weights after epoch 1
//     model_epoch_2.mpk      ← weights after epoch 2
//     ...
//     latest_epoch.json      ← contains the number of latest epoch
//     train_config.json      ← run hyperparameters
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{CompactRecorder, Recorder},
    tensor::backend::{AutodiffBackend, Backend},
};
use std::{fs, path::PathBuf};

use crate::application::train_use_case::TrainConfig;
use crate::ml::network::DigitMlp;

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        // create_dir_all creates parent directories too, like `mkdir -p`
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Save model weights for a given epoch and advance the
    /// latest-epoch pointer.
    pub fn save_model<B: AutodiffBackend>(
        &self,
        model: &DigitMlp<B>,
        epoch: usize,
    ) -> Result<()> {
        // Recorder adds the extension itself
        let path = self.dir.join(format!("model_epoch_{epoch}"));

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        // The pointer tells the predictor which file to load
        let latest_path = self.dir.join("latest_epoch.json");
        fs::write(&latest_path, serde_json::to_string(&epoch)?)
            .with_context(|| "Failed to write latest_epoch.json")?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Load model weights from the latest saved checkpoint.
    ///
    /// The model parameter must have the correct architecture
    /// (matching the saved checkpoint) or loading will fail.
    pub fn load_model<B: Backend>(
        &self,
        model:  DigitMlp<B>,
        device: &B::Device,
    ) -> Result<DigitMlp<B>> {
        let epoch = self.latest_epoch()?;
        let path  = self.dir.join(format!("model_epoch_{epoch}"));

        tracing::info!("Loading checkpoint from epoch {}", epoch);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display()
                )
            })?;

        // load_record() returns a new model with the loaded weights
        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON.
    ///
    /// Called before training starts so the predictor can
    /// reconstruct the exact architecture later.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");

        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");

        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. \
                 Make sure you have run 'train' before 'predict'.",
                path.display()
            )
        })?;

        Ok(serde_json::from_str(&json)?)
    }

    /// Read latest_epoch.json and return the epoch number.
    /// Returns an error if training hasn't been run yet.
    fn latest_epoch(&self) -> Result<usize> {
        let path = self.dir.join("latest_epoch.json");

        let s = fs::read_to_string(&path).with_context(|| {
            "Cannot find 'latest_epoch.json'. \
             Have you run 'train' first?"
        })?;

        Ok(serde_json::from_str::<usize>(&s)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::network::DigitMlpConfig;

    type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

    #[test]
    fn test_config_round_trips_through_json() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());

        let cfg = TrainConfig {
            epochs:      3,
            hidden_size: 64,
            ..TrainConfig::default()
        };
        ckpt.save_config(&cfg).unwrap();
        let loaded = ckpt.load_config().unwrap();

        assert_eq!(loaded.epochs, 3);
        assert_eq!(loaded.hidden_size, 64);
        assert_eq!(loaded.input_width, cfg.input_width);
    }

    #[test]
    fn test_latest_checkpoint_wins() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        let device = burn::backend::ndarray::NdArrayDevice::default();

        let model = DigitMlpConfig::new(4, 8, 2, 0.0).init::<TrainBackend>(&device);
        ckpt.save_model(&model, 1).unwrap();
        ckpt.save_model(&model, 2).unwrap();

        assert_eq!(ckpt.latest_epoch().unwrap(), 2);

        let restored = DigitMlpConfig::new(4, 8, 2, 0.0).init::<TrainBackend>(&device);
        assert!(ckpt.load_model(restored, &device).is_ok());
    }

    #[test]
    fn test_loading_before_training_reports_missing_checkpoint() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        let device = burn::backend::ndarray::NdArrayDevice::default();

        let model = DigitMlpConfig::new(4, 8, 2, 0.0).init::<TrainBackend>(&device);
        let err = ckpt.load_model(model, &device).unwrap_err();

        assert!(err.to_string().contains("latest_epoch.json"));
    }
}
