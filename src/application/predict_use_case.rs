// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Loads the latest trained model and classifies every record
// in one raw image file.

use anyhow::Result;
use std::path::Path;

use crate::application::settings::Settings;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::predictor::{Prediction, Predictor};

pub struct PredictUseCase {
    settings: Settings,
}

impl PredictUseCase {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Classify every record in `input`, a raw image file in
    /// the same format the training pairs use.
    pub fn execute(&self, input: &Path) -> Result<Vec<Prediction>> {
        let ckpt        = CheckpointManager::new(&self.settings.models_path);
        let predictor   = Predictor::from_checkpoint(&ckpt)?;
        let predictions = predictor.predict(input)?;
        tracing::info!("Classified {} records", predictions.len());
        Ok(predictions)
    }
}
