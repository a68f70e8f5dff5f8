use burn::data::dataset::Dataset;

use crate::domain::error::{DigitError, DigitResult};

/// One model-ready record: a feature row paired with its label row.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitSample {
    pub image:  Vec<f32>,
    pub target: Vec<f32>,
}

/// A paired feature/label sequence backing one data split.
/// Rows only enter through `new`, which rejects mismatched
/// counts, so both sides always hold the same number of records.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplit {
    features: Vec<Vec<f32>>,
    labels:   Vec<Vec<f32>>,
}

impl DatasetSplit {
    pub fn new(features: Vec<Vec<f32>>, labels: Vec<Vec<f32>>) -> DigitResult<Self> {
        if features.len() != labels.len() {
            return Err(DigitError::LengthMismatch {
                features: features.len(),
                labels:   labels.len(),
            });
        }
        Ok(Self { features, labels })
    }

    /// Number of paired records (both sides by construction).
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Width of one feature row, 0 when the split holds nothing.
    pub fn feature_width(&self) -> usize {
        self.features.first().map(Vec::len).unwrap_or(0)
    }

    pub fn features(&self) -> &[Vec<f32>] {
        &self.features
    }

    pub fn labels(&self) -> &[Vec<f32>] {
        &self.labels
    }

    /// Zip features and labels by position. Each call starts a
    /// fresh pass over the stored rows, so the pairing can be
    /// iterated any number of times.
    pub fn pairs(&self) -> impl Iterator<Item = (&[f32], &[f32])> + '_ {
        self.features
            .iter()
            .map(Vec::as_slice)
            .zip(self.labels.iter().map(Vec::as_slice))
    }
}

impl Dataset<DigitSample> for DatasetSplit {
    fn get(&self, index: usize) -> Option<DigitSample> {
        Some(DigitSample {
            image:  self.features.get(index)?.clone(),
            target: self.labels.get(index)?.clone(),
        })
    }

    fn len(&self) -> usize {
        self.features.len()
    }
}
