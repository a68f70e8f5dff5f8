// ============================================================
// Layer 5 — Model Session
// ============================================================
// Owns everything one training or prediction run needs:
//
//   - an optional training split and an optional testing split,
//     each loaded and preprocessed independently
//   - the weights mapping, empty until a training loop fills it
//   - the injected preprocessing capability
//
// Raw data enters a session through two routes, and both are
// write-through: construction with file names reads via the
// loader and hands the records to the setters, and the setters
// run the preprocessing capability before storing anything.
// Once a split is stored there is no way to see the raw records
// again.
//
// A session with only one split loaded is a valid state. The
// split accessors distinguish the two cases sharply: the
// `_split()` inspectors return Option, while `training()` /
// `training_len()` (and their testing twins) treat absence as a
// programming error and panic.
//
// Reference: Rust Book §10 (Generics and Trait Bounds)

use std::collections::HashMap;
use std::path::PathBuf;

use crate::data::dataset::DatasetSplit;
use crate::data::loader;
use crate::domain::error::DigitResult;
use crate::domain::raw::RawImage;
use crate::domain::traits::Preprocessing;

/// File names of one split's raw pair under `<data root>/raw/`.
#[derive(Debug, Clone)]
pub struct SplitFiles {
    pub images: String,
    pub labels: String,
}

impl SplitFiles {
    pub fn new(images: impl Into<String>, labels: impl Into<String>) -> Self {
        Self {
            images: images.into(),
            labels: labels.into(),
        }
    }
}

/// Raw file names for a session. Either pair may be omitted
/// independently; an omitted pair leaves its split unset.
#[derive(Debug, Clone, Default)]
pub struct DataFiles {
    pub training: Option<SplitFiles>,
    pub testing:  Option<SplitFiles>,
}

/// One training/prediction session over preprocessed digit data.
/// Generic over the preprocessing capability, so a model without
/// one does not compile.
#[derive(Debug)]
pub struct ModelSession<P: Preprocessing> {
    data_path:     PathBuf,
    preprocessing: P,
    training:      Option<DatasetSplit>,
    testing:       Option<DatasetSplit>,
    weights:       HashMap<String, Vec<f32>>,
}

impl<P: Preprocessing> ModelSession<P> {
    /// Create a session rooted at `data_path`, loading whichever
    /// raw pairs `files` names. A named pair that cannot be read
    /// or parsed fails the whole construction; nothing is kept
    /// partially loaded.
    pub fn new(
        data_path: impl Into<PathBuf>,
        preprocessing: P,
        files: &DataFiles,
    ) -> DigitResult<Self> {
        let mut session = Self {
            data_path: data_path.into(),
            preprocessing,
            training: None,
            testing: None,
            weights: HashMap::new(),
        };
        if let Some(pair) = &files.training {
            session.load_training(pair)?;
        }
        if let Some(pair) = &files.testing {
            session.load_testing(pair)?;
        }
        Ok(session)
    }

    /// Read a raw pair from `<data root>/raw/` and store it as
    /// the training split.
    pub fn load_training(&mut self, pair: &SplitFiles) -> DigitResult<()> {
        let (images, labels) = self.read_pair(pair)?;
        self.set_training_data(&images, &labels)
    }

    /// Read a raw pair from `<data root>/raw/` and store it as
    /// the testing split.
    pub fn load_testing(&mut self, pair: &SplitFiles) -> DigitResult<()> {
        let (images, labels) = self.read_pair(pair)?;
        self.set_testing_data(&images, &labels)
    }

    /// Preprocess raw records and store them as the training
    /// split. Re-supplying raw data is the only way to change a
    /// populated split.
    pub fn set_training_data(&mut self, images: &[RawImage], labels: &[u8]) -> DigitResult<()> {
        let split = self.preprocess_pair(images, labels)?;
        tracing::debug!("Training split set: {} records", split.len());
        self.training = Some(split);
        Ok(())
    }

    /// Preprocess raw records and store them as the testing split.
    pub fn set_testing_data(&mut self, images: &[RawImage], labels: &[u8]) -> DigitResult<()> {
        let split = self.preprocess_pair(images, labels)?;
        tracing::debug!("Testing split set: {} records", split.len());
        self.testing = Some(split);
        Ok(())
    }

    /// Paired (feature, label) rows of the training split. Every
    /// call starts a fresh pass, so the pairing can be iterated
    /// any number of times.
    ///
    /// # Panics
    /// Panics when no training data was loaded. Check
    /// `training_split()` first when absence is expected.
    pub fn training(&self) -> impl Iterator<Item = (&[f32], &[f32])> + '_ {
        match &self.training {
            Some(split) => split.pairs(),
            None => panic!("training data was never loaded for this session"),
        }
    }

    /// Paired (feature, label) rows of the testing split.
    ///
    /// # Panics
    /// Panics when no testing data was loaded.
    pub fn testing(&self) -> impl Iterator<Item = (&[f32], &[f32])> + '_ {
        match &self.testing {
            Some(split) => split.pairs(),
            None => panic!("testing data was never loaded for this session"),
        }
    }

    /// Number of paired training records.
    ///
    /// # Panics
    /// Panics when no training data was loaded.
    pub fn training_len(&self) -> usize {
        match &self.training {
            Some(split) => split.len(),
            None => panic!("training data was never loaded for this session"),
        }
    }

    /// Number of paired testing records.
    ///
    /// # Panics
    /// Panics when no testing data was loaded.
    pub fn testing_len(&self) -> usize {
        match &self.testing {
            Some(split) => split.len(),
            None => panic!("testing data was never loaded for this session"),
        }
    }

    /// The training split, None until populated.
    pub fn training_split(&self) -> Option<&DatasetSplit> {
        self.training.as_ref()
    }

    /// The testing split, None until populated.
    pub fn testing_split(&self) -> Option<&DatasetSplit> {
        self.testing.as_ref()
    }

    /// Learned parameters by name. Empty at construction; the
    /// session never writes into it itself.
    pub fn weights(&self) -> &HashMap<String, Vec<f32>> {
        &self.weights
    }

    /// Mutable access for the training loop that owns updates.
    pub fn weights_mut(&mut self) -> &mut HashMap<String, Vec<f32>> {
        &mut self.weights
    }

    fn preprocess_pair(&self, images: &[RawImage], labels: &[u8]) -> DigitResult<DatasetSplit> {
        let features = self.preprocessing.preprocess_data(images, None)?;
        let targets  = self.preprocessing.preprocess_label(labels, None)?;
        DatasetSplit::new(features, targets)
    }

    fn read_pair(&self, pair: &SplitFiles) -> DigitResult<(Vec<RawImage>, Vec<u8>)> {
        let dir    = self.data_path.join("raw");
        let images = loader::read_images(&dir.join(&pair.images))?;
        let labels = loader::read_labels(&dir.join(&pair.labels))?;
        Ok((images, labels))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::preprocessor::DigitPreprocessor;
    use crate::domain::error::DigitError;
    use std::fs;
    use std::path::Path;

    /// Write a `raw/` directory holding one IDX pair: `count`
    /// 2x2 images (pixel value = record index) and labels
    /// cycling 0..classes.
    fn write_raw_pair(root: &Path, images_name: &str, labels_name: &str, count: u8, classes: u8) {
        let raw = root.join("raw");
        fs::create_dir_all(&raw).unwrap();

        let mut image_bytes = Vec::new();
        image_bytes.extend_from_slice(&2051u32.to_be_bytes());
        image_bytes.extend_from_slice(&u32::from(count).to_be_bytes());
        image_bytes.extend_from_slice(&2u32.to_be_bytes());
        image_bytes.extend_from_slice(&2u32.to_be_bytes());
        for record in 0..count {
            image_bytes.extend_from_slice(&[record; 4]);
        }
        fs::write(raw.join(images_name), image_bytes).unwrap();

        let mut label_bytes = Vec::new();
        label_bytes.extend_from_slice(&2049u32.to_be_bytes());
        label_bytes.extend_from_slice(&u32::from(count).to_be_bytes());
        label_bytes.extend((0..count).map(|record| record % classes));
        fs::write(raw.join(labels_name), label_bytes).unwrap();
    }

    fn both_pairs() -> DataFiles {
        DataFiles {
            training: Some(SplitFiles::new("train-images", "train-labels")),
            testing:  Some(SplitFiles::new("test-images", "test-labels")),
        }
    }

    #[test]
    fn test_construction_loads_and_preprocesses_both_splits() {
        let dir = tempfile::tempdir().unwrap();
        write_raw_pair(dir.path(), "train-images", "train-labels", 6, 3);
        write_raw_pair(dir.path(), "test-images", "test-labels", 4, 3);

        let session = ModelSession::new(
            dir.path(),
            DigitPreprocessor::new(3).unwrap(),
            &both_pairs(),
        )
        .unwrap();

        assert_eq!(session.training_len(), 6);
        assert_eq!(session.testing_len(), 4);

        // Stored rows are the preprocessed form, not raw bytes
        let split = session.training_split().unwrap();
        assert_eq!(split.features()[1], vec![1.0 / 255.0; 4]);
        assert_eq!(split.labels()[1], vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_omitted_pair_leaves_its_split_unset() {
        let dir = tempfile::tempdir().unwrap();
        write_raw_pair(dir.path(), "train-images", "train-labels", 3, 3);

        let files = DataFiles {
            training: Some(SplitFiles::new("train-images", "train-labels")),
            testing:  None,
        };
        let session =
            ModelSession::new(dir.path(), DigitPreprocessor::new(3).unwrap(), &files).unwrap();

        assert!(session.training_split().is_some());
        assert!(session.testing_split().is_none());
    }

    #[test]
    fn test_missing_test_images_file_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        write_raw_pair(dir.path(), "train-images", "train-labels", 3, 3);
        write_raw_pair(dir.path(), "test-images", "test-labels", 3, 3);
        fs::remove_file(dir.path().join("raw/test-images")).unwrap();

        let err = ModelSession::new(
            dir.path(),
            DigitPreprocessor::new(3).unwrap(),
            &both_pairs(),
        )
        .unwrap_err();

        assert!(err.is_not_found(), "got {err:?}");
    }

    #[test]
    fn test_same_files_yield_equal_splits() {
        let dir = tempfile::tempdir().unwrap();
        write_raw_pair(dir.path(), "train-images", "train-labels", 5, 3);

        let files = DataFiles {
            training: Some(SplitFiles::new("train-images", "train-labels")),
            testing:  None,
        };
        let first =
            ModelSession::new(dir.path(), DigitPreprocessor::new(3).unwrap(), &files).unwrap();
        let second =
            ModelSession::new(dir.path(), DigitPreprocessor::new(3).unwrap(), &files).unwrap();

        assert_eq!(first.training_split(), second.training_split());
    }

    #[test]
    fn test_training_pairs_can_be_iterated_repeatedly() {
        let dir = tempfile::tempdir().unwrap();
        write_raw_pair(dir.path(), "train-images", "train-labels", 4, 2);

        let files = DataFiles {
            training: Some(SplitFiles::new("train-images", "train-labels")),
            testing:  None,
        };
        let session =
            ModelSession::new(dir.path(), DigitPreprocessor::new(2).unwrap(), &files).unwrap();

        let first:  Vec<_> = session.training().collect();
        let second: Vec<_> = session.training().collect();

        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
    }

    #[test]
    #[should_panic]
    fn test_training_accessor_without_data_panics() {
        let session = ModelSession::new(
            "data",
            DigitPreprocessor::default(),
            &DataFiles::default(),
        )
        .unwrap();

        let _ = session.training();
    }

    #[test]
    #[should_panic]
    fn test_testing_len_without_data_panics() {
        let session = ModelSession::new(
            "data",
            DigitPreprocessor::default(),
            &DataFiles::default(),
        )
        .unwrap();

        session.testing_len();
    }

    #[test]
    fn test_setters_preprocess_and_replace() {
        let mut session = ModelSession::new(
            "data",
            DigitPreprocessor::new(2).unwrap(),
            &DataFiles::default(),
        )
        .unwrap();

        let images = vec![RawImage::new(vec![255, 0, 0, 0], 2, 2)];
        session.set_training_data(&images, &[1]).unwrap();
        assert_eq!(session.training_len(), 1);
        assert_eq!(session.training_split().unwrap().labels()[0], vec![0.0, 1.0]);

        let more = vec![
            RawImage::new(vec![0; 4], 2, 2),
            RawImage::new(vec![0; 4], 2, 2),
        ];
        session.set_training_data(&more, &[0, 1]).unwrap();
        assert_eq!(session.training_len(), 2);
    }

    #[test]
    fn test_mismatched_raw_pair_is_refused() {
        let mut session = ModelSession::new(
            "data",
            DigitPreprocessor::new(2).unwrap(),
            &DataFiles::default(),
        )
        .unwrap();

        let images = vec![RawImage::new(vec![0; 4], 2, 2)];
        let err = session.set_training_data(&images, &[0, 1]).unwrap_err();

        assert!(matches!(err, DigitError::LengthMismatch { .. }), "got {err:?}");
    }

    #[test]
    fn test_weights_start_empty_and_accept_updates() {
        let mut session = ModelSession::new(
            "data",
            DigitPreprocessor::default(),
            &DataFiles::default(),
        )
        .unwrap();

        assert!(session.weights().is_empty());

        session
            .weights_mut()
            .insert("hidden.weight".to_string(), vec![0.5, -0.5]);

        assert_eq!(session.weights()["hidden.weight"], vec![0.5, -0.5]);
    }
}
