// ============================================================
// Layer 4 — Digit Preprocessor
// ============================================================
// The concrete preprocessing capability for the digit model.
// It turns raw IDX records into the rows the network trains on:
//
//   raw pixels  u8 0-255, row-major grid
//       │
//       ▼
//   features    f32 0.0-1.0, flattened to one row per image
//
//   raw labels  u8 class index
//       │
//       ▼
//   labels      f32 one-hot row, `classes` slots wide
//
// Both directions are pure functions of the input and the
// configured class count. Identical input always produces
// identical output, and the raw slices are never touched.
// Callers may override the numeric mapping per call; record
// validation runs regardless of which transform applies.
//
// Reference: Rust Book §13 (Iterators and Closures)

use crate::domain::error::{DigitError, DigitResult};
use crate::domain::raw::RawImage;
use crate::domain::traits::{DataTransform, LabelTransform, Preprocessing};

/// Divisor that maps pixel bytes onto the unit interval
const PIXEL_SCALE: f32 = 255.0;

/// Preprocessing for digit images: scale-and-flatten features,
/// one-hot labels over a fixed class count.
#[derive(Debug)]
pub struct DigitPreprocessor {
    /// Number of label classes; every label byte must be below it
    classes: usize,
}

impl DigitPreprocessor {
    /// Class count of the standard digit task (labels 0-9)
    pub const DIGIT_CLASSES: usize = 10;

    /// Create a preprocessor for `classes` label classes.
    /// A zero class count cannot encode any label and is refused.
    pub fn new(classes: usize) -> DigitResult<Self> {
        if classes == 0 {
            return Err(DigitError::Config(
                "class count must be at least 1".into(),
            ));
        }
        Ok(Self { classes })
    }

    /// The configured class count.
    pub fn classes(&self) -> usize {
        self.classes
    }

    /// Default feature transform: scale every pixel to [0, 1]
    /// and flatten each grid into one row.
    fn scale_and_flatten(images: &[RawImage]) -> Vec<Vec<f32>> {
        images
            .iter()
            .map(|image| {
                image
                    .pixels
                    .iter()
                    .map(|&p| f32::from(p) / PIXEL_SCALE)
                    .collect()
            })
            .collect()
    }

    /// Default label transform: one-hot encode each label byte
    /// into a row `classes` slots wide.
    fn one_hot(&self, labels: &[u8]) -> Vec<Vec<f32>> {
        labels
            .iter()
            .map(|&label| {
                let mut row = vec![0.0; self.classes];
                row[label as usize] = 1.0;
                row
            })
            .collect()
    }
}

/// Default to the standard ten-class digit task.
impl Default for DigitPreprocessor {
    fn default() -> Self {
        Self {
            classes: Self::DIGIT_CLASSES,
        }
    }
}

impl Preprocessing for DigitPreprocessor {
    fn preprocess_data(
        &self,
        images: &[RawImage],
        transform: Option<DataTransform>,
    ) -> DigitResult<Vec<Vec<f32>>> {
        // ── Step 1: Validate record shape ─────────────────────────────────────
        // Every record must carry the pixel count its dimensions
        // declare, and all records must share one grid shape, or
        // the rows produced here would not stack into a batch.
        for image in images {
            if image.pixels.len() != image.pixel_count() {
                return Err(DigitError::Config(format!(
                    "image carries {} pixels but declares {}x{}",
                    image.pixels.len(),
                    image.rows,
                    image.cols
                )));
            }
        }
        if let Some(first) = images.first() {
            if images
                .iter()
                .any(|i| i.rows != first.rows || i.cols != first.cols)
            {
                return Err(DigitError::Config(
                    "image records disagree on grid dimensions".into(),
                ));
            }
        }

        // ── Step 2: Apply the numeric mapping ─────────────────────────────────
        Ok(match transform {
            Some(custom) => custom(images),
            None => Self::scale_and_flatten(images),
        })
    }

    fn preprocess_label(
        &self,
        labels: &[u8],
        transform: Option<LabelTransform>,
    ) -> DigitResult<Vec<Vec<f32>>> {
        // ── Step 1: Validate label range ──────────────────────────────────────
        // A label at or above the class count has no slot in the
        // one-hot row, whatever transform ends up running.
        for &label in labels {
            if usize::from(label) >= self.classes {
                return Err(DigitError::Config(format!(
                    "label {} is out of range for {} classes",
                    label, self.classes
                )));
            }
        }

        // ── Step 2: Apply the numeric mapping ─────────────────────────────────
        Ok(match transform {
            Some(custom) => custom(labels),
            None => self.one_hot(labels),
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
// Reference: Rust Book §11 (Writing Automated Tests)
#[cfg(test)]
mod tests {
    use super::*;

    fn image(pixels: Vec<u8>) -> RawImage {
        RawImage::new(pixels, 2, 2)
    }

    #[test]
    fn test_features_are_scaled_and_flattened() {
        let p = DigitPreprocessor::default();
        let raw = vec![image(vec![0, 51, 102, 255])];

        let features = p.preprocess_data(&raw, None).unwrap();

        assert_eq!(features, vec![vec![0.0, 0.2, 0.4, 1.0]]);
    }

    #[test]
    fn test_labels_are_one_hot_rows() {
        let p = DigitPreprocessor::new(4).unwrap();

        let labels = p.preprocess_label(&[0, 3], None).unwrap();

        assert_eq!(labels[0], vec![1.0, 0.0, 0.0, 0.0]);
        assert_eq!(labels[1], vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_same_input_gives_same_output() {
        let p = DigitPreprocessor::default();
        let raw = vec![image(vec![7, 14, 21, 28]), image(vec![1, 2, 3, 4])];

        let first  = p.preprocess_data(&raw, None).unwrap();
        let second = p.preprocess_data(&raw, None).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_input_is_left_untouched() {
        let p = DigitPreprocessor::default();
        let raw      = vec![image(vec![5, 10, 15, 20])];
        let original = raw.clone();

        p.preprocess_data(&raw, None).unwrap();
        p.preprocess_label(&[1, 2], None).unwrap();

        assert_eq!(raw, original);
    }

    #[test]
    fn test_empty_input_is_valid_and_empty() {
        let p = DigitPreprocessor::default();

        assert!(p.preprocess_data(&[], None).unwrap().is_empty());
        assert!(p.preprocess_label(&[], None).unwrap().is_empty());
    }

    #[test]
    fn test_label_out_of_range_is_a_config_error() {
        let p = DigitPreprocessor::new(4).unwrap();

        let err = p.preprocess_label(&[0, 4], None).unwrap_err();

        assert!(matches!(err, DigitError::Config(_)), "got {err:?}");
    }

    #[test]
    fn test_zero_classes_is_refused() {
        assert!(DigitPreprocessor::new(0).is_err());
    }

    #[test]
    fn test_override_transform_replaces_the_default() {
        let p = DigitPreprocessor::default();
        let raw = vec![image(vec![10, 20, 30, 40])];

        fn pixel_sum(images: &[RawImage]) -> Vec<Vec<f32>> {
            images
                .iter()
                .map(|i| vec![i.pixels.iter().map(|&p| f32::from(p)).sum()])
                .collect()
        }

        let features = p.preprocess_data(&raw, Some(pixel_sum)).unwrap();

        assert_eq!(features, vec![vec![100.0]]);
    }

    #[test]
    fn test_mismatched_grid_dimensions_are_refused() {
        let p = DigitPreprocessor::default();
        let raw = vec![image(vec![1, 2, 3, 4]), RawImage::new(vec![1, 2], 1, 2)];

        assert!(p.preprocess_data(&raw, None).is_err());
    }

    #[test]
    fn test_pixel_buffer_must_match_declared_dimensions() {
        let p = DigitPreprocessor::default();
        let raw = vec![RawImage::new(vec![1, 2, 3], 2, 2)];

        assert!(p.preprocess_data(&raw, None).is_err());
    }
}
