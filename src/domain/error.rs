// ============================================================
// Layer 3 — Error Types
// ============================================================
// One typed error enum covers every failure the data and ml
// layers can produce. Each variant carries the context a caller
// needs to report the failure (offending path, record counts,
// or a configuration message).
//
// Rules for these errors:
//   - Missing or malformed data files are recoverable values,
//     returned as Err and propagated with `?`
//   - Programmer errors (calling an accessor before the data it
//     exposes was loaded) are NOT represented here; those panic
//     at the call site instead
//
// Reference: Rust Book §9 (Error Handling)

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the data and ml layers.
pub type DigitResult<T> = Result<T, DigitError>;

/// Failures raised while loading, validating or preprocessing
/// raw digit data.
#[derive(Debug, Error)]
pub enum DigitError {
    /// A named raw data file does not exist under the data root.
    #[error("raw data file not found: {}", path.display())]
    DataNotFound { path: PathBuf },

    /// A raw data file exists but could not be read.
    #[error("failed to read raw data file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A raw data file was read but its bytes do not form a
    /// valid IDX payload.
    #[error("malformed raw data file {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// The image and label files of one split disagree on how
    /// many records they hold.
    #[error("record counts differ: {features} images vs {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    /// Invalid model or preprocessing configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DigitError {
    /// True when the failure is the dedicated missing-file case,
    /// as opposed to a present-but-broken file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DigitError::DataNotFound { .. })
    }
}
