// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Traits are Rust's way of defining shared behaviour —
// similar to interfaces in Java or abstract classes in Python.
//
// Every concrete model supplies its own preprocessing through
// the Preprocessing trait. A session is generic over it, so a
// model that forgets to provide the capability fails to compile
// instead of failing at run time. For example:
//   - DigitPreprocessor implements Preprocessing
//   - A future AudioPreprocessor could also implement it
//   - The session layer only sees the trait and works with
//     both without any changes
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use crate::domain::error::DigitResult;
use crate::domain::raw::RawImage;

/// Override transform for a whole raw image sequence. When a
/// caller passes one, it replaces the implementation's default
/// feature transform for that call.
pub type DataTransform = fn(&[RawImage]) -> Vec<Vec<f32>>;

/// Override transform for a whole raw label sequence.
pub type LabelTransform = fn(&[u8]) -> Vec<Vec<f32>>;

// ─── Preprocessing ────────────────────────────────────────────────────────────
/// The model-specific step that turns raw records into the
/// numeric rows a model trains on.
///
/// Contract for every implementation:
///   - Deterministic: identical input and configuration always
///     produce identical output
///   - Non-mutating: the raw input slices are borrowed and left
///     untouched
///   - Total on the empty sequence: an empty input is valid and
///     yields an empty output (callers that need data reject
///     emptiness themselves)
pub trait Preprocessing {
    /// Turn raw image records into feature rows. Validation of
    /// the records happens here; the optional `transform`
    /// replaces only the numeric mapping.
    fn preprocess_data(
        &self,
        images: &[RawImage],
        transform: Option<DataTransform>,
    ) -> DigitResult<Vec<Vec<f32>>>;

    /// Turn raw label bytes into label rows (one row per
    /// record). Label values are validated against the model's
    /// configuration before any transform runs.
    fn preprocess_label(
        &self,
        labels: &[u8],
        transform: Option<LabelTransform>,
    ) -> DigitResult<Vec<Vec<f32>>>;
}
