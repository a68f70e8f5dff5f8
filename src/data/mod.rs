// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from raw IDX files
// all the way to model-ready tensor batches.
//
// The pipeline flows in this order:
//
//   raw IDX files (images + labels)
//       │
//       ▼
//   loader            → reads files, validates the IDX layout
//       │
//       ▼
//   DigitPreprocessor → scales pixels, one-hot encodes labels
//       │
//       ▼
//   DatasetSplit      → pairs feature rows with label rows,
//       │               implements Burn's Dataset trait
//       ▼
//   DigitBatcher      → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Reads raw IDX image and label files from disk
pub mod loader;

/// The concrete preprocessing capability for digit data
pub mod preprocessor;

/// Paired feature/label rows implementing Burn's Dataset trait
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
