// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `predict`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use crate::application::train_use_case::TrainConfig;
use clap::{Args, Subcommand};

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the digit classifier on raw image/label pairs
    Train(TrainArgs),

    /// Classify the records of a raw image file using a trained checkpoint
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Root directory holding the raw/ data files (overrides DATA_PATH)
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Directory for checkpoints and metrics (overrides MODELS_PATH)
    #[arg(long)]
    pub models_dir: Option<String>,

    /// Training image file under <data root>/raw/
    #[arg(long, default_value = "train-images-idx3-ubyte")]
    pub training_images: String,

    /// Training label file under <data root>/raw/
    #[arg(long, default_value = "train-labels-idx1-ubyte")]
    pub training_labels: String,

    /// Testing image file under <data root>/raw/
    #[arg(long, default_value = "t10k-images-idx3-ubyte")]
    pub test_images: String,

    /// Testing label file under <data root>/raw/
    #[arg(long, default_value = "t10k-labels-idx1-ubyte")]
    pub test_labels: String,

    /// Train without a testing split (skips per-epoch evaluation)
    #[arg(long)]
    pub no_test: bool,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 1)]
    pub epochs: usize,

    /// Epoch number this run continues from — affects numbering
    /// in checkpoints and metrics, not the amount of work
    #[arg(long, default_value_t = 0)]
    pub initial_epoch: usize,

    /// Number of records processed together in one forward pass
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Keep the training records in file order
    #[arg(long)]
    pub no_shuffle: bool,

    /// How fast the model learns — too high causes instability,
    /// too low causes slow convergence
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Pixels per record (rows x cols of the raw images)
    #[arg(long, default_value_t = 784)]
    pub input_width: usize,

    /// Width of the hidden Linear layer
    #[arg(long, default_value_t = 128)]
    pub hidden_size: usize,

    /// Number of target classes (digits 0-9)
    #[arg(long, default_value_t = 10)]
    pub classes: usize,

    /// Dropout probability — randomly zeroes activations during training
    /// to prevent overfitting
    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            training_images: a.training_images,
            training_labels: a.training_labels,
            test_images:     if a.no_test { None } else { Some(a.test_images) },
            test_labels:     if a.no_test { None } else { Some(a.test_labels) },
            epochs:          a.epochs,
            initial_epoch:   a.initial_epoch,
            batch_size:      a.batch_size,
            shuffle:         !a.no_shuffle,
            lr:              a.lr,
            input_width:     a.input_width,
            hidden_size:     a.hidden_size,
            classes:         a.classes,
            dropout:         a.dropout,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Raw image file whose records should be classified
    #[arg(long)]
    pub input: String,

    /// Directory where checkpoints were saved during training
    /// (overrides MODELS_PATH)
    #[arg(long)]
    pub models_dir: Option<String>,
}
