// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`   — trains the classifier on raw image/label pairs
//   2. `predict` — loads a checkpoint and classifies a raw file
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, TrainArgs};

use crate::application::settings::Settings;

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "digit-model",
    version = "0.1.0",
    about = "Train a digit classifier on raw image files, then classify new records."
)]
pub struct Cli {
    /// The subcommand to run (train or predict)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

/// Handles the `train` subcommand.
/// Converts CLI args into a TrainConfig and hands off to Layer 2.
fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    // Environment first, CLI flags on top
    let settings = Settings::load()
        .with_overrides(args.data_dir.clone(), args.models_dir.clone());
    tracing::info!(
        "Starting training on raw pairs in: {}",
        settings.data_path.display()
    );

    let use_case = TrainUseCase::new(args.into(), settings);
    let outcome = use_case.execute()?;

    println!("Training {}", outcome.training);
    if let Some(stats) = &outcome.testing {
        println!("Testing  {}", stats);
    }
    println!("Training complete. Checkpoint saved.");
    Ok(())
}

/// Handles the `predict` subcommand.
/// Loads the model from checkpoint and prints one line per record.
fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let settings = Settings::load().with_overrides(None, args.models_dir.clone());

    let use_case    = PredictUseCase::new(settings);
    let predictions = use_case.execute(Path::new(&args.input))?;

    if predictions.is_empty() {
        println!("No records found in '{}'.", args.input);
        return Ok(());
    }
    for (index, prediction) in predictions.iter().enumerate() {
        println!(
            "{:>5}: {} ({:.1}%)",
            index,
            prediction.class,
            prediction.confidence * 100.0,
        );
    }
    Ok(())
}
