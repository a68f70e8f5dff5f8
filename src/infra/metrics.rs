// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each run.
//
// Why log metrics to CSV?
//   - Easy to open in Excel or Google Sheets
//   - Can plot learning curves to diagnose training issues
//   - Provides a permanent record of each training run
//
// Columns per epoch row:
//   - epoch:     the epoch number (1, 2, 3, ...)
//   - train_err: average loss per training record
//   - train_acc: training accuracy
//   - test_err:  average loss per testing record (blank when
//                the run had no testing split)
//   - test_acc:  testing accuracy (blank likewise)
//
// Output file: models/metrics.csv
//
// Example CSV output:
//   epoch,train_err,train_acc,test_err,test_acc
//   1,2.104500,0.312000,2.089200,0.318000
//   2,1.890100,0.484000,1.854300,0.472000
//   ...
//
// The header is written once; later runs append their rows, so
// one file accumulates the full history across restarts.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use crate::ml::stats::ExecutionStats;

/// Logs per-epoch histories to a CSV file for later analysis.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        // Header only when the file is new, so runs append
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_err,train_acc,test_err,test_acc")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one row per epoch of a finished run. Epoch numbers
    /// start at `first_epoch`; testing cells stay blank when the
    /// run evaluated nothing.
    pub fn log_run(
        &self,
        first_epoch: usize,
        training:    &ExecutionStats,
        testing:     Option<&ExecutionStats>,
    ) -> Result<()> {
        // Open in append mode — adds to end of file
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        for (offset, (err, acc)) in training.err().iter().zip(training.acc()).enumerate() {
            let epoch    = first_epoch + offset;
            let test_err = testing.and_then(|stats| stats.err().get(offset));
            let test_acc = testing.and_then(|stats| stats.acc().get(offset));

            writeln!(
                f,
                "{},{:.6},{:.6},{},{}",
                epoch,
                err,
                acc,
                cell(test_err),
                cell(test_acc),
            )?;
        }

        tracing::debug!(
            "Logged {} epoch rows to '{}'",
            training.len(),
            self.csv_path.display(),
        );
        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

fn cell(value: Option<&f64>) -> String {
    value.map_or_else(String::new, |value| format!("{value:.6}"))
}
