// ============================================================
// Layer 5 — Execution Statistics
// ============================================================
// Accumulates the normalized loss and accuracy history of a
// training or evaluation run, one entry per measurement.
//
// The append contract:
//   append(loss, acc, data_length) stores loss/data_length in
//   the err history and acc/data_length in the acc history.
//   Callers hand over CUMULATIVE values (summed over all records
//   of the measurement) together with the record count, and the
//   history keeps the per-record averages.
//
// The histories only grow. Nothing rewrites an entry in place,
// so an entry's index is stable for the lifetime of the run.
//
// Reference: Rust Book §5 (Structs and Methods)

use std::fmt;

/// Normalized loss and accuracy histories of one run.
/// Both sequences grow only through `append` and always hold
/// the same number of entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionStats {
    err: Vec<f64>,
    acc: Vec<f64>,
}

impl ExecutionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one measurement: cumulative loss and cumulative
    /// correct count over `data_length` records.
    ///
    /// # Panics
    /// Panics when `data_length` is zero. Normalizing by an
    /// empty measurement is a caller bug, not an input error.
    pub fn append(&mut self, loss: f64, acc: f64, data_length: usize) {
        assert!(data_length > 0, "data_length must be positive");
        self.err.push(loss / data_length as f64);
        self.acc.push(acc / data_length as f64);
    }

    /// Normalized loss history, one entry per append.
    pub fn err(&self) -> &[f64] {
        &self.err
    }

    /// Normalized accuracy history, one entry per append.
    pub fn acc(&self) -> &[f64] {
        &self.acc
    }

    /// Number of recorded measurements.
    pub fn len(&self) -> usize {
        self.err.len()
    }

    pub fn is_empty(&self) -> bool {
        self.err.is_empty()
    }

    /// Most recent normalized loss, if anything was recorded.
    pub fn last_err(&self) -> Option<f64> {
        self.err.last().copied()
    }

    /// Most recent normalized accuracy, if anything was recorded.
    pub fn last_acc(&self) -> Option<f64> {
        self.acc.last().copied()
    }
}

/// Debug-friendly rendering of both histories. For logs and the
/// end-of-run summary only; nothing parses this format.
impl fmt::Display for ExecutionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Err: {:?}\t Acc: {:?}", self.err, self.acc)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
// Reference: Rust Book §11 (Writing Automated Tests)
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_normalizes_by_data_length() {
        let mut stats = ExecutionStats::new();

        stats.append(10.0, 8.0, 5);
        stats.append(6.0, 9.0, 3);

        assert_eq!(stats.err(), &[2.0, 2.0]);
        assert_eq!(stats.acc(), &[1.6, 3.0]);
    }

    #[test]
    #[should_panic]
    fn test_append_with_zero_data_length_panics() {
        let mut stats = ExecutionStats::new();
        stats.append(1.0, 1.0, 0);
    }

    #[test]
    fn test_histories_stay_aligned() {
        let mut stats = ExecutionStats::new();
        assert!(stats.is_empty());

        stats.append(4.0, 2.0, 2);
        stats.append(3.0, 3.0, 4);
        stats.append(1.0, 4.0, 8);

        assert_eq!(stats.len(), 3);
        assert_eq!(stats.err().len(), stats.acc().len());
        assert_eq!(stats.last_err(), Some(0.125));
        assert_eq!(stats.last_acc(), Some(0.5));
    }

    #[test]
    fn test_display_labels_both_histories() {
        let mut stats = ExecutionStats::new();
        stats.append(10.0, 8.0, 5);
        stats.append(6.0, 9.0, 3);

        assert_eq!(format!("{stats}"), "Err: [2.0, 2.0]\t Acc: [1.6, 3.0]");
    }
}
