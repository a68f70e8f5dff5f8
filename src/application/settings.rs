// ============================================================
// Layer 2 — Settings
// ============================================================
// Process-level configuration: where raw data lives and where
// trained models land. Values come from the environment with
// working-directory fallbacks, and the CLI can override either
// path per invocation.
//
//   DATA_PATH    — root holding the raw/ subdirectory (default "data")
//   MODELS_PATH  — checkpoint + metrics directory     (default "models")
//
// Reference: Rust Book §12 (Environment Variables)

use std::env;
use std::path::PathBuf;

const DATA_PATH_VAR:   &str = "DATA_PATH";
const MODELS_PATH_VAR: &str = "MODELS_PATH";

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_path:   PathBuf,
    pub models_path: PathBuf,
}

impl Settings {
    /// Read both paths from the environment, falling back to
    /// the defaults when a variable is unset.
    pub fn load() -> Self {
        Self {
            data_path:   PathBuf::from(env_or(DATA_PATH_VAR, "data")),
            models_path: PathBuf::from(env_or(MODELS_PATH_VAR, "models")),
        }
    }

    /// Apply CLI overrides on top of the environment values.
    pub fn with_overrides(
        mut self,
        data_dir:   Option<String>,
        models_dir: Option<String>,
    ) -> Self {
        if let Some(dir) = data_dir {
            self.data_path = PathBuf::from(dir);
        }
        if let Some(dir) = models_dir {
            self.models_path = PathBuf::from(dir);
        }
        self
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
