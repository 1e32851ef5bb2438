//! Filesystem environment of a run.

use std::path::{Path, PathBuf};

/// Where a run reads its inputs and writes its outputs.
#[derive(Debug, Clone)]
pub struct RunEnvironment {
    input_dir: PathBuf,
    output_dir: PathBuf,
    clear_output_dir: bool,
    user: Option<String>,
}

impl RunEnvironment {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        RunEnvironment {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            clear_output_dir: false,
            user: std::env::var("USER").ok(),
        }
    }

    /// Ask the engine to wipe the output directory before the run.
    pub fn with_clear_output_dir(mut self, clear: bool) -> Self {
        self.clear_output_dir = clear;
        self
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn clear_output_dir(&self) -> bool {
        self.clear_output_dir
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn input_full_path(&self, file_name: &str) -> PathBuf {
        self.input_dir.join(file_name)
    }

    pub fn output_full_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}
