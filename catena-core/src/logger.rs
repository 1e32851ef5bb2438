//! In-run message log.
//!
//! Components and the engine push messages here during a run. Warnings set
//! a flag the engine consumes once per stage to grade the stage outcome,
//! and the whole log can be dumped to a `messages.log` file afterwards.

use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn label(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub sender: String,
    pub message: String,
}

/// Collects messages emitted during a run.
#[derive(Debug, Clone, Default)]
pub struct SimulationLogger {
    entries: Vec<LogEntry>,
    warning_count: u32,
    warning_flag: bool,
}

impl SimulationLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, sender: impl Into<String>, message: impl Into<String>) {
        self.entries.push(LogEntry {
            level: LogLevel::Info,
            sender: sender.into(),
            message: message.into(),
        });
    }

    pub fn warning(&mut self, sender: impl Into<String>, message: impl Into<String>) {
        let sender = sender.into();
        let message = message.into();
        tracing::warn!(sender = %sender, "{message}");
        self.warning_count += 1;
        self.warning_flag = true;
        self.entries.push(LogEntry {
            level: LogLevel::Warning,
            sender,
            message,
        });
    }

    pub fn error(&mut self, sender: impl Into<String>, message: impl Into<String>) {
        let sender = sender.into();
        let message = message.into();
        tracing::error!(sender = %sender, "{message}");
        self.entries.push(LogEntry {
            level: LogLevel::Error,
            sender,
            message,
        });
    }

    /// Returns the warning flag and clears it.
    pub fn take_warning_flag(&mut self) -> bool {
        std::mem::take(&mut self.warning_flag)
    }

    pub fn warning_flag(&self) -> bool {
        self.warning_flag
    }

    pub fn warning_count(&self) -> u32 {
        self.warning_count
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Write all entries to a file, one line per entry.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!(
                "[{}] {}: {}\n",
                entry.level.label(),
                entry.sender,
                entry.message
            ));
        }
        fs::write(path, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_flag_is_consumed() {
        let mut logger = SimulationLogger::new();
        assert!(!logger.take_warning_flag());

        logger.warning("sim.a", "low storage");
        logger.warning("sim.b", "negative flow clamped");
        assert!(logger.warning_flag());
        assert!(logger.take_warning_flag());
        assert!(!logger.warning_flag());
        assert_eq!(logger.warning_count(), 2);
    }

    #[test]
    fn writes_entries_in_order() {
        let mut logger = SimulationLogger::new();
        logger.info("engine", "run started");
        logger.warning("sim.a", "low storage");
        logger.error("sim.b", "diverged");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.log");
        logger.write_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            [
                "[info] engine: run started",
                "[warning] sim.a: low storage",
                "[error] sim.b: diverged"
            ]
        );
    }
}
