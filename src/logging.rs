//! Diagnostic logging setup
//!
//! One-shot commands log to stderr. While the navigator owns the terminal,
//! stderr would draw over the alternate screen, so diagnostics go to a
//! trace file in the app home instead. `RUST_LOG` overrides the quiet
//! default in both cases.

use std::fs::{self, OpenOptions};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Trace file written while the navigator runs
pub const TRACE_FILE: &str = "scriptdeck-trace.log";

/// Keeps the background file writer alive; flushes when dropped
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Pick the diagnostic sink for this process
pub fn writer(home: &Path, interactive: bool) -> (BoxMakeWriter, LoggingGuard) {
    if !interactive {
        return (
            BoxMakeWriter::new(std::io::stderr),
            LoggingGuard { _file_guard: None },
        );
    }

    let file = fs::create_dir_all(home).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(home.join(TRACE_FILE))
    });
    match file {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            (
                BoxMakeWriter::new(non_blocking),
                LoggingGuard {
                    _file_guard: Some(guard),
                },
            )
        }
        // Nowhere safe to write; stay silent rather than corrupt the screen
        Err(_) => (
            BoxMakeWriter::new(std::io::sink),
            LoggingGuard { _file_guard: None },
        ),
    }
}

/// Install the global subscriber. Hold the guard until exit.
pub fn init(home: &Path, interactive: bool) -> LoggingGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let (writer, guard) = writer(home, interactive);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(!interactive)
        .with_target(false)
        .init();
    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_interactive_logs_go_to_trace_file() {
        let dir = TempDir::new().unwrap();
        let (writer, guard) = writer(dir.path(), true);
        let subscriber = tracing_subscriber::fmt()
            .with_writer(writer)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("state document unreadable");
        });
        drop(guard);

        let trace = fs::read_to_string(dir.path().join(TRACE_FILE)).unwrap();
        assert!(trace.contains("state document unreadable"));
    }

    #[test]
    fn test_one_shot_commands_create_no_trace_file() {
        let dir = TempDir::new().unwrap();
        let (_writer, _guard) = writer(dir.path(), false);
        assert!(!dir.path().join(TRACE_FILE).exists());
    }
}
