// src/log_sink.rs
//
// Session log: one line per send/receive, appended to a user-chosen text file.
//
// Each write is an independent open-append-close cycle; no handle is kept
// between lines. Overwrite mode truncates the file once, when the path is set,
// not on every write.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::LogError;
use crate::settings::LogConfig;

#[derive(Debug, Default)]
pub struct LogSink {
    config: LogConfig,
}

impl LogSink {
    pub fn new(config: LogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    pub fn set_surface_errors(&mut self, surface: bool) {
        self.config.surface_errors = surface;
    }

    /// Point the log at a new file.
    ///
    /// A non-empty path switches logging on; an empty one switches it off. In
    /// overwrite mode an existing file is truncated here, once.
    pub fn set_path(&mut self, path: Option<PathBuf>) -> Result<(), LogError> {
        let path = path.filter(|p| !p.as_os_str().is_empty());
        self.config.enabled = path.is_some();
        self.config.path = path;

        match self.config.path.clone() {
            Some(p) if !self.config.append_mode => self.fail_soft(truncate(&p)),
            _ => Ok(()),
        }
    }

    /// Switch between append and overwrite. Turning append off with a path
    /// already set truncates that file once.
    pub fn set_append_mode(&mut self, append: bool) -> Result<(), LogError> {
        let was_append = self.config.append_mode;
        self.config.append_mode = append;
        match self.config.active_path().cloned() {
            Some(p) if was_append && !append => self.fail_soft(truncate(&p)),
            _ => Ok(()),
        }
    }

    /// Append a line if logging is active.
    ///
    /// Failures are dropped (and noted on stderr) unless `surface_errors` is set.
    pub fn write_line(&self, line: &str) -> Result<(), LogError> {
        self.fail_soft(self.try_write_line(line))
    }

    /// Append a line, returning any I/O failure regardless of policy.
    pub fn try_write_line(&self, line: &str) -> Result<(), LogError> {
        if !self.config.is_active() {
            return Ok(());
        }
        let Some(path) = self.config.active_path() else {
            return Ok(());
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LogError::Open {
                path: path.clone(),
                source,
            })?;

        writeln!(file, "{}", format_log_line(&chrono::Local::now(), line)).map_err(|source| {
            LogError::Write {
                path: path.clone(),
                source,
            }
        })
    }

    fn fail_soft(&self, result: Result<(), LogError>) -> Result<(), LogError> {
        match result {
            Err(e) if !self.config.surface_errors => {
                tlog!("[log_sink] {}", e);
                Ok(())
            }
            other => other,
        }
    }
}

/// `[yyyy-MM-dd HH:mm:ss] line`
pub fn format_log_line(at: &chrono::DateTime<chrono::Local>, line: &str) -> String {
    format!("[{}] {}", at.format("%Y-%m-%d %H:%M:%S"), line)
}

fn truncate(path: &Path) -> Result<(), LogError> {
    if !path.exists() {
        return Ok(());
    }
    OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map(|_| ())
        .map_err(|source| LogError::Open {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;

    fn sink_at(path: &Path, append: bool) -> LogSink {
        let mut sink = LogSink::new(LogConfig {
            append_mode: append,
            ..LogConfig::default()
        });
        sink.set_path(Some(path.to_path_buf())).unwrap();
        sink
    }

    #[test]
    fn test_format_log_line() {
        let at = chrono::Local
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .single()
            .expect("unambiguous local time");
        assert_eq!(format_log_line(&at, "Received: OK"), "[2024-01-02 03:04:05] Received: OK");
    }

    #[test]
    fn test_inert_without_path() {
        let sink = LogSink::new(LogConfig {
            enabled: true,
            ..LogConfig::default()
        });
        assert!(sink.try_write_line("nothing").is_ok());
    }

    #[test]
    fn test_disabled_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.txt");
        let mut sink = sink_at(&path, true);
        sink.set_enabled(false);
        sink.write_line("Sent: hi").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_setting_path_enables_logging() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = LogSink::default();
        sink.set_path(Some(dir.path().join("a.txt"))).unwrap();
        assert!(sink.config().enabled);
        sink.set_path(None).unwrap();
        assert!(!sink.config().enabled);
        sink.set_path(Some(PathBuf::new())).unwrap();
        assert!(!sink.config().enabled);
    }

    #[test]
    fn test_append_mode_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.txt");
        fs::write(&path, "earlier\n").unwrap();

        let sink = sink_at(&path, true);
        sink.write_line("Sent: AT").unwrap();
        sink.write_line("Received: OK").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "earlier");
        assert!(lines[1].starts_with('[') && lines[1].ends_with("] Sent: AT"));
        assert!(lines[2].ends_with("] Received: OK"));
    }

    #[test]
    fn test_overwrite_mode_truncates_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.txt");
        fs::write(&path, "old run\n").unwrap();

        let sink = sink_at(&path, false);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        sink.write_line("first").unwrap();
        sink.write_line("second").unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("] first"));
        assert!(content.contains("] second"));
    }

    #[test]
    fn test_switching_to_overwrite_truncates_current_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.txt");
        let mut sink = sink_at(&path, true);
        sink.write_line("kept?").unwrap();
        sink.set_append_mode(false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        sink.set_append_mode(false).unwrap();
        sink.write_line("after").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_write_failure_policy() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let mut sink = LogSink::new(LogConfig {
            enabled: true,
            path: Some(dir.path().to_path_buf()),
            append_mode: true,
            surface_errors: false,
        });
        assert!(sink.write_line("dropped").is_ok());
        assert!(matches!(sink.try_write_line("x"), Err(LogError::Open { .. })));

        sink.set_surface_errors(true);
        assert!(matches!(sink.write_line("reported"), Err(LogError::Open { .. })));
    }
}
