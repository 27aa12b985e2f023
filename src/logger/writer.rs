//! Log writer module
//!
//! Thread-safe log output to files or stdout/stderr, filtered by level.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};

use super::Level;

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl LogTarget {
    fn open(path: Option<&str>, fallback: Self) -> io::Result<Self> {
        match path {
            Some(p) => Ok(Self::File(Mutex::new(open_log_file(p)?))),
            None => Ok(fallback),
        }
    }

    fn write_line(&self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(file) => {
                let mut f = file.lock().unwrap_or_else(PoisonError::into_inner);
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

/// Thread-safe log writer
pub struct LogWriter {
    min_level: Level,
    /// Info and access lines
    access: LogTarget,
    /// Warning and error lines
    error: LogTarget,
}

impl LogWriter {
    fn new(
        min_level: Level,
        access_log_file: Option<&str>,
        error_log_file: Option<&str>,
    ) -> io::Result<Self> {
        Ok(Self {
            min_level,
            access: LogTarget::open(access_log_file, LogTarget::Stdout)?,
            error: LogTarget::open(error_log_file, LogTarget::Stderr)?,
        })
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    /// Write a leveled message; warnings and errors go to the error target
    pub fn write(&self, level: Level, message: &str) {
        if !self.enabled(level) {
            return;
        }
        match level {
            Level::Debug | Level::Info => self.access.write_line(message),
            Level::Warn | Level::Error => self.error.write_line(message),
        }
    }

    /// Write to access log; access lines are not level filtered
    pub fn write_access(&self, message: &str) {
        self.access.write_line(message);
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the global log writer
///
/// Returns error if log files cannot be opened or the writer was already set.
pub fn init(
    min_level: Level,
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
) -> io::Result<()> {
    let writer = LogWriter::new(min_level, access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if initialized
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        let writer = LogWriter::new(Level::Warn, None, None).unwrap();
        assert!(!writer.enabled(Level::Debug));
        assert!(!writer.enabled(Level::Info));
        assert!(writer.enabled(Level::Warn));
        assert!(writer.enabled(Level::Error));
    }

    #[test]
    fn test_file_target_appends() {
        let dir = std::env::temp_dir().join(format!("hello-function-logs-{}", std::process::id()));
        let path = dir.join("access.log");
        let path_str = path.to_str().unwrap();
        let _ = std::fs::remove_dir_all(&dir);

        let writer = LogWriter::new(Level::Info, Some(path_str), None).unwrap();
        writer.write(Level::Info, "first");
        writer.write(Level::Debug, "filtered");
        writer.write_access("second");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
