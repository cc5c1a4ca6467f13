//! Logging for format decoding
//!
//! Decoders log through the `log` facade. This module provides the
//! file-backed [`Logger`] behind that facade, a console setup based on
//! `env_logger`, and the [`ErrorSink`] capability through which a
//! [`FormatError`](crate::errors::FormatError) is explicitly reported.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::errors::ErrorKind;

/// Destination for reported format errors
pub trait ErrorSink {
    fn report(&self, kind: ErrorKind, message: &str);
}

/// Sink that forwards reports to the `log` facade at warn level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&self, kind: ErrorKind, message: &str) {
        warn!("[{:?}] {}", kind, message);
    }
}

/// File-backed logger
pub struct Logger {
    file: Mutex<File>,
}

impl Logger {
    /// Creates the log file, truncating any previous content
    pub fn new(log_file: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(log_file)?;
        Ok(Logger { file: Mutex::new(file) })
    }

    /// Appends one line to the log file
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        writeln!(file, "{}", message)?;
        file.flush()
    }

    /// Installs a file logger as the global `log` backend
    pub fn init_global_logger(log_file: impl AsRef<Path>) -> io::Result<()> {
        let global_logger = Logger::new(log_file)?;

        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(LevelFilter::Debug);
        Ok(())
    }

    /// Installs an `env_logger` console backend, filtered by `RUST_LOG`
    /// (default `info`)
    pub fn init_console() -> Result<(), SetLoggerError> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init()
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = Logger::log(self, &message);
        }
    }

    fn flush(&self) {}
}

impl ErrorSink for Logger {
    fn report(&self, kind: ErrorKind, message: &str) {
        if let Err(e) = self.log(&format!("[{:?}] {}", kind, message)) {
            eprintln!("Failed to write error report: {}", e);
        }
    }
}
