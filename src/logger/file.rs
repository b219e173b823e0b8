//! File persistence for log output
//!
//! Appends uncolored log lines to `logs/smswatch.log`. File logging is
//! best-effort: failures fall back to console-only operation.

use once_cell::sync::Lazy;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "logs/smswatch.log";

static LOG_HANDLE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

/// Open the log file, creating the logs directory if needed
pub fn init_file_logging() {
    if let Err(e) = fs::create_dir_all(LOG_DIR) {
        eprintln!("Logger: failed to create {}: {}", LOG_DIR, e);
        return;
    }

    match OpenOptions::new().create(true).append(true).open(LOG_FILE) {
        Ok(file) => {
            if let Ok(mut guard) = LOG_HANDLE.lock() {
                *guard = Some(file);
            }
        }
        Err(e) => eprintln!("Logger: failed to open {}: {}", LOG_FILE, e),
    }
}

/// Append a single line to the log file
pub fn write_to_file(line: &str) {
    if let Ok(mut guard) = LOG_HANDLE.lock() {
        if let Some(file) = guard.as_mut() {
            let _ = writeln!(file, "{}", line);
        }
    }
}

/// Flush pending writes to disk
pub fn flush_file_logging() {
    if let Ok(mut guard) = LOG_HANDLE.lock() {
        if let Some(file) = guard.as_mut() {
            let _ = file.flush();
        }
    }
}
