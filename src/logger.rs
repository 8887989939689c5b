//! In-worker logger for the `log` facade.
//!
//! A Web Worker's WASM module has no console binding of its own, so records
//! are kept in a bounded buffer that the JS bridge drains through the
//! `drain_logs` export and prints with `console.log`. Native builds also
//! mirror warn+ lines to stderr.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::cell::RefCell;
use std::collections::VecDeque;

const MAX_LOG_LINES: usize = 5000;

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub msg: String,
}

thread_local! {
    static LOGS: RefCell<VecDeque<LogEntry>> = RefCell::new(VecDeque::new());
}

struct BufferLogger;

static LOGGER: BufferLogger = BufferLogger;

impl Log for BufferLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(record.level(), Level::Warn | Level::Error) {
            eprintln!("[{:>5}] {}: {}", record.level(), record.target(), record.args());
        }

        push_entry(LogEntry {
            level: record.level(),
            target: record.target().to_string(),
            msg: format!("{}", record.args()),
        });
    }

    fn flush(&self) {}
}

fn push_entry(entry: LogEntry) {
    // try_with: records emitted while the thread is shutting down are dropped
    let _ = LOGS.try_with(|buf| {
        let mut buf = buf.borrow_mut();
        buf.push_back(entry);
        if buf.len() > MAX_LOG_LINES {
            buf.pop_front();
        }
    });
}

/// Parse a level name. Unknown names give `None`.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::Trace),
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        "off" => Some(LevelFilter::Off),
        _ => None,
    }
}

/// Install the buffer logger. Safe to call more than once; later calls only
/// change the level. Unknown level names fall back to `info`.
pub fn init(level: &str) {
    let _ = log::set_logger(&LOGGER);
    let filter = parse_level(level).unwrap_or(LevelFilter::Info);
    log::set_max_level(filter);
    log::info!("Logger initialized at level {}", filter);
}

fn format_line(e: &LogEntry) -> String {
    format!("[{:>5}] {}: {}", e.level, e.target, e.msg)
}

/// Remove and return all buffered lines, oldest first, newline-separated.
pub fn drain() -> String {
    LOGS.with(|buf| {
        buf.borrow_mut()
            .drain(..)
            .map(|e| format_line(&e))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_names() {
        assert_eq!(parse_level("DEBUG"), Some(LevelFilter::Debug));
        assert_eq!(parse_level(" warning "), Some(LevelFilter::Warn));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn buffer_is_bounded() {
        drain();
        for i in 0..(MAX_LOG_LINES + 10) {
            push_entry(LogEntry {
                level: Level::Info,
                target: "test".to_string(),
                msg: format!("line {}", i),
            });
        }
        let out = drain();
        assert_eq!(out.lines().count(), MAX_LOG_LINES);
        assert!(out.starts_with("[ INFO] test: line 10"));
        assert_eq!(drain(), "");
    }

    #[test]
    fn init_records_to_buffer() {
        init("debug");
        drain();
        log::warn!("deck looks odd");
        let out = drain();
        assert!(out.contains("deck looks odd"));
        assert!(out.contains("WARN"));
    }
}
