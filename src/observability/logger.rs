//! Structured JSON logger for rightsledger
//!
//! - One log line = one event
//! - `event` first, `severity` second, remaining fields sorted by key
//! - Synchronous, no buffering
//! - Written to stderr; stdout is reserved for contract responses

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace = 0,
    Info = 1,
    /// Tolerated anomalies (skipped rows, stale index entries)
    Warn = 2,
    Error = 3,
}

impl Severity {
    const ALL: [Severity; 4] = [Severity::Trace, Severity::Info, Severity::Warn, Severity::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    /// Parse a configured level name (case-insensitive)
    pub fn parse(level: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(level))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Info as u8);

/// One JSON object, rendered field by field
struct LogLine {
    buf: String,
}

impl LogLine {
    fn start(severity: Severity, event: &str) -> Self {
        let mut line = Self {
            buf: String::with_capacity(192),
        };
        line.buf.push('{');
        line.push("event", event);
        line.push("severity", severity.as_str());
        line
    }

    fn push(&mut self, key: &str, value: &str) {
        if self.buf.len() > 1 {
            self.buf.push(',');
        }
        push_quoted(&mut self.buf, key);
        self.buf.push(':');
        push_quoted(&mut self.buf, value);
    }

    fn finish(mut self) -> String {
        self.buf.push_str("}\n");
        self.buf
    }
}

/// serde_json escapes quotes, backslashes and every control character,
/// including the U+0000 separators inside composite keys.
fn push_quoted(buf: &mut String, s: &str) {
    match serde_json::to_string(s) {
        Ok(quoted) => buf.push_str(&quoted),
        Err(_) => buf.push_str("\"\""),
    }
}

/// Process-wide structured logger
pub struct Logger;

impl Logger {
    /// Lines below `severity` are dropped
    pub fn set_min_severity(severity: Severity) {
        MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
    }

    pub fn enabled(severity: Severity) -> bool {
        severity as u8 >= MIN_SEVERITY.load(Ordering::Relaxed)
    }

    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !Self::enabled(severity) {
            return;
        }
        let line = Self::render(severity, event, fields);

        // Single write so concurrent lines never interleave
        let mut stderr = io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }

    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut sorted = fields.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let mut line = LogLine::start(severity, event);
        for (key, value) in sorted {
            line.push(key, value);
        }
        line.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("warn"), Some(Severity::Warn));
        assert_eq!(Severity::parse("TRACE"), Some(Severity::Trace));
        assert_eq!(Severity::parse("fatal"), None);
    }

    #[test]
    fn test_render_json_format() {
        let output = Logger::render(Severity::Info, "COPYRIGHT_REGISTERED", &[]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "COPYRIGHT_REGISTERED");
        assert_eq!(parsed["severity"], "INFO");
        assert!(output.starts_with("{\"event\":"));
    }

    #[test]
    fn test_render_sorts_fields() {
        let a = Logger::render(
            Severity::Info,
            "TEST",
            &[("key", "copyright001"), ("author", "A"), ("index", "author~id")],
        );
        let b = Logger::render(
            Severity::Info,
            "TEST",
            &[("index", "author~id"), ("key", "copyright001"), ("author", "A")],
        );
        assert_eq!(a, b);

        let author = a.find("\"author\"").unwrap();
        let index = a.find("\"index\"").unwrap();
        let key = a.find("\"key\"").unwrap();
        assert!(author < index && index < key);
    }

    #[test]
    fn test_render_escapes_control_chars() {
        let output = Logger::render(Severity::Trace, "TEST", &[("key", "\u{0}author~id\u{0}A\u{0}")]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["key"], "\u{0}author~id\u{0}A\u{0}");
        assert_eq!(output.matches('\n').count(), 1);
    }
}
