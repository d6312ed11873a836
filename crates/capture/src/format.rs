//! Log line formatting.

use chrono::{DateTime, Local};

/// Tag identifying the source of a log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Log,
    Info,
    Warn,
    Error,
    Debug,
    WindowError,
    Unhandled,
    Nav,
    Fetch,
    FetchFail,
    Xhr,
    Meta,
    Test,
}

impl Level {
    /// Upper-cased tag as it appears in rendered lines.
    pub fn tag(&self) -> &'static str {
        match self {
            Level::Log => "LOG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Debug => "DEBUG",
            Level::WindowError => "WINDOW.ERROR",
            Level::Unhandled => "UNHANDLED",
            Level::Nav => "NAV",
            Level::Fetch => "FETCH",
            Level::FetchFail => "FETCH_FAIL",
            Level::Xhr => "XHR",
            Level::Meta => "META",
            Level::Test => "TEST",
        }
    }

    /// Reverse of [`tag`](Self::tag), for reloading persisted lines.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "LOG" => Level::Log,
            "INFO" => Level::Info,
            "WARN" => Level::Warn,
            "ERROR" => Level::Error,
            "DEBUG" => Level::Debug,
            "WINDOW.ERROR" => Level::WindowError,
            "UNHANDLED" => Level::Unhandled,
            "NAV" => Level::Nav,
            "FETCH" => Level::Fetch,
            "FETCH_FAIL" => Level::FetchFail,
            "XHR" => Level::Xhr,
            "META" => Level::Meta,
            "TEST" => Level::Test,
            _ => return None,
        })
    }
}

/// Closed classification of loggable values.
///
/// Arbitrary-shape arguments are classified once at the call boundary; each
/// variant has a defined rendering with a fallback, so formatting is total.
#[derive(Clone, Debug)]
pub enum LogValue {
    /// Plain text, passed through unchanged.
    Text(String),
    /// Error-like value. Rendering prefers the stack, then the message.
    ErrorLike {
        message: String,
        stack: Option<String>,
    },
    /// Structured value, serialized JSON-style.
    Structured(serde_json::Value),
    /// Unformattable value, carrying its debug/display rendering.
    Opaque(String),
}

impl LogValue {
    /// Classify a std error, folding its source chain into the stack.
    pub fn error(err: &(dyn std::error::Error + 'static)) -> Self {
        let message = err.to_string();
        let mut frames = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            frames.push(cause.to_string());
            source = cause.source();
        }
        let stack = if frames.is_empty() {
            None
        } else {
            Some(format!("{}\n  caused by: {}", message, frames.join("\n  caused by: ")))
        };
        LogValue::ErrorLike { message, stack }
    }
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        LogValue::Text(value.to_string())
    }
}

impl From<String> for LogValue {
    fn from(value: String) -> Self {
        LogValue::Text(value)
    }
}

impl From<serde_json::Value> for LogValue {
    fn from(value: serde_json::Value) -> Self {
        LogValue::Structured(value)
    }
}

/// Render a single value. Total: never panics, never errors.
pub fn format_value(value: &LogValue) -> String {
    match value {
        LogValue::Text(s) => s.clone(),
        LogValue::ErrorLike { message, stack } => match stack {
            Some(stack) => stack.clone(),
            None if !message.is_empty() => message.clone(),
            None => "Error".to_string(),
        },
        LogValue::Structured(v) => {
            serde_json::to_string(v).unwrap_or_else(|_| v.to_string())
        }
        LogValue::Opaque(s) => s.clone(),
    }
}

/// Space-join the rendered representation of each argument.
pub fn format_args(args: &[LogValue]) -> String {
    args.iter()
        .map(format_value)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Bracketed millisecond wall-clock timestamp.
pub fn format_timestamp(at: DateTime<Local>) -> String {
    format!("[{}]", at.format("%H:%M:%S%.3f"))
}

/// A full rendered line: timestamp, upper-cased tag, message.
pub fn format_line(at: DateTime<Local>, level: Level, message: &str) -> String {
    format!("{} {} {}", format_timestamp(at), level.tag(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_passthrough() {
        assert_eq!(format_value(&LogValue::Text("hello".into())), "hello");
    }

    #[test]
    fn test_error_prefers_stack() {
        let value = LogValue::ErrorLike {
            message: "boom".into(),
            stack: Some("boom\n  caused by: io".into()),
        };
        assert_eq!(format_value(&value), "boom\n  caused by: io");
    }

    #[test]
    fn test_error_falls_back_to_message() {
        let value = LogValue::ErrorLike {
            message: "boom".into(),
            stack: None,
        };
        assert_eq!(format_value(&value), "boom");

        let empty = LogValue::ErrorLike {
            message: String::new(),
            stack: None,
        };
        assert_eq!(format_value(&empty), "Error");
    }

    #[test]
    fn test_structured_serialization() {
        let value = LogValue::Structured(json!({"a": 1, "b": [true, null]}));
        let rendered = format_value(&value);
        assert!(rendered.contains("\"a\":1"));
    }

    #[test]
    fn test_opaque_fallback() {
        assert_eq!(format_value(&LogValue::Opaque("undefined".into())), "undefined");
    }

    #[test]
    fn test_std_error_classification() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let value = LogValue::error(&err);
        assert_eq!(format_value(&value), "disk gone");
    }

    #[test]
    fn test_format_args_space_joined() {
        let rendered = format_args(&["x".into(), LogValue::Structured(json!(1))]);
        assert_eq!(rendered, "x 1");
    }

    #[test]
    fn test_line_shape() {
        let at = Local::now();
        let line = format_line(at, Level::Warn, "x 1");
        assert!(line.starts_with('['));
        assert!(line.contains("] WARN x 1"));
    }

    #[test]
    fn test_tag_round_trip() {
        for level in [
            Level::Log,
            Level::WindowError,
            Level::Unhandled,
            Level::FetchFail,
            Level::Meta,
        ] {
            assert_eq!(Level::from_tag(level.tag()), Some(level));
        }
        assert_eq!(Level::from_tag("NOISE"), None);
    }
}
