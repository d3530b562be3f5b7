//! Progress and outcome reporting for remote calls.

use log::debug;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Success,
    Error,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusKind::Loading => "loading",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// One message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
    /// How long the message stays up; `None` keeps it until replaced.
    pub auto_hide: Option<Duration>,
}

impl Status {
    pub fn loading(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Loading,
            text: text.into(),
            auto_hide: None,
        }
    }

    pub fn success(text: impl Into<String>, auto_hide: Duration) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
            auto_hide: Some(auto_hide),
        }
    }

    pub fn error(text: impl Into<String>, auto_hide: Duration) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
            auto_hide: Some(auto_hide),
        }
    }

    /// Drops the auto-hide timer so the message stays until replaced.
    pub fn sticky(mut self) -> Self {
        self.auto_hide = None;
        self
    }
}

/// Where remote calls report progress ("submitting...", "retrying...") and outcomes.
#[cfg_attr(test, mockall::automock)]
pub trait StatusSink: Send + Sync {
    fn show(&self, status: Status);
}

/// Writes status messages to the terminal.
///
/// Success goes to stdout, loading and error text to stderr. A terminal
/// cannot retract text, so auto-hide durations are only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn show(&self, status: Status) {
        if let Some(after) = status.auto_hide {
            debug!("{} message would hide after {}ms", status.kind, after.as_millis());
        }
        match status.kind {
            StatusKind::Success => println!("{}", status.text),
            StatusKind::Loading | StatusKind::Error => eprintln!("{}", status.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_constructors() {
        let s = Status::loading("Submitting...");
        assert_eq!(s.kind, StatusKind::Loading);
        assert_eq!(s.auto_hide, None);

        let s = Status::success("Saved", Duration::from_secs(5));
        assert_eq!(s.kind, StatusKind::Success);
        assert_eq!(s.auto_hide, Some(Duration::from_secs(5)));

        let s = Status::error("Failed", Duration::from_secs(7)).sticky();
        assert_eq!(s.kind, StatusKind::Error);
        assert_eq!(s.auto_hide, None);
    }

    #[test]
    fn test_status_kind_display() {
        assert_eq!(StatusKind::Loading.to_string(), "loading");
        assert_eq!(StatusKind::Success.to_string(), "success");
        assert_eq!(StatusKind::Error.to_string(), "error");
    }

    #[test]
    fn test_console_sink_does_not_panic() {
        ConsoleSink.show(Status::loading("working"));
        ConsoleSink.show(Status::success("done", Duration::from_secs(1)));
        ConsoleSink.show(Status::error("oops", Duration::from_secs(1)));
    }
}
