//! Transient user notifications
//!
//! Every toast auto-dismisses after the same fixed duration regardless of
//! severity.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

/// Default auto-dismiss delay for all toasts
pub const DEFAULT_TOAST_DURATION_MS: u64 = 5000;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

impl ToastKind {
    pub fn title(&self) -> &'static str {
        match self {
            ToastKind::Success => "Success",
            ToastKind::Error => "Error",
            ToastKind::Info => "Info",
            ToastKind::Warning => "Warning",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub shown_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            kind,
            message: message.into(),
            shown_at: Utc::now(),
            duration_ms,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.shown_at + Duration::milliseconds(self.duration_ms as i64)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.title(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expires_after_fixed_duration() {
        let toast = Toast::new(ToastKind::Error, "Failed to submit application", 5000);
        assert!(!toast.is_expired_at(toast.shown_at));
        assert!(!toast.is_expired_at(toast.shown_at + Duration::milliseconds(4999)));
        assert!(toast.is_expired_at(toast.shown_at + Duration::milliseconds(5000)));
    }

    #[test]
    fn test_toast_display() {
        let toast = Toast::new(ToastKind::Warning, "Please select a package", 5000);
        assert_eq!(toast.to_string(), "[Warning] Please select a package");
    }
}
