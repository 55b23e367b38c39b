use chrono::{DateTime, Utc};
use hostpulse_common::Point;

use super::rule::Severity;

pub const ALERTS_MEASUREMENT: &str = "alerts";

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub rule: String,
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub status: AlertStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStatus {
    Active,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
        }
    }
}

impl Alert {
    pub fn subject(&self) -> String {
        format!(
            "[{}] Monitoring Alert",
            self.severity.as_str().to_uppercase()
        )
    }

    pub fn body(&self) -> String {
        format!(
            "Alert Details:\nSeverity: {}\nMessage: {}\nTime: {}\n",
            self.severity,
            self.message,
            self.timestamp.to_rfc3339()
        )
    }

    // the rule tag keeps same-cycle alerts apart
    pub fn to_point(&self) -> Point {
        Point::new(ALERTS_MEASUREMENT, self.timestamp)
            .tag("severity", self.severity.as_str())
            .tag("rule", self.rule.as_str())
            .field("message", self.message.as_str())
            .field("status", self.status.as_str())
    }
}
