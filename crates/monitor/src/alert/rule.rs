use serde::{Deserialize, Serialize};

pub const DEFAULT_MEASUREMENT: &str = "system_metrics";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThresholdRule {
    pub name: String,
    #[serde(default = "default_measurement")]
    pub measurement: String,
    pub field: String,
    pub comparator: Comparator,
    pub limit: f64,
    pub severity: Severity,
}

fn default_measurement() -> String {
    DEFAULT_MEASUREMENT.to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    #[serde(alias = ">")]
    GreaterThan,
    #[serde(alias = ">=")]
    GreaterOrEqual,
    #[serde(alias = "<")]
    LessThan,
    #[serde(alias = "<=")]
    LessOrEqual,
    #[serde(alias = "==")]
    Equal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Critical,
}

impl Comparator {
    pub fn evaluate(&self, value: f64, limit: f64) -> bool {
        match self {
            Self::GreaterThan => value > limit,
            Self::GreaterOrEqual => value >= limit,
            Self::LessThan => value < limit,
            Self::LessOrEqual => value <= limit,
            Self::Equal => (value - limit).abs() < f64::EPSILON,
        }
    }

    pub fn phrase(&self) -> &'static str {
        match self {
            Self::GreaterThan => "greater than",
            Self::GreaterOrEqual => "at least",
            Self::LessThan => "less than",
            Self::LessOrEqual => "at most",
            Self::Equal => "equal to",
        }
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ThresholdRule {
    pub fn new(
        name: impl Into<String>,
        field: impl Into<String>,
        comparator: Comparator,
        limit: f64,
        severity: Severity,
    ) -> Self {
        Self {
            name: name.into(),
            measurement: default_measurement(),
            field: field.into(),
            comparator,
            limit,
            severity,
        }
    }

    pub fn is_breached_by(&self, value: f64) -> bool {
        self.comparator.evaluate(value, self.limit)
    }

    pub fn describe(&self, value: f64) -> String {
        format!(
            "{} detected: {value:.2} ({} {})",
            self.name,
            self.comparator.phrase(),
            self.limit
        )
    }
}

pub fn default_rules() -> Vec<ThresholdRule> {
    vec![
        ThresholdRule::new(
            "High CPU usage",
            "cpu_usage",
            Comparator::GreaterThan,
            90.0,
            Severity::Critical,
        ),
        ThresholdRule::new(
            "High memory usage",
            "memory_usage",
            Comparator::GreaterThan,
            85.0,
            Severity::Warning,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparator_greater_than() {
        assert!(Comparator::GreaterThan.evaluate(95.0, 90.0));
        assert!(!Comparator::GreaterThan.evaluate(90.0, 90.0));
    }

    #[test]
    fn comparator_less_than() {
        assert!(Comparator::LessThan.evaluate(1.0, 5.0));
        assert!(!Comparator::LessThan.evaluate(10.0, 5.0));
    }

    #[test]
    fn comparator_boundaries() {
        assert!(Comparator::GreaterOrEqual.evaluate(5.0, 5.0));
        assert!(Comparator::LessOrEqual.evaluate(5.0, 5.0));
        assert!(Comparator::Equal.evaluate(5.0, 5.0));
        assert!(!Comparator::Equal.evaluate(5.1, 5.0));
    }

    #[test]
    fn severity_orders_warning_below_critical() {
        assert!(Severity::Warning < Severity::Critical);
        assert_eq!(Severity::Critical.to_string(), "critical");
    }

    #[test]
    fn describes_observed_value() {
        let rule = &default_rules()[0];
        assert_eq!(
            rule.describe(95.0),
            "High CPU usage detected: 95.00 (greater than 90)"
        );
    }

    #[test]
    fn deserializes_symbols_and_names() {
        let rule: ThresholdRule = serde_yaml::from_str(
            "name: Low disk\nfield: disk_free\ncomparator: \"<\"\nlimit: 10\nseverity: warning\n",
        )
        .unwrap();
        assert_eq!(rule.comparator, Comparator::LessThan);
        assert_eq!(rule.measurement, "system_metrics");

        let rule: ThresholdRule = serde_yaml::from_str(
            "name: Hot\nmeasurement: container_metrics\nfield: cpu_usage\ncomparator: greater_or_equal\nlimit: 1000000000\nseverity: critical\n",
        )
        .unwrap();
        assert_eq!(rule.comparator, Comparator::GreaterOrEqual);
        assert_eq!(rule.measurement, "container_metrics");
    }
}
