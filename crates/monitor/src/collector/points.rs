use chrono::{DateTime, Utc};
use hostpulse_common::Point;

use crate::source::{HostSample, WorkloadSample};

pub const SYSTEM_MEASUREMENT: &str = "system_metrics";
pub const CONTAINER_MEASUREMENT: &str = "container_metrics";

pub fn host_point(sample: &HostSample, container_count: Option<usize>, ts: DateTime<Utc>) -> Point {
    let point = Point::new(SYSTEM_MEASUREMENT, ts)
        .field("cpu_usage", sample.cpu_usage)
        .field("memory_usage", sample.memory_usage)
        .field("memory_total", sample.memory_total)
        .field("memory_used", sample.memory_used);
    match container_count {
        Some(count) => point.field("container_count", count as u64),
        None => point,
    }
}

pub fn workload_point(sample: &WorkloadSample, ts: DateTime<Utc>) -> Point {
    Point::new(CONTAINER_MEASUREMENT, ts)
        .tag("container_id", sample.id.as_str())
        .tag("container_name", sample.name.as_str())
        .field("cpu_usage", sample.cpu_usage)
        .field("memory_usage", sample.memory_usage)
        .field("memory_limit", sample.memory_limit)
        .field("status", i64::from(sample.is_running()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostpulse_common::FieldValue;

    fn host() -> HostSample {
        HostSample {
            cpu_usage: 42.5,
            memory_usage: 50.0,
            memory_total: 8_589_934_592,
            memory_used: 4_294_967_296,
        }
    }

    #[test]
    fn host_fields_keep_their_types() {
        let p = host_point(&host(), Some(3), Utc::now());
        assert_eq!(p.measurement, "system_metrics");
        assert!(p.tags.is_empty());
        assert_eq!(p.fields.get("cpu_usage"), Some(&FieldValue::Float(42.5)));
        assert_eq!(p.fields.get("memory_total"), Some(&FieldValue::Integer(8_589_934_592)));
        assert_eq!(p.fields.get("container_count"), Some(&FieldValue::Integer(3)));
    }

    #[test]
    fn unknown_container_count_is_omitted() {
        let p = host_point(&host(), None, Utc::now());
        assert!(!p.fields.contains_key("container_count"));
        assert_eq!(p.fields.len(), 4);
    }

    #[test]
    fn workload_point_tags_and_status() {
        let mut sample = WorkloadSample {
            id: "3f2a9c".into(),
            name: "web".into(),
            status: "running".into(),
            cpu_usage: 987_654_321,
            memory_usage: 10_485_760,
            memory_limit: 2_147_483_648,
        };
        let p = workload_point(&sample, Utc::now());
        assert_eq!(p.measurement, "container_metrics");
        assert_eq!(p.tags.get("container_id").map(String::as_str), Some("3f2a9c"));
        assert_eq!(p.tags.get("container_name").map(String::as_str), Some("web"));
        assert_eq!(p.fields.get("status"), Some(&FieldValue::Integer(1)));

        sample.status = "paused".into();
        let p = workload_point(&sample, Utc::now());
        assert_eq!(p.fields.get("status"), Some(&FieldValue::Integer(0)));
    }
}
