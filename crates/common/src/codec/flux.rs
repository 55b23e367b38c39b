use chrono::{DateTime, SecondsFormat, Utc};
use csv::{ReaderBuilder, StringRecord};
use std::fmt::Write;

use crate::point::{Aggregation, FieldValue, Fields, RangeQuery, Row, Tags};

pub fn build_query(bucket: &str, query: &RangeQuery) -> String {
    let mut flux = format!(
        "from(bucket: \"{}\")\n  |> range(start: {}, stop: {})\n  |> filter(fn: (r) => r._measurement == \"{}\")",
        escape(bucket),
        time_literal(query.range.start),
        time_literal(query.range.stop),
        escape(&query.measurement),
    );
    if let Some(field) = &query.field {
        let _ = write!(
            flux,
            "\n  |> filter(fn: (r) => r._field == \"{}\")",
            escape(field)
        );
    }
    if let Some(Aggregation::Mean) = query.aggregation {
        flux.push_str("\n  |> group(columns: [\"_measurement\", \"_field\"])\n  |> mean()");
    }
    flux
}

fn time_literal(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

struct Record {
    timestamp: DateTime<Utc>,
    tags: Tags,
    field: String,
    value: FieldValue,
}

// Aggregates carry no `_time`; their records take `default_time`.
pub fn parse_csv(body: &str, default_time: DateTime<Utc>) -> Result<Vec<Row>, String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut records = Vec::new();
    let mut datatypes: Option<StringRecord> = None;
    let mut header: Option<StringRecord> = None;

    for cells in reader.records() {
        let cells = cells.map_err(|e| format!("malformed csv: {e}"))?;
        if let Some(annotation) = cells.get(0).filter(|c| c.starts_with('#')) {
            if annotation == "#datatype" {
                datatypes = Some(cells);
            }
            header = None;
            continue;
        }

        let Some(columns) = &header else {
            header = Some(cells);
            continue;
        };

        if let Some(idx) = columns.iter().position(|c| c == "error") {
            let message = cells.get(idx).unwrap_or_default();
            if !message.is_empty() {
                return Err(message.to_string());
            }
            continue;
        }

        if let Some(record) = to_record(columns, datatypes.as_ref(), &cells, default_time)? {
            records.push(record);
        }
    }

    Ok(pivot(records))
}

fn to_record(
    columns: &StringRecord,
    datatypes: Option<&StringRecord>,
    cells: &StringRecord,
    default_time: DateTime<Utc>,
) -> Result<Option<Record>, String> {
    let mut timestamp = default_time;
    let mut tags = Tags::new();
    let mut field = None;
    let mut value = None;

    for (idx, column) in columns.iter().enumerate() {
        let cell = cells.get(idx).unwrap_or("");
        match column {
            "" | "result" | "table" | "_start" | "_stop" | "_measurement" => {}
            "_time" => {
                timestamp = DateTime::parse_from_rfc3339(cell)
                    .map_err(|e| format!("bad _time {cell:?}: {e}"))?
                    .with_timezone(&Utc);
            }
            "_field" => field = Some(cell.to_string()),
            "_value" => {
                if !cell.is_empty() {
                    let kind = datatypes.and_then(|d| d.get(idx)).unwrap_or("");
                    value = Some(parse_value(kind, cell)?);
                }
            }
            tag if !tag.starts_with('_') => {
                if !cell.is_empty() {
                    tags.insert(tag.to_string(), cell.to_string());
                }
            }
            _ => {}
        }
    }

    Ok(match (field, value) {
        (Some(field), Some(value)) => Some(Record {
            timestamp,
            tags,
            field,
            value,
        }),
        _ => None,
    })
}

fn parse_value(kind: &str, cell: &str) -> Result<FieldValue, String> {
    let bad = |e: &dyn std::fmt::Display| format!("bad {kind} value {cell:?}: {e}");
    match kind {
        "long" => cell.parse().map(FieldValue::Integer).map_err(|e| bad(&e)),
        "unsignedLong" => cell
            .parse::<u64>()
            .map(FieldValue::from)
            .map_err(|e| bad(&e)),
        "double" => cell.parse().map(FieldValue::Float).map_err(|e| bad(&e)),
        "boolean" => cell.parse().map(FieldValue::Boolean).map_err(|e| bad(&e)),
        "string" => Ok(FieldValue::String(cell.to_string())),
        _ => Ok(cell
            .parse::<f64>()
            .map(FieldValue::Float)
            .unwrap_or_else(|_| FieldValue::String(cell.to_string()))),
    }
}

fn pivot(records: Vec<Record>) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();
    for record in records {
        match rows
            .iter_mut()
            .find(|r| r.timestamp == record.timestamp && r.tags == record.tags)
        {
            Some(row) => {
                row.fields.insert(record.field, record.value);
            }
            None => {
                let mut fields = Fields::new();
                fields.insert(record.field, record.value);
                rows.push(Row {
                    timestamp: record.timestamp,
                    tags: record.tags,
                    fields,
                });
            }
        }
    }
    rows.sort_by_key(|r| r.timestamp);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::TimeRange;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn builds_mean_query() {
        let q = RangeQuery::new(
            "system_metrics",
            TimeRange::trailing(chrono::Duration::minutes(5), now()),
        )
        .field("cpu_usage")
        .mean();
        let flux = build_query("metrics", &q);
        assert!(flux.starts_with("from(bucket: \"metrics\")"));
        assert!(flux.contains("range(start: 2024-05-01T11:55:00.000000000Z, stop: 2024-05-01T12:00:00.000000000Z)"));
        assert!(flux.contains("r._measurement == \"system_metrics\""));
        assert!(flux.contains("r._field == \"cpu_usage\""));
        assert!(flux.ends_with("|> mean()"));
    }

    #[test]
    fn raw_query_has_no_aggregate() {
        let q = RangeQuery::new("alerts", TimeRange::trailing(chrono::Duration::hours(24), now()));
        let flux = build_query("metrics", &q);
        assert!(!flux.contains("_field"));
        assert!(!flux.contains("mean"));
    }

    #[test]
    fn pivots_fields_sharing_time_and_tags() {
        let body = "\
#datatype,string,long,dateTime:RFC3339,dateTime:RFC3339,dateTime:RFC3339,double,string,string\r
,result,table,_start,_stop,_time,_value,_field,_measurement\r
,_result,0,2024-05-01T11:00:00Z,2024-05-01T12:00:00Z,2024-05-01T11:10:00Z,42.5,cpu_usage,system_metrics\r
,_result,0,2024-05-01T11:00:00Z,2024-05-01T12:00:00Z,2024-05-01T11:20:00Z,43.5,cpu_usage,system_metrics\r
\r
#datatype,string,long,dateTime:RFC3339,dateTime:RFC3339,dateTime:RFC3339,long,string,string\r
,result,table,_start,_stop,_time,_value,_field,_measurement\r
,_result,1,2024-05-01T11:00:00Z,2024-05-01T12:00:00Z,2024-05-01T11:10:00Z,3,container_count,system_metrics\r
\r
";
        let rows = parse_csv(body, now()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value("cpu_usage"), Some(&FieldValue::Float(42.5)));
        assert_eq!(rows[0].value("container_count"), Some(&FieldValue::Integer(3)));
        assert_eq!(rows[1].value("container_count"), None);
        assert!(rows[0].timestamp < rows[1].timestamp);
    }

    #[test]
    fn tags_and_quoted_strings() {
        let body = "\
#datatype,string,long,dateTime:RFC3339,dateTime:RFC3339,dateTime:RFC3339,string,string,string,string,string
,result,table,_start,_stop,_time,_value,_field,_measurement,rule,severity
,_result,0,2024-05-01T11:00:00Z,2024-05-01T12:00:00Z,2024-05-01T11:30:00Z,\"High CPU usage detected: 95.00, \"\"hot\"\"\",message,alerts,High CPU usage,critical
,_result,0,2024-05-01T11:00:00Z,2024-05-01T12:00:00Z,2024-05-01T11:30:00Z,active,status,alerts,High CPU usage,critical
";
        let rows = parse_csv(body, now()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tags.get("severity").map(String::as_str), Some("critical"));
        assert_eq!(
            rows[0].value("message").and_then(FieldValue::as_str),
            Some("High CPU usage detected: 95.00, \"hot\"")
        );
        assert_eq!(rows[0].value("status").and_then(FieldValue::as_str), Some("active"));
    }

    #[test]
    fn aggregate_without_time_uses_default() {
        let body = "\
#datatype,string,long,string,string,double
,result,table,_field,_measurement,_value
,_result,0,cpu_usage,system_metrics,91.25
";
        let rows = parse_csv(body, now()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].timestamp, now());
        assert_eq!(rows[0].value("cpu_usage"), Some(&FieldValue::Float(91.25)));
    }

    #[test]
    fn empty_body_is_no_rows() {
        assert!(parse_csv("\r\n", now()).unwrap().is_empty());
        assert!(parse_csv("", now()).unwrap().is_empty());
    }

    #[test]
    fn error_table_is_reported() {
        let body = "#datatype,string,string\n,error,reference\n,bucket not found,\n";
        let err = parse_csv(body, now()).unwrap_err();
        assert!(err.contains("bucket not found"));
    }

    #[test]
    fn quoted_newline_stays_in_one_value() {
        let body = "\
#datatype,string,long,dateTime:RFC3339,dateTime:RFC3339,dateTime:RFC3339,string,string,string,string
,result,table,_start,_stop,_time,_value,_field,_measurement,rule
,_result,0,2024-05-01T11:00:00Z,2024-05-01T12:00:00Z,2024-05-01T11:30:00Z,\"Disk\nfull detected\",message,alerts,Disk
";
        let rows = parse_csv(body, now()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].value("message").and_then(FieldValue::as_str),
            Some("Disk\nfull detected")
        );
    }

    #[test]
    fn consecutive_tables_use_their_own_header() {
        let body = "\
#datatype,string,long,string,string,double
,result,table,_field,_measurement,_value
,_result,0,cpu_usage,system_metrics,91.25

#datatype,string,long,string,string,double
,result,table,_field,_measurement,_value
,_result,1,memory_usage,system_metrics,40.5
";
        let rows = parse_csv(body, now()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value("memory_usage"), Some(&FieldValue::Float(40.5)));
    }
}
