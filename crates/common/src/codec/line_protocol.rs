use influxdb::{Query, Timestamp, Type, WriteQuery};

use crate::point::{FieldValue, Point};

pub fn encode(points: &[Point]) -> Result<String, influxdb::Error> {
    let queries: Vec<WriteQuery> = points.iter().filter_map(write_query).collect();
    if queries.is_empty() {
        return Ok(String::new());
    }
    Ok(queries.build()?.get())
}

// Non-finite floats and empty tags are dropped.
pub fn write_query(point: &Point) -> Option<WriteQuery> {
    let fields: Vec<(&String, Type)> = point
        .fields
        .iter()
        .filter_map(|(k, v)| field_type(v).map(|t| (k, t)))
        .collect();
    if fields.is_empty() {
        return None;
    }

    let nanos = point
        .timestamp
        .timestamp_nanos_opt()
        .and_then(|n| u128::try_from(n).ok())
        .unwrap_or_default();
    let mut query = WriteQuery::new(Timestamp::Nanoseconds(nanos), point.measurement.as_str());
    for (k, v) in point.tags.iter().filter(|(_, v)| !v.is_empty()) {
        query = query.add_tag(k.as_str(), Type::Text(v.clone()));
    }
    for (k, t) in fields {
        query = query.add_field(k.as_str(), t);
    }
    Some(query)
}

fn field_type(value: &FieldValue) -> Option<Type> {
    match value {
        FieldValue::Float(v) if v.is_finite() => Some(Type::Float(*v)),
        FieldValue::Float(_) => None,
        FieldValue::Integer(v) => Some(Type::SignedInteger(*v)),
        FieldValue::Boolean(v) => Some(Type::Boolean(*v)),
        FieldValue::String(s) => Some(Type::Text(s.clone())),
    }
}
