use async_trait::async_trait;
use reqwest::Client;

use super::error::StoreError;
use super::traits::TimeSeriesStore;
use crate::codec::{flux, line_protocol};
use crate::point::{Point, RangeQuery, Row};

#[derive(Debug, Clone, PartialEq)]
pub struct InfluxConfig {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
}

pub struct InfluxStore {
    config: InfluxConfig,
    client: Client,
}

impl InfluxStore {
    pub fn new(config: InfluxConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.url.trim_end_matches('/'), path)
    }

    fn auth(&self) -> String {
        format!("Token {}", self.config.token)
    }
}

#[async_trait]
impl TimeSeriesStore for InfluxStore {
    fn name(&self) -> &str {
        "influxdb"
    }

    async fn write(&self, points: &[Point]) -> Result<(), StoreError> {
        let body =
            line_protocol::encode(points).map_err(|e| StoreError::Write(e.to_string()))?;
        if body.is_empty() {
            return Ok(());
        }

        self.client
            .post(self.endpoint("/api/v2/write"))
            .query(&[
                ("org", self.config.org.as_str()),
                ("bucket", self.config.bucket.as_str()),
                ("precision", "ns"),
            ])
            .header("Authorization", self.auth())
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::Write(e.to_string()))?;

        Ok(())
    }

    async fn query(&self, query: &RangeQuery) -> Result<Vec<Row>, StoreError> {
        let payload = serde_json::json!({
            "query": flux::build_query(&self.config.bucket, query),
            "type": "flux",
            "dialect": {
                "header": true,
                "delimiter": ",",
                "annotations": ["datatype"],
            },
        });

        let body = self
            .client
            .post(self.endpoint("/api/v2/query"))
            .query(&[("org", self.config.org.as_str())])
            .header("Authorization", self.auth())
            .header("Accept", "application/csv")
            .json(&payload)
            .send()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::Query(e.to_string()))?
            .text()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let rows = flux::parse_csv(&body, query.range.stop).map_err(StoreError::Query)?;
        tracing::debug!(
            measurement = %query.measurement,
            rows = rows.len(),
            "influx query complete"
        );
        Ok(rows)
    }
}
