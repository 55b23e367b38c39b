use serde::Deserialize;

use crate::alert::{default_rules, ThresholdRule};

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct MonitorConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub collect: CollectConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Influxdb,
    Memory,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StoreConfig {
    #[serde(default)]
    pub kind: StoreKind,
    #[serde(default = "default_store_url")]
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_org")]
    pub org: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_store_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CollectConfig {
    #[serde(default = "default_collect_interval")]
    pub interval_seconds: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: u32,
    #[serde(default = "default_sample_timeout")]
    pub sample_timeout_seconds: u64,
    #[serde(default = "yes")]
    pub workloads: bool,
    #[serde(default = "default_docker_endpoint")]
    pub docker_endpoint: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AlertsConfig {
    #[serde(default = "default_alert_interval")]
    pub interval_seconds: u64,
    #[serde(default = "default_window")]
    pub window_seconds: u64,
    #[serde(default)]
    pub suppress_window_seconds: u64,
    #[serde(default = "default_rules")]
    pub rules: Vec<ThresholdRule>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NotifyConfig {
    pub smtp: Option<SmtpConfig>,
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::default(),
            url: default_store_url(),
            token: String::new(),
            org: default_org(),
            bucket: default_bucket(),
            timeout_seconds: default_store_timeout(),
        }
    }
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_collect_interval(),
            backoff_multiplier: default_backoff_multiplier(),
            sample_timeout_seconds: default_sample_timeout(),
            workloads: true,
            docker_endpoint: default_docker_endpoint(),
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_alert_interval(),
            window_seconds: default_window(),
            suppress_window_seconds: 0,
            rules: default_rules(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            smtp: None,
            max_retries: 0,
            retry_base_delay_ms: default_retry_base_delay(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_store_url() -> String {
    "http://localhost:8086".to_string()
}

fn default_org() -> String {
    "monitoring".to_string()
}

fn default_bucket() -> String {
    "metrics".to_string()
}

fn default_store_timeout() -> u64 {
    5
}

fn default_collect_interval() -> u64 {
    10
}

fn default_backoff_multiplier() -> u32 {
    3
}

fn default_sample_timeout() -> u64 {
    5
}

fn default_docker_endpoint() -> String {
    "unix:///var/run/docker.sock".to_string()
}

fn default_alert_interval() -> u64 {
    60
}

fn default_window() -> u64 {
    300
}

fn default_retry_base_delay() -> u64 {
    500
}

pub(super) fn default_smtp_port() -> u16 {
    587
}

fn default_listen() -> String {
    "0.0.0.0:8000".to_string()
}

fn yes() -> bool {
    true
}
