use std::collections::HashSet;
use std::path::Path;

use super::schema::{default_smtp_port, MonitorConfig, SmtpConfig, StoreKind};

pub const STORE_URL_ENV: &str = "HOSTPULSE_STORE_URL";
pub const STORE_TOKEN_ENV: &str = "HOSTPULSE_STORE_TOKEN";
pub const STORE_ORG_ENV: &str = "HOSTPULSE_STORE_ORG";
pub const STORE_BUCKET_ENV: &str = "HOSTPULSE_STORE_BUCKET";
pub const SMTP_HOST_ENV: &str = "HOSTPULSE_SMTP_HOST";
pub const SMTP_PORT_ENV: &str = "HOSTPULSE_SMTP_PORT";
pub const SMTP_USER_ENV: &str = "HOSTPULSE_SMTP_USER";
pub const SMTP_PASSWORD_ENV: &str = "HOSTPULSE_SMTP_PASSWORD";
pub const ALERT_FROM_ENV: &str = "HOSTPULSE_ALERT_FROM";
pub const ALERT_TO_ENV: &str = "HOSTPULSE_ALERT_TO";

const DEFAULT_ALERT_FROM: &str = "hostpulse@localhost";

pub const MAX_WINDOW_SECONDS: u64 = 10 * 366 * 24 * 60 * 60;

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Validation(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for LoadError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}

pub fn load_from_file(path: &Path) -> Result<MonitorConfig, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str(yaml: &str) -> Result<MonitorConfig, LoadError> {
    let mut cfg: MonitorConfig = if yaml.trim().is_empty() {
        MonitorConfig::default()
    } else {
        serde_yaml::from_str(yaml)?
    };
    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    validate(&cfg)?;
    Ok(cfg)
}

pub fn apply_env_overrides(
    cfg: &mut MonitorConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), LoadError> {
    for (key, slot) in [
        (STORE_URL_ENV, &mut cfg.store.url),
        (STORE_TOKEN_ENV, &mut cfg.store.token),
        (STORE_ORG_ENV, &mut cfg.store.org),
        (STORE_BUCKET_ENV, &mut cfg.store.bucket),
    ] {
        if let Some(value) = lookup(key) {
            *slot = value;
        }
    }

    let port = match lookup(SMTP_PORT_ENV) {
        Some(raw) => Some(raw.trim().parse::<u16>().map_err(|e| {
            LoadError::Validation(format!("{SMTP_PORT_ENV}={raw:?}: {e}"))
        })?),
        None => None,
    };

    if cfg.notify.smtp.is_none() {
        if let (Some(host), Some(to)) = (lookup(SMTP_HOST_ENV), lookup(ALERT_TO_ENV)) {
            cfg.notify.smtp = Some(SmtpConfig {
                host,
                port: default_smtp_port(),
                username: String::new(),
                password: String::new(),
                from: DEFAULT_ALERT_FROM.to_string(),
                to,
            });
        }
    }

    if let Some(smtp) = cfg.notify.smtp.as_mut() {
        for (key, slot) in [
            (SMTP_HOST_ENV, &mut smtp.host),
            (SMTP_USER_ENV, &mut smtp.username),
            (SMTP_PASSWORD_ENV, &mut smtp.password),
            (ALERT_FROM_ENV, &mut smtp.from),
            (ALERT_TO_ENV, &mut smtp.to),
        ] {
            if let Some(value) = lookup(key) {
                *slot = value;
            }
        }
        if let Some(port) = port {
            smtp.port = port;
        }
    }
    Ok(())
}

pub fn validate(cfg: &MonitorConfig) -> Result<(), LoadError> {
    if cfg.store.kind == StoreKind::Influxdb && cfg.store.url.trim().is_empty() {
        return Err(LoadError::Validation("store.url must not be empty".into()));
    }
    for (key, value) in [
        ("store.timeout_seconds", cfg.store.timeout_seconds),
        ("collect.interval_seconds", cfg.collect.interval_seconds),
        ("collect.sample_timeout_seconds", cfg.collect.sample_timeout_seconds),
        ("alerts.interval_seconds", cfg.alerts.interval_seconds),
        ("alerts.window_seconds", cfg.alerts.window_seconds),
    ] {
        if value == 0 {
            return Err(LoadError::Validation(format!("{key} must be > 0")));
        }
    }
    for (key, value) in [
        ("alerts.window_seconds", cfg.alerts.window_seconds),
        ("alerts.suppress_window_seconds", cfg.alerts.suppress_window_seconds),
    ] {
        if value > MAX_WINDOW_SECONDS {
            return Err(LoadError::Validation(format!(
                "{key} must be <= {MAX_WINDOW_SECONDS}"
            )));
        }
    }
    if cfg.collect.backoff_multiplier < 1 {
        return Err(LoadError::Validation(
            "collect.backoff_multiplier must be >= 1".into(),
        ));
    }

    let mut names = HashSet::new();
    for rule in &cfg.alerts.rules {
        if rule.name.trim().is_empty() || rule.field.trim().is_empty() || rule.measurement.trim().is_empty() {
            return Err(LoadError::Validation(format!(
                "alert rule {:?} needs a name, measurement and field",
                rule.name
            )));
        }
        if !rule.limit.is_finite() {
            return Err(LoadError::Validation(format!(
                "alert rule {:?} has a non-finite limit",
                rule.name
            )));
        }
        if !names.insert(rule.name.as_str()) {
            return Err(LoadError::Validation(format!(
                "duplicate alert rule name {:?}",
                rule.name
            )));
        }
    }

    if let Some(smtp) = &cfg.notify.smtp {
        if smtp.host.trim().is_empty() || smtp.to.trim().is_empty() {
            return Err(LoadError::Validation(
                "notify.smtp needs a host and a recipient".into(),
            ));
        }
    }
    Ok(())
}
