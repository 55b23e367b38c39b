mod loader;
mod schema;

pub use loader::{
    apply_env_overrides, load_from_file, load_from_str, validate, LoadError, ALERT_FROM_ENV,
    ALERT_TO_ENV, MAX_WINDOW_SECONDS, SMTP_HOST_ENV, SMTP_PASSWORD_ENV, SMTP_PORT_ENV,
    SMTP_USER_ENV, STORE_BUCKET_ENV, STORE_ORG_ENV, STORE_TOKEN_ENV, STORE_URL_ENV,
};
pub use schema::{
    AlertsConfig, ApiConfig, CollectConfig, MonitorConfig, NotifyConfig, SmtpConfig, StoreConfig,
    StoreKind,
};
