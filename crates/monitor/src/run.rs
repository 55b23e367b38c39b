use hostpulse_common::{InfluxConfig, InfluxStore, MemoryStore, TimeSeriesStore, TimeoutStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::alert::{AlertCycle, AlertDispatcher, ThresholdEvaluator};
use crate::api::{self, AppState};
use crate::collector::Collector;
use crate::config::{CollectConfig, MonitorConfig, NotifyConfig, StoreConfig, StoreKind};
use crate::notifier::{Notifier, RetryNotifier, SmtpNotifier, SmtpSettings};
use crate::scheduler::{Cadence, ScheduledTask};
use crate::source::{DockerEndpoint, DockerProbe, HostProbe, SystemSource};
use crate::telemetry::PipelineMetrics;

const MEMORY_RETENTION_HOURS: i64 = 25;

pub async fn run(config: MonitorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = PipelineMetrics::new();
    let store = open_store(&config.store);
    let source = build_source(&config.collect)?;
    let notifier = build_notifier(&config.notify)?;

    tracing::info!(
        store = store.name(),
        collect_interval_s = config.collect.interval_seconds,
        alert_interval_s = config.alerts.interval_seconds,
        rules = config.alerts.rules.len(),
        notifications = notifier.is_some(),
        "monitor configured"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let collector = ScheduledTask {
        cadence: Cadence::new(
            Duration::from_secs(config.collect.interval_seconds),
            config.collect.backoff_multiplier,
        ),
        cycle: Arc::new(Collector::new(
            source,
            store.clone(),
            Duration::from_secs(config.collect.sample_timeout_seconds),
            metrics.clone(),
        )),
    }
    .spawn(shutdown_rx.clone());

    let evaluator = ThresholdEvaluator::new(
        store.clone(),
        config.alerts.rules.clone(),
        window(config.alerts.window_seconds)?,
        metrics.clone(),
    );
    let mut dispatcher = AlertDispatcher::new(store.clone(), metrics.clone())
        .with_suppression(window(config.alerts.suppress_window_seconds)?);
    if let Some((notifier, recipient)) = notifier {
        dispatcher = dispatcher.with_notifier(notifier, recipient);
    }
    let alerts = ScheduledTask {
        cadence: Cadence::fixed(Duration::from_secs(config.alerts.interval_seconds)),
        cycle: Arc::new(AlertCycle::new(evaluator, dispatcher)),
    }
    .spawn(shutdown_rx.clone());

    let listener = TcpListener::bind(&config.api.listen).await?;
    tracing::info!(addr = %config.api.listen, "HTTP API listening");
    let server = tokio::spawn(api::serve(
        listener,
        AppState {
            store,
            metrics,
        },
        crate::shutdown::signalled(shutdown_rx),
    ));

    tracing::info!("monitor running");
    crate::shutdown::wait_for_shutdown().await;

    tracing::info!("shutting down");
    let _ = shutdown_tx.send(true);
    collector.join().await;
    alerts.join().await;
    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "HTTP API error"),
        Err(e) => tracing::error!(error = %e, "HTTP API task panicked"),
    }
    tracing::info!("monitor stopped");
    Ok(())
}

fn window(seconds: u64) -> Result<chrono::Duration, Box<dyn std::error::Error>> {
    i64::try_from(seconds)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .ok_or_else(|| format!("window of {seconds}s is out of range").into())
}

pub fn open_store(config: &StoreConfig) -> Arc<dyn TimeSeriesStore> {
    let inner: Arc<dyn TimeSeriesStore> = match config.kind {
        StoreKind::Memory => Arc::new(
            MemoryStore::new().with_retention(chrono::Duration::hours(MEMORY_RETENTION_HOURS)),
        ),
        StoreKind::Influxdb => {
            if config.token.is_empty() {
                tracing::warn!(url = %config.url, "no store token configured");
            }
            Arc::new(InfluxStore::new(InfluxConfig {
                url: config.url.clone(),
                token: config.token.clone(),
                org: config.org.clone(),
                bucket: config.bucket.clone(),
            }))
        }
    };
    Arc::new(TimeoutStore::new(
        inner,
        Duration::from_secs(config.timeout_seconds),
    ))
}

pub fn build_source(
    config: &CollectConfig,
) -> Result<Arc<SystemSource>, Box<dyn std::error::Error>> {
    let docker = if config.workloads {
        Some(DockerProbe::new(DockerEndpoint::parse(&config.docker_endpoint)?))
    } else {
        tracing::info!("workload collection disabled");
        None
    };
    Ok(Arc::new(SystemSource::new(HostProbe::new(), docker)))
}

pub fn build_notifier(
    config: &NotifyConfig,
) -> Result<Option<(Arc<dyn Notifier>, String)>, Box<dyn std::error::Error>> {
    let Some(smtp) = &config.smtp else {
        tracing::info!("no notification channel configured, alerts are persisted only");
        return Ok(None);
    };
    let channel = SmtpNotifier::new(&SmtpSettings {
        host: smtp.host.clone(),
        port: smtp.port,
        username: smtp.username.clone(),
        password: smtp.password.clone(),
        from: smtp.from.clone(),
    })?;
    let notifier: Arc<dyn Notifier> = Arc::new(RetryNotifier::new(
        channel,
        config.max_retries,
        config.retry_base_delay_ms,
    ));
    Ok(Some((notifier, smtp.to.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmtpConfig;

    #[test]
    fn window_conversion_never_panics() {
        assert_eq!(window(300).unwrap(), chrono::Duration::minutes(5));
        assert!(window(u64::MAX).is_err());
        assert!(window(10_000_000_000_000_000).is_err());
    }

    #[test]
    fn memory_store_is_wrapped() {
        let store = open_store(&StoreConfig {
            kind: StoreKind::Memory,
            ..StoreConfig::default()
        });
        assert_eq!(store.name(), "memory");
    }

    #[test]
    fn bad_docker_endpoint_fails_startup() {
        let config = CollectConfig {
            docker_endpoint: "npipe:////./pipe/docker".into(),
            ..CollectConfig::default()
        };
        assert!(build_source(&config).is_err());

        let config = CollectConfig {
            workloads: false,
            ..config
        };
        assert!(build_source(&config).is_ok());
    }

    #[tokio::test]
    async fn notifier_only_with_smtp() {
        assert!(build_notifier(&NotifyConfig::default()).unwrap().is_none());

        let config = NotifyConfig {
            smtp: Some(SmtpConfig {
                host: "smtp.example.com".into(),
                port: 587,
                username: "monitor".into(),
                password: "secret".into(),
                from: "alerts@example.com".into(),
                to: "ops@example.com".into(),
            }),
            ..NotifyConfig::default()
        };
        let (notifier, to) = build_notifier(&config).unwrap().unwrap();
        assert_eq!(notifier.name(), "smtp");
        assert_eq!(to, "ops@example.com");
    }
}
