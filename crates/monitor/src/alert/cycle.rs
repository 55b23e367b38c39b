use async_trait::async_trait;
use chrono::Utc;

use super::dispatcher::AlertDispatcher;
use super::evaluator::ThresholdEvaluator;
use crate::scheduler::Cycle;

pub struct AlertCycle {
    evaluator: ThresholdEvaluator,
    dispatcher: AlertDispatcher,
}

impl AlertCycle {
    pub fn new(evaluator: ThresholdEvaluator, dispatcher: AlertDispatcher) -> Self {
        Self {
            evaluator,
            dispatcher,
        }
    }
}

#[async_trait]
impl Cycle for AlertCycle {
    fn name(&self) -> &str {
        "alerts"
    }

    async fn run_once(&self) -> bool {
        let alerts = self.evaluator.evaluate(Utc::now()).await;
        for alert in &alerts {
            tracing::info!(rule = %alert.rule, severity = %alert.severity, message = %alert.message, "threshold breached");
        }
        self.dispatcher.dispatch_all(&alerts).await;
        true
    }
}
