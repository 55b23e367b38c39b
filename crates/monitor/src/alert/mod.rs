mod cycle;
mod dispatcher;
mod evaluator;
mod event;
mod rule;

pub use cycle::AlertCycle;
pub use dispatcher::{AlertDispatcher, Delivery, DispatchOutcome};
pub use evaluator::ThresholdEvaluator;
pub use event::{Alert, AlertStatus, ALERTS_MEASUREMENT};
pub use rule::{default_rules, Comparator, Severity, ThresholdRule, DEFAULT_MEASUREMENT};
