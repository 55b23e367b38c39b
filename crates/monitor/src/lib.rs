pub mod alert;
pub mod api;
pub mod cli;
pub mod collector;
pub mod config;
pub mod notifier;
pub mod run;
pub mod scheduler;
pub mod shutdown;
pub mod source;
pub mod telemetry;
