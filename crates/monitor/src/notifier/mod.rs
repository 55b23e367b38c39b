mod channel;
mod retry;
mod smtp;

pub use channel::{Notifier, NotifyError};
pub use retry::RetryNotifier;
pub use smtp::{SmtpNotifier, SmtpSettings};
