//! Outbound email abstraction.
//!
//! Sending never blocks the operation that triggered it: callers log a
//! `false` result and carry on.

use tracing::info;

/// Transactional emails the auth flows dispatch.
pub trait EmailSender: Send + Sync {
    fn send_verification(
        &self,
        email: &str,
        name: &str,
        token: &str,
        link: &str,
    ) -> impl Future<Output = bool> + Send;

    fn send_reset(
        &self,
        email: &str,
        name: &str,
        token: &str,
        link: &str,
    ) -> impl Future<Output = bool> + Send;

    fn send_welcome(&self, email: &str, name: &str) -> impl Future<Output = bool> + Send;
}

/// Writes a log line instead of sending. Token plaintexts are not logged.
#[derive(Debug, Clone, Default)]
pub struct LogEmailSender;

impl EmailSender for LogEmailSender {
    async fn send_verification(&self, email: &str, name: &str, _token: &str, _link: &str) -> bool {
        info!(to = %email, name = %name, "Verification email queued");
        true
    }

    async fn send_reset(&self, email: &str, name: &str, _token: &str, _link: &str) -> bool {
        info!(to = %email, name = %name, "Password reset email queued");
        true
    }

    async fn send_welcome(&self, email: &str, name: &str) -> bool {
        info!(to = %email, name = %name, "Welcome email queued");
        true
    }
}
