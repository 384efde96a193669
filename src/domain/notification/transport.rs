//! Email transport boundary.
//!
//! The shipped transport is simulated: it waits a fixed delay and succeeds
//! with a configurable probability.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;
use uuid::Uuid;

use crate::config::MailerConfig;

/// A rendered email addressed to one recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Provider acknowledgement of an accepted message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub message_id: String,
}

#[derive(Debug, Clone, Error)]
pub enum SendError {
    #[error("{0}")]
    Rejected(String),
}

/// Delivery integration.
///
/// `send` resolves with either a receipt or a failure; it does not panic and
/// the dispatcher never retries.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Transport identifier ("simulated", ...)
    fn name(&self) -> &'static str;

    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, SendError>;
}

/// Transport that only pretends to deliver
pub struct SimulatedTransport {
    delay: Duration,
    success_rate: f64,
}

impl SimulatedTransport {
    /// `success_rate` is clamped to 0.0..=1.0; a non-finite rate means 1.0
    pub fn new(delay: Duration, success_rate: f64) -> Self {
        let success_rate = if success_rate.is_finite() {
            success_rate.clamp(0.0, 1.0)
        } else {
            tracing::warn!(success_rate, "Non-finite success rate, using 1.0");
            1.0
        };
        Self {
            delay,
            success_rate,
        }
    }
}

impl From<&MailerConfig> for SimulatedTransport {
    fn from(config: &MailerConfig) -> Self {
        Self::new(
            Duration::from_millis(config.send_delay_ms),
            config.success_rate,
        )
    }
}

#[async_trait]
impl EmailTransport for SimulatedTransport {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, SendError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let delivered = rand::rng().random_bool(self.success_rate);
        if !delivered {
            tracing::debug!(to = %message.to, "Simulated send failed");
            return Err(SendError::Rejected("SMTP connection failed".to_string()));
        }

        let message_id = format!("msg-{}", Uuid::new_v4());
        tracing::debug!(to = %message.to, message_id = %message_id, "Simulated send succeeded");
        Ok(SendReceipt { message_id })
    }
}

/// Create the transport named in configuration.
///
/// Only `"simulated"` is available; other names fall back to it.
pub fn create_transport(config: &MailerConfig) -> Arc<dyn EmailTransport> {
    if config.transport != "simulated" {
        tracing::warn!(
            transport = %config.transport,
            "Unknown email transport, falling back to simulated"
        );
    }

    tracing::info!(
        transport = "simulated",
        send_delay_ms = config.send_delay_ms,
        success_rate = config.success_rate,
        "Creating email transport"
    );
    Arc::new(SimulatedTransport::from(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            to: "demo@example.com".to_string(),
            subject: "Hello".to_string(),
            html: "<p>Hello</p>".to_string(),
            text: "Hello".to_string(),
        }
    }

    #[tokio::test]
    async fn test_always_succeeds_at_full_rate() {
        let transport = SimulatedTransport::new(Duration::ZERO, 1.0);
        let receipt = transport.send(&message()).await.unwrap();
        assert!(receipt.message_id.starts_with("msg-"));
    }

    #[tokio::test]
    async fn test_always_fails_at_zero_rate() {
        let transport = SimulatedTransport::new(Duration::ZERO, 0.0);
        let err = transport.send(&message()).await.unwrap_err();
        assert_eq!(err.to_string(), "SMTP connection failed");
    }

    #[tokio::test]
    async fn test_waits_configured_delay() {
        let transport = SimulatedTransport::new(Duration::from_millis(20), 1.0);
        let start = std::time::Instant::now();
        transport.send(&message()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_rate_is_clamped() {
        let transport = SimulatedTransport::new(Duration::ZERO, 7.0);
        assert_eq!(transport.success_rate, 1.0);
    }

    #[test]
    fn test_factory() {
        let transport = create_transport(&MailerConfig::default());
        assert_eq!(transport.name(), "simulated");
    }

    #[tokio::test]
    async fn test_non_finite_rate_always_succeeds() {
        let config = MailerConfig {
            send_delay_ms: 0,
            success_rate: f64::NAN,
            ..MailerConfig::default()
        };
        let transport = SimulatedTransport::from(&config);
        assert_eq!(transport.success_rate, 1.0);
        assert!(transport.send(&message()).await.is_ok());

        let transport = SimulatedTransport::new(Duration::ZERO, f64::INFINITY);
        assert_eq!(transport.success_rate, 1.0);
    }
}
