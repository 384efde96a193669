use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::config::Settings;
use crate::content::ContentUpdate;
use crate::metrics::DeliveryMetrics;
use crate::subscriber::{Subscriber, SubscriberStore};
use crate::telemetry::attributes;
use crate::template::{process_template, TemplateCatalog};

use super::links::LinkBuilder;
use super::log::NotificationLog;
use super::transport::{EmailMessage, EmailTransport};
use super::types::{DispatchError, DispatchOutcome, DispatchReport};

/// Counters for the dispatcher since startup
#[derive(Debug, Default)]
pub struct DispatcherStats {
    pub runs: AtomicU64,
    pub emails_sent: AtomicU64,
    pub emails_failed: AtomicU64,
}

impl DispatcherStats {
    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            runs: self.runs.load(Ordering::Relaxed),
            emails_sent: self.emails_sent.load(Ordering::Relaxed),
            emails_failed: self.emails_failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub runs: u64,
    pub emails_sent: u64,
    pub emails_failed: u64,
}

/// Sends one email per relevant subscriber for a content update
pub struct NotificationDispatcher {
    subscribers: Arc<SubscriberStore>,
    log: Arc<NotificationLog>,
    catalog: Arc<TemplateCatalog>,
    transport: Arc<dyn EmailTransport>,
    links: LinkBuilder,
    inter_send_delay: Duration,
    stats: DispatcherStats,
}

impl NotificationDispatcher {
    pub fn new(
        subscribers: Arc<SubscriberStore>,
        log: Arc<NotificationLog>,
        catalog: Arc<TemplateCatalog>,
        transport: Arc<dyn EmailTransport>,
        links: LinkBuilder,
    ) -> Self {
        Self {
            subscribers,
            log,
            catalog,
            transport,
            links,
            inter_send_delay: Duration::ZERO,
            stats: DispatcherStats::default(),
        }
    }

    /// Dispatcher wired with the link and pacing settings
    pub fn from_settings(
        settings: &Settings,
        subscribers: Arc<SubscriberStore>,
        log: Arc<NotificationLog>,
        catalog: Arc<TemplateCatalog>,
        transport: Arc<dyn EmailTransport>,
    ) -> Self {
        Self::new(
            subscribers,
            log,
            catalog,
            transport,
            LinkBuilder::from(&settings.site),
        )
        .with_inter_send_delay(Duration::from_millis(settings.mailer.inter_send_delay_ms))
    }

    /// Pause between two consecutive sends of one run
    pub fn with_inter_send_delay(mut self, delay: Duration) -> Self {
        self.inter_send_delay = delay;
        self
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// Run one dispatch for `update`.
    ///
    /// Sends are sequential. A failed send is recorded on its notification
    /// and the run continues; only store failures abort the run.
    #[tracing::instrument(
        name = "dispatcher.dispatch",
        skip(self, update),
        fields(update_id = %update.id, update_type = %update.kind, category = %update.category)
    )]
    pub async fn dispatch(&self, update: &ContentUpdate) -> Result<DispatchOutcome, DispatchError> {
        let template = self
            .catalog
            .find_for(update.kind)
            .ok_or(DispatchError::EmptyCatalog)?;

        let recipients = self
            .subscribers
            .relevant(update.kind, &update.category)
            .await?;

        self.stats.runs.fetch_add(1, Ordering::Relaxed);

        if recipients.is_empty() {
            DeliveryMetrics::record_run("no_recipients");
            tracing::info!("No relevant subscribers for update");
            return Ok(DispatchOutcome::NoRecipients {
                update_id: update.id.clone(),
            });
        }

        let base = self.base_variables(update);
        let mut report = DispatchReport {
            update_id: update.id.clone(),
            template_id: template.id.clone(),
            total: recipients.len(),
            sent: 0,
            failed: 0,
            notification_ids: Vec::with_capacity(recipients.len()),
        };

        for (index, subscriber) in recipients.iter().enumerate() {
            if index > 0 && !self.inter_send_delay.is_zero() {
                tokio::time::sleep(self.inter_send_delay).await;
            }

            let notification_id = self
                .log
                .queue(&update.id, &subscriber.id, &template.id)
                .await?;
            report.notification_ids.push(notification_id.clone());

            let variables = self.subscriber_variables(&base, subscriber);

            let render_start = Instant::now();
            let email = process_template(template, &variables);
            DeliveryMetrics::record_render(render_start.elapsed().as_secs_f64());

            let message = EmailMessage {
                to: subscriber.email.clone(),
                subject: email.subject,
                html: email.html_content,
                text: email.text_content,
            };

            let send_start = Instant::now();
            let result = self.transport.send(&message).await;
            let latency = send_start.elapsed().as_secs_f64();

            match result {
                Ok(receipt) => {
                    let now = Utc::now();
                    self.log
                        .mark_sent(&notification_id, Some(receipt.message_id), now)
                        .await?;
                    self.subscribers.record_delivery(&subscriber.id, now).await?;

                    report.sent += 1;
                    self.stats.emails_sent.fetch_add(1, Ordering::Relaxed);
                    DeliveryMetrics::record_sent(latency);
                }
                Err(e) => {
                    tracing::warn!(
                        notification_id = %notification_id,
                        subscriber_id = %subscriber.id,
                        error = %e,
                        "Email send failed"
                    );
                    self.log
                        .mark_failed(&notification_id, &e.to_string())
                        .await?;

                    report.failed += 1;
                    self.stats.emails_failed.fetch_add(1, Ordering::Relaxed);
                    DeliveryMetrics::record_failed(latency);
                }
            }
        }

        DeliveryMetrics::record_run("completed");

        let span = tracing::Span::current();
        for kv in [
            attributes::template_id(&report.template_id),
            attributes::recipient_count(report.total),
            attributes::sent_count(report.sent),
            attributes::failed_count(report.failed),
        ] {
            span.set_attribute(kv.key, kv.value);
        }

        tracing::info!(
            template_id = %report.template_id,
            total = report.total,
            sent = report.sent,
            failed = report.failed,
            "Dispatch run completed"
        );

        Ok(DispatchOutcome::Completed(report))
    }

    /// Variables shared by every recipient of one update.
    ///
    /// Extras from the update come first so its own fields win.
    fn base_variables(&self, update: &ContentUpdate) -> Map<String, Value> {
        let mut vars = update.variables.clone();

        vars.insert("title".into(), Value::String(update.title.clone()));
        vars.insert("summary".into(), Value::String(update.summary.clone()));
        vars.insert("category".into(), Value::String(update.category.clone()));
        if let Some(content) = &update.content {
            vars.insert("content".into(), Value::String(content.clone()));
        }
        if let Some(metrics) = &update.metrics {
            vars.insert(
                "metrics".into(),
                serde_json::to_value(metrics).unwrap_or(Value::Null),
            );
        }
        if let Some(achievements) = &update.achievements {
            vars.insert(
                "achievements".into(),
                Value::Array(achievements.iter().cloned().map(Value::String).collect()),
            );
        }
        vars.insert("readMoreUrl".into(), Value::String(self.links.read_more_url()));
        vars.insert("logoUrl".into(), Value::String(self.links.logo_url()));

        vars
    }

    fn subscriber_variables(&self, base: &Map<String, Value>, subscriber: &Subscriber) -> Map<String, Value> {
        let mut vars = base.clone();

        vars.insert(
            "unsubscribeUrl".into(),
            Value::String(self.links.unsubscribe_url(&subscriber.id)),
        );
        vars.insert(
            "preferencesUrl".into(),
            Value::String(self.links.preferences_url(&subscriber.id)),
        );
        vars.insert("subscriberEmail".into(), Value::String(subscriber.email.clone()));
        if let Some(name) = &subscriber.name {
            vars.insert("subscriberName".into(), Value::String(name.clone()));
        }

        vars
    }
}
