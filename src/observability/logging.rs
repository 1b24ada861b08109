//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config, overridable via `RUST_LOG`
//! - Copy every `ERROR` event into the recent error buffer
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - The error buffer is fed by a subscriber layer, so code that logs an
//!   error never needs a handle to the buffer
//! - The env filter applies to console output only; the error buffer sees
//!   `ERROR` events from every target

use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;
use crate::observability::error_log::{ErrorRecord, RecentErrors};

/// Install the global subscriber.
pub fn init_tracing(config: &ObservabilityConfig, errors: Arc<RecentErrors>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(&config.log_level));
    subscriber(filter, errors).init();
}

fn default_filter(level: &str) -> EnvFilter {
    let level = level.to_lowercase();
    EnvFilter::new(format!("layout_control={level},tower_http={level}"))
}

fn subscriber(
    console_filter: EnvFilter,
    errors: Arc<RecentErrors>,
) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(console_filter))
        .with(ErrorCaptureLayer::new(errors).with_filter(LevelFilter::ERROR))
}

/// Layer that records `ERROR` events into a [`RecentErrors`] buffer.
pub struct ErrorCaptureLayer {
    errors: Arc<RecentErrors>,
}

impl ErrorCaptureLayer {
    pub fn new(errors: Arc<RecentErrors>) -> Self {
        Self { errors }
    }
}

impl<S: Subscriber> Layer<S> for ErrorCaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() != Level::ERROR {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.errors
            .push(ErrorRecord::now(metadata.target(), visitor.finish()));
    }
}

/// Flattens an event into `message key=value ...`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            return self.message;
        }
        let fields = self.fields.join(" ");
        if self.message.is_empty() {
            fields
        } else {
            format!("{} {}", self.message, fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::error_log::ErrorLog;

    #[test]
    fn test_only_errors_are_captured() {
        let errors = Arc::new(RecentErrors::new(8));
        let subscriber =
            tracing_subscriber::registry().with(ErrorCaptureLayer::new(errors.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("not interesting");
            tracing::warn!("still not");
            tracing::error!(module = "clock", attempt = 2, "Module crashed");
        });

        let recorded = errors.recent_errors();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].message, "Module crashed module=clock attempt=2");
        assert_eq!(recorded[0].target, module_path!());
    }

    #[test]
    fn test_fields_without_message() {
        let errors = Arc::new(RecentErrors::new(8));
        let subscriber =
            tracing_subscriber::registry().with(ErrorCaptureLayer::new(errors.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(code = 7);
        });

        assert_eq!(errors.recent_errors()[0].message, "code=7");
    }

    #[test]
    fn test_errors_from_any_target_are_captured() {
        let errors = Arc::new(RecentErrors::new(8));
        let subscriber = subscriber(default_filter("info"), errors.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "hyper::server", "connection reset");
            tracing::error!(target: "layout_control::layout", "module crashed");
            tracing::warn!(target: "hyper::server", "slow client");
        });

        let targets: Vec<String> = errors
            .recent_errors()
            .into_iter()
            .map(|r| r.target)
            .collect();
        assert_eq!(targets, vec!["hyper::server", "layout_control::layout"]);
    }

    #[test]
    fn test_console_filter_does_not_silence_error_buffer() {
        let errors = Arc::new(RecentErrors::new(8));
        let subscriber = subscriber(EnvFilter::new("off"), errors.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("display unreachable");
        });

        assert_eq!(errors.len(), 1);
    }
}
