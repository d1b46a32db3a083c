//! Tracing setup: everything goes to the log file, and warnings and errors
//! are also forwarded to the status bar.

use std::fs::OpenOptions;
use std::path::Path;

use tokio::sync::mpsc;
use tracing_subscriber::prelude::*;

/// A tracing layer that forwards WARN and ERROR lines to the UI.
pub struct UiLogLayer {
    sender: mpsc::UnboundedSender<String>,
}

impl UiLogLayer {
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Self {
        Self { sender }
    }
}

impl<S> tracing_subscriber::Layer<S> for UiLogLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let level = event.metadata().level();
        if !matches!(*level, tracing::Level::WARN | tracing::Level::ERROR) {
            return;
        }
        let _ = self.sender.send(format_line(event));
    }
}

fn format_line(event: &tracing::Event<'_>) -> String {
    let mut message = format!(
        "{} [{}] ",
        chrono::Local::now().format("%H:%M:%S"),
        event.metadata().level()
    );
    let mut visitor = MessageVisitor(&mut message);
    event.record(&mut visitor);
    message
}

struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0.push_str(&format!("{:?}", value));
        } else {
            self.0.push_str(&format!(" {}={:?}", field.name(), value));
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init(log_path: &Path) -> anyhow::Result<mpsc::UnboundedReceiver<String>> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new().create(true).append(true).open(log_path)?;

    let (tx, rx) = mpsc::unbounded_channel();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(UiLogLayer::new(tx))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,streamer_core=debug,playradio=debug")
            }),
        )
        .init();

    Ok(rx)
}
