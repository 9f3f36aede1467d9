//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! Primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [run-started]
//! [diag] rendering 120 paths
//! [schema-changed] params=3
//! [artifact] /tmp/sketch_1700000000.svg
//! [artifact-cleared]
//! [interval] 1.5s
//! [run-finished]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::subscribe::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Not intended for production use —
/// implement a custom [`Subscribe`] for structured logging or a real
/// diagnostics pane.
#[derive(Debug, Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::RunStarted => println!("[run-started]"),
            EventKind::RunFinished => println!("[run-finished]"),
            EventKind::SchemaChanged => {
                let n = e.manifest.as_ref().map(|m| m.len()).unwrap_or(0);
                println!("[schema-changed] params={n}");
            }
            EventKind::ArtifactReady => {
                println!("[artifact] {}", e.path.as_deref().unwrap_or("<missing>"));
            }
            EventKind::ArtifactCleared => println!("[artifact-cleared]"),
            EventKind::Diagnostic => {
                println!("[diag] {}", e.message.as_deref().unwrap_or(""));
            }
            EventKind::IntervalSwitched => {
                println!("[interval] {:?}", e.interval.unwrap_or_default());
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                println!("[delivery] {}", e.message.as_deref().unwrap_or(""));
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
