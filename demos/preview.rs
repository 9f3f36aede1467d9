//! # Example: headless live preview
//!
//! Runs a generator command under the regeneration loop and prints what a
//! windowed frontend would react to: artifact updates, schema changes, and
//! diagnostics.
//!
//! Usage:
//! ```sh
//! cargo run --example preview -- ./my-sketch [fixed args...]
//! ```
//!
//! The generator is rerun every 5 seconds (the slow cadence) until Ctrl-C.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use skvisor::{Config, Controller, Event, EventKind, Subscribe};

/// Minimal stand-in for a viewer + form builder + status line.
struct Console;

#[async_trait::async_trait]
impl Subscribe for Console {
    async fn on_event(&self, event: &Event) {
        match event.kind {
            EventKind::RunStarted => println!("[run] generating..."),
            EventKind::RunFinished => println!("[run] keep sketching!"),
            EventKind::ArtifactReady => {
                println!("[artifact] {}", event.path.as_deref().unwrap_or(""));
            }
            EventKind::ArtifactCleared => println!("[artifact] none"),
            EventKind::SchemaChanged => {
                let manifest = event.manifest.as_ref();
                let count = manifest.map(|m| m.len()).unwrap_or(0);
                println!("[schema] {count} parameter(s):");
                if let (Some(manifest), Some(values)) = (manifest, event.values.as_ref()) {
                    for (name, schema) in manifest {
                        let value = values.get(name).map(|v| v.to_json()).unwrap_or_default();
                        println!("  --{name} ({}) = {value}", schema.kind_label());
                    }
                }
            }
            EventKind::Diagnostic => {
                println!("[diag] {}", event.message.as_deref().unwrap_or(""));
            }
            EventKind::IntervalSwitched => {
                println!("[interval] {:?}", event.interval.unwrap_or_default());
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                eprintln!("[delivery] {}", event.message.as_deref().unwrap_or(""));
            }
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let command: Vec<String> = std::env::args().skip(1).collect();
    if command.is_empty() {
        eprintln!("usage: preview <generator command> [fixed args...]");
        std::process::exit(2);
    }

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Console)];
    let controller = Controller::new(Config::default(), command, subs);
    let handle = controller.handle();

    let token = CancellationToken::new();
    let loop_task = tokio::spawn(controller.run(token.clone()));

    tokio::signal::ctrl_c().await?;

    // Show where the last artifact ended up before leaving.
    if let Ok(Some(path)) = handle.artifact_path().await {
        println!("last artifact: {path}");
    }

    token.cancel();
    loop_task.await?;
    Ok(())
}
