//! # Regeneration controller: the orchestrating state machine.
//!
//! The [`Controller`] owns the repeating timer, the [`ParameterStore`], the
//! event bus, and the generator seam. It reacts to timer ticks and inbound
//! commands by requesting runs, subject to the at-most-one-in-flight
//! invariant, and translates run results into collaborator notifications.
//!
//! ## State machine
//! ```text
//!             ┌──────────────────────────────────────────────┐
//!             │                                              │
//!   timer tick│ value changed / rerun                        │ run completed
//!             ▼                                              │ (success or failure)
//!          ┌──────┐  launch: pause timer, build request,  ┌─────────┐
//!          │ Idle │ ────── spawn generator run ──────────►│ Running │
//!          └──────┘                                       └─────────┘
//!             ▲                                              │
//!             │   timer restarts from the full interval      │
//!             └──────────────────────────────────────────────┘
//!
//!   tick / rerun while Running  → dropped, not queued
//!   value edit while Running    → ValueSet updated, no launch
//!                                 (picked up by the next tick)
//! ```
//!
//! ## Concurrency model
//! One logical thread of control: timer ticks, commands, and run completions
//! are all serialized onto the single `run()` loop via `tokio::select!`. The
//! child process is the only thing that runs concurrently; its completion
//! comes back as a message, so the loop never blocks while a run is in
//! flight. There is no cancellation and no child timeout: a hung generator
//! blocks future regeneration until killed externally (a limitation carried
//! over from the original viewer, on purpose).
//!
//! ## Event flow
//! ```text
//! on success:
//!   passthrough lines / protocol errors / stderr ──► Diagnostic (each)
//!   manifest present and structurally different  ──► store replaced + reconciled
//!                                                    ──► SchemaChanged{manifest, values}
//!   artifact path present ──► ArtifactReady{path}
//!   artifact path absent  ──► ArtifactCleared
//! on failure:
//!   exactly one Diagnostic; manifest/values/artifact untouched
//! always:
//!   RunFinished, state back to Idle, timer restarted
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::controller::handle::{Command, ControllerHandle};
use crate::controller::state::RunState;
use crate::error::ProcessError;
use crate::events::{Bus, Event, EventKind};
use crate::params::ParameterStore;
use crate::process::{GeneratorRef, ProcessSupervisor, RunRequest};
use crate::protocol::RunResult;
use crate::subscribers::{Subscribe, SubscriberSet};

/// What one finished run delivered back to the loop.
type RunOutcome = Result<RunResult, ProcessError>;

/// Supervises regeneration of a single generator command.
///
/// Construct with [`Controller::new`], grab a [`ControllerHandle`] and the
/// [`Bus`], then drive it with [`Controller::run`] (usually on a spawned
/// task) until the token is cancelled.
pub struct Controller {
    cfg: Config,
    command: Vec<String>,
    generator: GeneratorRef,
    store: ParameterStore,
    bus: Bus,
    subs: Arc<SubscriberSet>,

    /// Currently selected interval (applied at each timer restart).
    interval: std::time::Duration,
    /// Path of the most recent artifact, if any.
    artifact: Option<String>,
    state: RunState,

    tx: mpsc::Sender<Command>,
    rx: Option<mpsc::Receiver<Command>>,
    done_tx: mpsc::Sender<RunOutcome>,
    done_rx: Option<mpsc::Receiver<RunOutcome>>,
}

impl Controller {
    /// Creates a controller for the given base command with the provided
    /// subscribers attached.
    ///
    /// The default generator seam is a [`ProcessSupervisor`]; tests and
    /// embedders can substitute one via [`Controller::with_generator`].
    pub fn new(cfg: Config, command: Vec<String>, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(subscribers, bus.clone()));
        let (tx, rx) = mpsc::channel(cfg.command_capacity_clamped());
        let (done_tx, done_rx) = mpsc::channel(1);
        let interval = cfg.slow_interval;

        Self {
            cfg,
            command,
            generator: Arc::new(ProcessSupervisor::new()),
            store: ParameterStore::new(),
            bus,
            subs,
            interval,
            artifact: None,
            state: RunState::Idle,
            tx,
            rx: Some(rx),
            done_tx,
            done_rx: Some(done_rx),
        }
    }

    /// Replaces the generator seam (testing, embedding).
    pub fn with_generator(mut self, generator: GeneratorRef) -> Self {
        self.generator = generator;
        self
    }

    /// Returns a handle for submitting commands.
    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle {
            tx: self.tx.clone(),
        }
    }

    /// Returns the event bus (for ad-hoc receivers beyond the subscriber set).
    pub fn bus(&self) -> Bus {
        self.bus.clone()
    }

    /// Runs the controller loop until `token` is cancelled.
    ///
    /// The first generation fires immediately; the timer starts counting
    /// after it completes. Cancellation stops new launches but does not kill
    /// an in-flight generator.
    pub async fn run(mut self, token: CancellationToken) {
        let (Some(mut rx), Some(mut done_rx)) = (self.rx.take(), self.done_rx.take()) else {
            return;
        };

        self.spawn_fanout_listener();
        self.launch();
        let mut deadline = Instant::now() + self.interval;

        loop {
            let running = self.state.is_running();

            tokio::select! {
                _ = token.cancelled() => break,

                cmd = rx.recv() => match cmd {
                    Some(cmd) => {
                        if let Some(restarted) = self.on_command(cmd) {
                            deadline = restarted;
                        }
                    }
                    None => break,
                },

                Some(outcome) = done_rx.recv(), if running => {
                    self.on_run_finished(outcome);
                    deadline = Instant::now() + self.interval;
                }

                _ = time::sleep_until(deadline), if !running => {
                    self.launch();
                }
            }
        }
    }

    /// Subscribes to the bus and forwards events to the subscriber set
    /// (fire-and-forget).
    fn spawn_fanout_listener(&self) {
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => set.emit_arc(Arc::new(ev)),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// Launches a generation run if idle; no-op while one is in flight.
    fn launch(&mut self) {
        if self.state.is_running() {
            return;
        }

        let request = RunRequest::new(self.command.clone(), self.store.values().clone());
        let generator = Arc::clone(&self.generator);
        let done = self.done_tx.clone();

        self.state = RunState::Running;
        self.bus.publish(Event::new(EventKind::RunStarted));

        tokio::spawn(async move {
            let outcome = generator.run(&request).await;
            let _ = done.send(outcome).await;
        });
    }

    /// Handles an inbound command; returns a new timer deadline when the
    /// timer was restarted.
    fn on_command(&mut self, cmd: Command) -> Option<Instant> {
        match cmd {
            Command::SetValue { name, value } => {
                match self.store.set_value(&name, value) {
                    // The edit landed in the ValueSet immediately; a launch
                    // happens only when idle (never queued).
                    Ok(_) => self.launch(),
                    Err(err) => self.bus.publish(Event::diagnostic(err.as_message())),
                }
                None
            }
            Command::SwitchInterval(mode) => {
                self.interval = self.cfg.interval(mode);
                self.bus
                    .publish(Event::new(EventKind::IntervalSwitched).with_interval(self.interval));
                // Takes effect on the next restart: now when idle, on run
                // completion otherwise.
                self.state
                    .is_idle()
                    .then(|| Instant::now() + self.interval)
            }
            Command::Rerun => {
                self.launch();
                None
            }
            Command::ArtifactPath { reply } => {
                let _ = reply.send(self.artifact.clone());
                None
            }
        }
    }

    /// Transitions back to `Idle` and translates the outcome into events.
    fn on_run_finished(&mut self, outcome: RunOutcome) {
        self.state = RunState::Idle;

        match outcome {
            Ok(result) => self.apply_result(result),
            Err(err) => self.bus.publish(Event::diagnostic(err.as_message())),
        }

        self.bus.publish(Event::new(EventKind::RunFinished));
    }

    /// Applies a successful run: diagnostics, schema reconciliation, artifact.
    fn apply_result(&mut self, result: RunResult) {
        for line in &result.log_lines {
            self.bus.publish(Event::diagnostic(line.as_str()));
        }
        for err in &result.errors {
            self.bus.publish(Event::diagnostic(err.as_message()));
        }
        if !result.stderr.is_empty() {
            self.bus
                .publish(Event::diagnostic(result.stderr.trim_end()));
        }

        if let Some(manifest) = result.manifest {
            if self.store.apply_manifest(manifest) {
                self.bus.publish(
                    Event::new(EventKind::SchemaChanged)
                        .with_manifest(self.store.manifest().clone())
                        .with_values(self.store.values().clone()),
                );
            }
        }

        match result.artifact_path {
            Some(path) => {
                self.artifact = Some(path.clone());
                self.bus
                    .publish(Event::new(EventKind::ArtifactReady).with_path(path));
            }
            None => {
                self.artifact = None;
                self.bus.publish(Event::new(EventKind::ArtifactCleared));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::broadcast;

    use crate::config::IntervalMode;
    use crate::params::ParamValue;

    fn test_cfg() -> Config {
        Config {
            // Slow enough that the timer never fires on its own in tests.
            slow_interval: Duration::from_secs(3600),
            fast_interval: Duration::from_millis(50),
            bus_capacity: 128,
            command_capacity: 16,
        }
    }

    const MANIFEST_AB: &str = r#"{
        "count": {"type": "int", "default": 3, "min": 0, "max": 100},
        "debug": {"type": "bool", "default": false}
    }"#;

    // Same schema, reordered keys.
    const MANIFEST_BA: &str = r#"{
        "debug": {"type": "bool", "default": false},
        "count": {"type": "int", "default": 3, "min": 0, "max": 100}
    }"#;

    fn result_with(manifest: Option<&str>, svg: Option<&str>) -> RunResult {
        RunResult {
            manifest: manifest.map(|s| serde_json::from_str(s).unwrap()),
            artifact_path: svg.map(str::to_string),
            ..Default::default()
        }
    }

    struct FakeGenerator {
        runs: AtomicUsize,
        delay: Duration,
        last_args: Mutex<Vec<String>>,
        make: Box<dyn Fn(usize) -> RunOutcome + Send + Sync>,
    }

    impl FakeGenerator {
        fn arc(
            delay: Duration,
            make: impl Fn(usize) -> RunOutcome + Send + Sync + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                runs: AtomicUsize::new(0),
                delay,
                last_args: Mutex::new(Vec::new()),
                make: Box::new(make),
            })
        }

        fn count(&self) -> usize {
            self.runs.load(Ordering::SeqCst)
        }

        fn last_args(&self) -> Vec<String> {
            self.last_args.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl crate::process::Generate for FakeGenerator {
        async fn run(&self, request: &RunRequest) -> RunOutcome {
            let n = self.runs.fetch_add(1, Ordering::SeqCst);
            *self.last_args.lock().unwrap() = request.args();
            if self.delay > Duration::ZERO {
                time::sleep(self.delay).await;
            }
            (self.make)(n)
        }
    }

    /// Collects bus events until `n` more `RunFinished` events were seen.
    async fn events_until_finished(rx: &mut broadcast::Receiver<Event>, n: usize) -> Vec<Event> {
        let mut events = Vec::new();
        let mut finished = 0;
        time::timeout(Duration::from_secs(5), async {
            while finished < n {
                match rx.recv().await {
                    Ok(ev) => {
                        if ev.kind == EventKind::RunFinished {
                            finished += 1;
                        }
                        events.push(ev);
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
        .await
        .expect("timed out waiting for RunFinished");
        events
    }

    fn kinds(events: &[Event]) -> Vec<EventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    fn spawn_controller(
        gen: Arc<FakeGenerator>,
    ) -> (ControllerHandle, broadcast::Receiver<Event>, CancellationToken) {
        let controller = Controller::new(test_cfg(), vec!["sketch".into()], Vec::new())
            .with_generator(gen);
        let handle = controller.handle();
        let rx = controller.bus().subscribe();
        let token = CancellationToken::new();
        tokio::spawn(controller.run(token.clone()));
        (handle, rx, token)
    }

    #[tokio::test]
    async fn test_at_most_one_in_flight() {
        let gen = FakeGenerator::arc(Duration::from_millis(300), |_| {
            Ok(result_with(None, Some("/tmp/a.svg")))
        });
        let (handle, mut rx, token) = spawn_controller(Arc::clone(&gen));

        // Requests arriving while the initial run is in flight are dropped.
        time::sleep(Duration::from_millis(50)).await;
        for _ in 0..3 {
            handle.rerun().await.unwrap();
        }

        events_until_finished(&mut rx, 1).await;
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(gen.count(), 1);

        // Once idle, the next request launches exactly one run.
        handle.rerun().await.unwrap();
        events_until_finished(&mut rx, 1).await;
        assert_eq!(gen.count(), 2);

        token.cancel();
    }

    #[tokio::test]
    async fn test_schema_changed_suppressed_for_reordered_manifest() {
        let gen = FakeGenerator::arc(Duration::ZERO, |n| {
            if n == 0 {
                Ok(result_with(Some(MANIFEST_AB), Some("/tmp/1.svg")))
            } else {
                Ok(result_with(Some(MANIFEST_BA), Some("/tmp/2.svg")))
            }
        });
        let (handle, mut rx, token) = spawn_controller(gen);

        let first = events_until_finished(&mut rx, 1).await;
        assert!(kinds(&first).contains(&EventKind::SchemaChanged));
        assert!(kinds(&first).contains(&EventKind::ArtifactReady));

        handle.rerun().await.unwrap();
        let second = events_until_finished(&mut rx, 1).await;
        // Same schema (reordered keys): no rebuild notification, but the
        // artifact still refreshes.
        assert!(!kinds(&second).contains(&EventKind::SchemaChanged));
        let ready = second
            .iter()
            .find(|e| e.kind == EventKind::ArtifactReady)
            .unwrap();
        assert_eq!(ready.path.as_deref(), Some("/tmp/2.svg"));

        token.cancel();
    }

    #[tokio::test]
    async fn test_failure_leaves_state_untouched_with_one_diagnostic() {
        let gen = FakeGenerator::arc(Duration::ZERO, |n| {
            if n == 0 {
                Ok(result_with(Some(MANIFEST_AB), Some("/tmp/a.svg")))
            } else {
                Err(ProcessError::NonZeroExit {
                    code: 1,
                    stderr: "bad seed".into(),
                })
            }
        });
        let (handle, mut rx, token) = spawn_controller(gen);
        events_until_finished(&mut rx, 1).await;

        handle.rerun().await.unwrap();
        let second = events_until_finished(&mut rx, 1).await;

        let diagnostics: Vec<_> = second.iter().filter(|e| e.is_diagnostic()).collect();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0]
            .message
            .as_deref()
            .unwrap()
            .contains("bad seed"));

        // No state-bearing notifications on failure.
        assert!(!kinds(&second).contains(&EventKind::SchemaChanged));
        assert!(!kinds(&second).contains(&EventKind::ArtifactReady));
        assert!(!kinds(&second).contains(&EventKind::ArtifactCleared));

        // The previous artifact is still the current one.
        assert_eq!(
            handle.artifact_path().await.unwrap().as_deref(),
            Some("/tmp/a.svg")
        );

        token.cancel();
    }

    #[tokio::test]
    async fn test_artifact_cleared_when_run_declares_none() {
        let gen = FakeGenerator::arc(Duration::ZERO, |n| {
            if n == 0 {
                Ok(result_with(Some(MANIFEST_AB), Some("/tmp/a.svg")))
            } else {
                Ok(result_with(Some(MANIFEST_AB), None))
            }
        });
        let (handle, mut rx, token) = spawn_controller(gen);
        events_until_finished(&mut rx, 1).await;

        handle.rerun().await.unwrap();
        let second = events_until_finished(&mut rx, 1).await;
        assert!(kinds(&second).contains(&EventKind::ArtifactCleared));
        assert_eq!(handle.artifact_path().await.unwrap(), None);

        token.cancel();
    }

    #[tokio::test]
    async fn test_value_edit_triggers_run_and_reaches_argv() {
        let gen = FakeGenerator::arc(Duration::ZERO, |_| {
            Ok(result_with(Some(MANIFEST_AB), Some("/tmp/a.svg")))
        });
        let (handle, mut rx, token) = spawn_controller(Arc::clone(&gen));
        events_until_finished(&mut rx, 1).await;

        handle.set_value("count", 12i64).await.unwrap();
        events_until_finished(&mut rx, 1).await;
        assert_eq!(gen.count(), 2);

        let args = gen.last_args();
        let at = args.iter().position(|a| a == "--count").unwrap();
        assert_eq!(args[at + 1], "12");

        // Out-of-range edits are clamped, not rejected.
        handle.set_value("count", 1000i64).await.unwrap();
        events_until_finished(&mut rx, 1).await;
        let args = gen.last_args();
        let at = args.iter().position(|a| a == "--count").unwrap();
        assert_eq!(args[at + 1], "100");

        token.cancel();
    }

    #[tokio::test]
    async fn test_rejected_edit_is_diagnostic_only() {
        let gen = FakeGenerator::arc(Duration::ZERO, |_| {
            Ok(result_with(Some(MANIFEST_AB), Some("/tmp/a.svg")))
        });
        let (handle, mut rx, token) = spawn_controller(Arc::clone(&gen));
        events_until_finished(&mut rx, 1).await;

        handle
            .set_value("nope", ParamValue::Int(1))
            .await
            .unwrap();

        let diag = time::timeout(Duration::from_secs(5), async {
            loop {
                match rx.recv().await {
                    Ok(ev) if ev.is_diagnostic() => return ev,
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => panic!("bus closed"),
                }
            }
        })
        .await
        .unwrap();
        assert!(diag.message.as_deref().unwrap().contains("unknown parameter"));
        assert_eq!(gen.count(), 1);

        token.cancel();
    }

    #[tokio::test]
    async fn test_interval_switch_applies_on_next_restart() {
        let gen = FakeGenerator::arc(Duration::ZERO, |_| {
            Ok(result_with(None, Some("/tmp/a.svg")))
        });
        let (handle, mut rx, token) = spawn_controller(Arc::clone(&gen));
        events_until_finished(&mut rx, 1).await;
        assert_eq!(gen.count(), 1);

        // Slow interval is hours; switching to fast (50ms) while idle must
        // restart the countdown and produce a timer-driven run soon.
        handle.switch_interval(IntervalMode::Fast).await.unwrap();
        let events = events_until_finished(&mut rx, 1).await;
        assert!(kinds(&events).contains(&EventKind::IntervalSwitched));
        assert!(gen.count() >= 2);

        token.cancel();
    }

    #[tokio::test]
    async fn test_success_diagnostics_forwarded() {
        let gen = FakeGenerator::arc(Duration::ZERO, |_| {
            let mut r = result_with(None, Some("/tmp/a.svg"));
            r.log_lines = vec!["pass line".into()];
            r.stderr = "warn: slow path\n".into();
            Ok(r)
        });
        let (_handle, mut rx, token) = spawn_controller(gen);

        let events = events_until_finished(&mut rx, 1).await;
        let messages: Vec<_> = events
            .iter()
            .filter(|e| e.is_diagnostic())
            .map(|e| e.message.as_deref().unwrap().to_string())
            .collect();
        assert!(messages.contains(&"pass line".to_string()));
        assert!(messages.contains(&"warn: slow path".to_string()));

        token.cancel();
    }
}
