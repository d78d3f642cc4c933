//! Request/acknowledge shapes for the scheduler channel, and the run controls
//! behind the `toggle-run` action.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{
    runtime::Handle,
    sync::{mpsc, oneshot},
};
use tracing::{debug, warn};

use crate::{Error, Handler, Result};

/// Scheduler commands issued by the profile screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerCommand {
    /// Start running the profile's scripts.
    StartScheduler,
    /// Stop the running scheduler.
    StopScheduler,
}

/// A command sent to the scheduler backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerRequest {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// What to do.
    pub command: SchedulerCommand,
    /// Profile the command targets.
    pub config_id: String,
    /// Command arguments; an empty object for start/stop.
    #[serde(default)]
    pub payload: Value,
}

impl SchedulerRequest {
    /// Build a request stamped with the current time and an empty payload.
    pub fn new(command: SchedulerCommand, config_id: impl Into<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            timestamp,
            command,
            config_id: config_id.into(),
            payload: Value::Object(Default::default()),
        }
    }
}

/// The scheduler's acknowledgement of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerAck {
    /// Echo of the acknowledged command.
    pub command: SchedulerCommand,
    /// Echo of the targeted profile.
    pub config_id: String,
    /// Whether the scheduler accepted the command.
    pub ok: bool,
    /// Optional detail from the scheduler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A request in flight, paired with the channel its acknowledgement goes to.
#[derive(Debug)]
pub struct Trigger {
    /// The request.
    pub request: SchedulerRequest,
    /// Where the scheduler sends its acknowledgement.
    pub reply: oneshot::Sender<SchedulerAck>,
}

/// Non-blocking handle for sending requests to the scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerClient {
    /// Request channel into the scheduler task.
    tx: mpsc::UnboundedSender<Trigger>,
}

impl SchedulerClient {
    /// Wrap an existing sender.
    pub fn new(tx: mpsc::UnboundedSender<Trigger>) -> Self {
        Self { tx }
    }

    /// Create a client and the receiver the scheduler side drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Trigger>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Send `request`; the acknowledgement arrives on the returned receiver.
    pub fn trigger(&self, request: SchedulerRequest) -> Result<oneshot::Receiver<SchedulerAck>> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Trigger { request, reply })
            .map_err(|_| Error::Closed("scheduler"))?;
        Ok(rx)
    }
}

/// Start/stop controls for one profile.
///
/// The running flag mirrors the status channel and guards against duplicate
/// submissions: start is ignored while running, stop while idle.
#[derive(Debug, Clone)]
pub struct RunControls {
    /// Scheduler channel.
    client: SchedulerClient,
    /// Profile these controls drive.
    profile_id: String,
    /// Last reported running state.
    running: Arc<AtomicBool>,
}

impl RunControls {
    /// Controls for `profile_id`, initially not running.
    pub fn new(client: SchedulerClient, profile_id: impl Into<String>) -> Self {
        Self {
            client,
            profile_id: profile_id.into(),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Profile these controls drive.
    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    /// Last reported running state.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Record a running state reported by the status channel.
    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    /// Request a start. `Ok(None)` when already running.
    pub fn start(&self) -> Result<Option<oneshot::Receiver<SchedulerAck>>> {
        if self.is_running() {
            debug!(profile = %self.profile_id, "start ignored; already running");
            return Ok(None);
        }
        self.send(SchedulerCommand::StartScheduler).map(Some)
    }

    /// Request a stop. `Ok(None)` when not running.
    pub fn stop(&self) -> Result<Option<oneshot::Receiver<SchedulerAck>>> {
        if !self.is_running() {
            debug!(profile = %self.profile_id, "stop ignored; not running");
            return Ok(None);
        }
        self.send(SchedulerCommand::StopScheduler).map(Some)
    }

    /// Stop when running, start otherwise.
    pub fn toggle(&self) -> Result<Option<oneshot::Receiver<SchedulerAck>>> {
        if self.is_running() {
            self.stop()
        } else {
            self.start()
        }
    }

    /// A `toggle-run` handler. Acknowledgements are logged when a runtime is
    /// available; a closed channel is logged and otherwise ignored.
    pub fn toggle_handler(&self) -> Handler {
        let controls = self.clone();
        Arc::new(move || match controls.toggle() {
            Ok(Some(ack)) => {
                let Ok(rt) = Handle::try_current() else {
                    return;
                };
                let profile = controls.profile_id.clone();
                rt.spawn(async move {
                    if let Ok(ack) = ack.await {
                        debug!(profile = %profile, command = ?ack.command, ok = ack.ok, "scheduler acknowledged");
                    }
                });
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "toggle-run failed"),
        })
    }

    fn send(&self, command: SchedulerCommand) -> Result<oneshot::Receiver<SchedulerAck>> {
        debug!(profile = %self.profile_id, ?command, "scheduler request");
        self.client
            .trigger(SchedulerRequest::new(command, self.profile_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wire_shape() {
        let req = SchedulerRequest::new(SchedulerCommand::StartScheduler, "p1");
        let v = serde_json::to_value(&req).expect("encode");
        assert_eq!(v["command"], "start_scheduler");
        assert_eq!(v["config_id"], "p1");
        assert_eq!(v["payload"], serde_json::json!({}));
        assert!(v["timestamp"].as_u64().is_some_and(|t| t > 0));
    }

    #[test]
    fn toggle_respects_running_flag() {
        let (client, mut rx) = SchedulerClient::channel();
        let controls = RunControls::new(client, "p1");

        assert!(controls.stop().expect("stop").is_none());
        assert!(controls.toggle().expect("toggle").is_some());
        let t = rx.try_recv().expect("queued");
        assert_eq!(t.request.command, SchedulerCommand::StartScheduler);

        controls.set_running(true);
        assert!(controls.start().expect("start").is_none());
        controls.toggle().expect("toggle");
        let t = rx.try_recv().expect("queued");
        assert_eq!(t.request.command, SchedulerCommand::StopScheduler);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_channel_is_an_error() {
        let (client, rx) = SchedulerClient::channel();
        drop(rx);
        let controls = RunControls::new(client, "p1");
        assert!(matches!(controls.start(), Err(Error::Closed("scheduler"))));
    }

    #[test]
    fn handler_works_without_a_runtime() {
        let (client, mut rx) = SchedulerClient::channel();
        let controls = RunControls::new(client, "p1");
        (controls.toggle_handler())();
        assert!(rx.try_recv().is_ok());
    }
}
