//! In-process stand-in for the scheduler backend.

use hotkeys::{RunControls, SchedulerAck, SchedulerCommand, Trigger};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

/// Acknowledge every request and mirror it into `controls`' running flag.
///
/// Runs until the request channel closes.
pub async fn serve(
    mut rx: UnboundedReceiver<Trigger>,
    controls: RunControls,
    notices: UnboundedSender<String>,
) {
    while let Some(Trigger { request, reply }) = rx.recv().await {
        let running = request.command == SchedulerCommand::StartScheduler;
        controls.set_running(running);
        info!(profile = %request.config_id, running, "scheduler state changed");
        let _ignored = notices.send(format!(
            "scheduler {} for {}",
            if running { "started" } else { "stopped" },
            request.config_id
        ));
        let ack = SchedulerAck {
            command: request.command,
            config_id: request.config_id,
            ok: true,
            message: None,
        };
        if reply.send(ack).is_err() {
            debug!("requester dropped before acknowledgement");
        }
    }
}

#[cfg(test)]
mod tests {
    use hotkeys::{SchedulerClient, SchedulerRequest};
    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test]
    async fn acknowledges_and_tracks_running_state() {
        let (client, rx) = SchedulerClient::channel();
        let controls = RunControls::new(client.clone(), "p1");
        let (notices, mut seen) = mpsc::unbounded_channel();
        let server = tokio::spawn(serve(rx, controls.clone(), notices));

        let ack = controls.toggle().expect("send").expect("start issued");
        let ack = ack.await.expect("ack");
        assert_eq!(ack.command, SchedulerCommand::StartScheduler);
        assert!(ack.ok);
        assert!(controls.is_running());
        assert_eq!(seen.recv().await.as_deref(), Some("scheduler started for p1"));

        let ack = client
            .trigger(SchedulerRequest::new(SchedulerCommand::StopScheduler, "p1"))
            .expect("send")
            .await
            .expect("ack");
        assert_eq!(ack.config_id, "p1");
        assert!(!controls.is_running());

        server.abort();
    }
}
