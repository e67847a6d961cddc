use std::time::Duration;

use async_trait::async_trait;
use tokio::{sync::mpsc, task::JoinHandle};
use uuid::Uuid;

pub const HEARTBEAT_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorType {
    PollerActor,
    ConsoleActor,
}

/// Messages sent from Actors to the Supervisor
pub enum ControlMessage {
    Heartbeat(Uuid),
    Shutdown(Uuid),
    Error(Uuid, String),
    /// Stop every actor and return from the supervisor loop.
    Halt,
}

impl std::fmt::Debug for ControlMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Heartbeat(id) => write!(f, "Heartbeat({})", id),
            Self::Shutdown(id) => write!(f, "Shutdown({})", id),
            Self::Error(id, err) => write!(f, "Error({}, {})", id, err),
            Self::Halt => write!(f, "Halt"),
        }
    }
}

/// The trait that all restartable services must implement
#[async_trait]
pub trait Actor: Send + Sync {
    /// The kind of actor, used by the supervisor to pick a factory on restart.
    fn name(&self) -> ActorType;

    fn id(&self) -> Uuid;

    /// The main loop of the actor.
    /// It must periodically send `ControlMessage::Heartbeat` to the supervisor.
    async fn run(&mut self, supervisor_tx: mpsc::Sender<ControlMessage>) -> anyhow::Result<()>;

    fn spawn_heartbeat(&self, supervisor_tx: mpsc::Sender<ControlMessage>) -> HeartbeatGuard {
        heartbeat(self.id(), supervisor_tx)
    }
}

/// Aborts the heartbeat task when dropped, so an actor stops pulsing on
/// every exit path of its `run`, including `?` and task abort.
pub struct HeartbeatGuard {
    handle: JoinHandle<()>,
}

impl Drop for HeartbeatGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn heartbeat(id: Uuid, supervisor_tx: mpsc::Sender<ControlMessage>) -> HeartbeatGuard {
    let handle = tokio::spawn(async move {
        loop {
            if supervisor_tx
                .send(ControlMessage::Heartbeat(id))
                .await
                .is_err()
            {
                break;
            }
            tokio::time::sleep(HEARTBEAT_PERIOD).await;
        }
    });
    HeartbeatGuard { handle }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dropped_guard_stops_heartbeats() {
        let (tx, mut rx) = mpsc::channel(8);
        let id = Uuid::new_v4();
        let guard = heartbeat(id, tx);

        match rx.recv().await {
            Some(ControlMessage::Heartbeat(beat)) => assert_eq!(beat, id),
            other => panic!("expected a heartbeat, got {:?}", other),
        }

        drop(guard);
        // The aborted task owned the only sender, so the channel closes.
        let closed = tokio::time::timeout(HEARTBEAT_PERIOD * 4, async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(closed.is_ok());
    }
}
