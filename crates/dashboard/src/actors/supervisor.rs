use std::{collections::HashMap, time::Duration};
use tracing::{error, info, warn};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant},
};
use uuid::Uuid;

use crate::actors::{Actor, ActorType, ControlMessage};

pub type ActorFactory = Box<dyn Fn() -> Box<dyn Actor> + Send + Sync>;

const CHECK_PERIOD: Duration = Duration::from_secs(1);
const PULSE_TIMEOUT: Duration = Duration::from_secs(3);

struct Running {
    actor_type: ActorType,
    handle: JoinHandle<()>,
    last_pulse: Instant,
}

pub struct Supervisor {
    actor_factories: HashMap<ActorType, ActorFactory>,
    running: HashMap<Uuid, Running>,
    tx: mpsc::Sender<ControlMessage>,
    rx: mpsc::Receiver<ControlMessage>,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<ControlMessage>(512);
        Self {
            actor_factories: HashMap::new(),
            running: HashMap::new(),
            tx,
            rx,
        }
    }

    pub fn register_actor(&mut self, actor_type: ActorType, factory: ActorFactory) {
        self.actor_factories.insert(actor_type, factory);
    }

    /// Runs until every actor has shut down, a `Halt` arrives or Ctrl-C.
    pub async fn start(&mut self) {
        let mut check_interval = time::interval(CHECK_PERIOD);

        let actors: Vec<ActorType> = self.actor_factories.keys().copied().collect();
        actors.into_iter().for_each(|actor| self.spawn_actor(actor));

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                Some(msg) = self.rx.recv() => {
                    match msg {
                        ControlMessage::Heartbeat(id) => {
                            if let Some(running) = self.running.get_mut(&id) {
                                running.last_pulse = Instant::now();
                            }
                        }
                        ControlMessage::Shutdown(id) => {
                            if let Some(running) = self.running.remove(&id) {
                                info!("{:?} is shutting down gracefully.", running.actor_type);
                                running.handle.abort();
                            }
                            if self.running.is_empty() {
                                info!("All actors stopped");
                                break;
                            }
                        }
                        ControlMessage::Error(id, error_msg) => {
                            if let Some(running) = self.running.remove(&id) {
                                error!("Actor {:?} crashed: {}", running.actor_type, error_msg);
                                running.handle.abort();
                                self.spawn_actor(running.actor_type);
                            }
                        }
                        ControlMessage::Halt => {
                            info!("Halt requested");
                            break;
                        }
                    }
                }

                _ = check_interval.tick() => {
                    let dead_timeout = Instant::now() - PULSE_TIMEOUT;

                    let dead_actors: Vec<Uuid> = self
                        .running
                        .iter()
                        .filter(|(_, running)| running.last_pulse < dead_timeout)
                        .map(|(id, _)| *id)
                        .collect();

                    for id in dead_actors {
                        if let Some(running) = self.running.remove(&id) {
                            warn!("{:?} is unresponsive!", running.actor_type);
                            running.handle.abort();
                            self.spawn_actor(running.actor_type);
                        }
                    }
                }

                _ = &mut ctrl_c => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        for (_, running) in self.running.drain() {
            running.handle.abort();
        }
    }

    fn spawn_actor(&mut self, actor_type: ActorType) {
        let Some(factory) = self.actor_factories.get(&actor_type) else {
            error!("No factory registered for {:?}", actor_type);
            return;
        };
        let mut new_actor = factory();
        let id = new_actor.id();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = new_actor.run(tx.clone()).await {
                let _ = tx.send(ControlMessage::Error(id, format!("{:#}", e))).await;
            }
        });
        self.running.insert(
            id,
            Running {
                actor_type,
                handle,
                last_pulse: Instant::now(),
            },
        );
    }
}
