use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use common::{
    actors::{Actor, ActorType, ControlMessage},
    config::DashboardConfig,
};
use remote::DashboardApi;
use tokio::{
    sync::{broadcast, mpsc},
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::services::display::{Display, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerCommand {
    Refresh,
    ForceRun,
    Analyze,
    LoadStats,
    Unmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshTrigger {
    Mount,
    Manual,
    Tick,
    /// Status refresh that closes a force run or analysis cycle
    AfterAction,
}

impl RefreshTrigger {
    fn is_visible(self) -> bool {
        self != Self::Tick
    }

    fn clears_notice(self) -> bool {
        matches!(self, Self::Mount | Self::Manual)
    }
}

#[derive(Debug, Clone)]
pub struct PollerSettings {
    pub interval: Duration,
    pub fetch_signals: bool,
    pub analysis_delay: Duration,
}

impl From<&DashboardConfig> for PollerSettings {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            interval: config.poll_interval,
            fetch_signals: config.fetch_signals,
            analysis_delay: config.analysis_delay,
        }
    }
}

/// Refresh driver of the dashboard. Mounts on start, refreshes silently on
/// every tick and visibly on demand, and unmounts when told to or when its
/// command channel closes.
pub struct PollerService {
    id: Uuid,
    api: DashboardApi,
    display: Display,
    commands: broadcast::Receiver<PollerCommand>,
    settings: PollerSettings,
}

#[async_trait]
impl Actor for PollerService {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> ActorType {
        ActorType::PollerActor
    }

    async fn run(&mut self, supervisor_tx: mpsc::Sender<ControlMessage>) -> anyhow::Result<()> {
        let heartbeat = self.spawn_heartbeat(supervisor_tx.clone());

        let mount = self.display.mount();
        info!("Poller mounted, refreshing every {:?}", self.settings.interval);
        self.spawn_refresh(mount.view(), RefreshTrigger::Mount);

        let period = self.settings.interval;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    debug!("Background refresh");
                    self.spawn_refresh(mount.view(), RefreshTrigger::Tick);
                }

                command = self.commands.recv() => {
                    match command {
                        Ok(PollerCommand::Refresh) => {
                            self.spawn_refresh(mount.view(), RefreshTrigger::Manual);
                        }
                        Ok(PollerCommand::ForceRun) => {
                            tokio::spawn(force_run(self.api.clone(), mount.view()));
                        }
                        Ok(PollerCommand::Analyze) => {
                            tokio::spawn(analysis_cycle(
                                self.api.clone(),
                                mount.view(),
                                self.settings.analysis_delay,
                            ));
                        }
                        Ok(PollerCommand::LoadStats) => {
                            tokio::spawn(load_stats(self.api.clone(), mount.view()));
                        }
                        Ok(PollerCommand::Unmount) => break,
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("Poller lagged: missed {} commands", n);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            warn!("Poller command channel closed.");
                            break;
                        }
                    }
                }
            }
        }

        drop(mount);
        drop(heartbeat);
        info!("Poller unmounted");
        let _ = supervisor_tx.send(ControlMessage::Shutdown(self.id)).await;
        Ok(())
    }
}

impl PollerService {
    pub fn new(
        api: DashboardApi,
        display: Display,
        commands: broadcast::Receiver<PollerCommand>,
        settings: PollerSettings,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            api,
            display,
            commands,
            settings,
        }
    }

    fn spawn_refresh(&self, view: View, trigger: RefreshTrigger) {
        tokio::spawn(refresh(
            self.api.clone(),
            view,
            trigger,
            self.settings.fetch_signals,
        ));
    }
}

/// Status first, then signals. Each write is dropped once the poller that
/// issued it has unmounted.
async fn refresh(api: DashboardApi, view: View, trigger: RefreshTrigger, fetch_signals: bool) {
    if trigger.is_visible()
        && !view.apply(|s| {
            s.refreshing = true;
            if trigger.clears_notice() {
                s.notice = None;
            }
        })
    {
        return;
    }

    let status = api.status.get_status().await;
    if !view.apply(|s| s.set_status(status)) {
        debug!("Discarding status that arrived after unmount");
        return;
    }

    if fetch_signals && trigger != RefreshTrigger::AfterAction {
        let batch = api.signals.get_technical_signals().await;
        view.apply(|s| s.push_signals(batch.map(|b| b.signals)));
    }

    if trigger.is_visible() {
        view.apply(|s| s.refreshing = false);
    }
}

async fn force_run(api: DashboardApi, view: View) {
    if !view.apply(|s| {
        s.busy = true;
        s.notice = None;
    }) {
        return;
    }

    match api.executor.force().await {
        Ok(ack) => {
            info!("Force run acknowledged (simulated: {})", ack.is_simulated());
            view.apply(|s| s.last_ack = Some(ack.into_inner()));
        }
        Err(e) => {
            error!("Force run failed: {}", e);
            view.apply(|s| s.notice = Some(format!("Force run failed: {}", e)));
        }
    }

    refresh(api, view.clone(), RefreshTrigger::AfterAction, false).await;
    view.apply(|s| s.busy = false);
}

async fn analysis_cycle(api: DashboardApi, view: View, delay: Duration) {
    if !view.apply(|s| {
        s.busy = true;
        s.notice = None;
    }) {
        return;
    }

    time::sleep(delay).await;

    let market = api.market.get_market_context().await.into_inner();
    let analyzed = api.simulation().lock().await.analyze(&market, Utc::now());

    match analyzed {
        Some((signal, price)) => {
            info!(
                "Analysis produced {} {} (confidence {:.2})",
                signal.action, signal.ticker, signal.confidence
            );
            view.apply(|s| s.signals.push(signal.clone()));
            if let Some(ack) = api.executor.execute_trade(&signal, price).await {
                view.apply(|s| s.last_ack = Some(ack.into_inner()));
            }
        }
        None => {
            warn!("Analysis skipped: empty market context");
            view.apply(|s| s.notice = Some("No market data available for analysis".to_string()));
        }
    }

    refresh(api, view.clone(), RefreshTrigger::AfterAction, false).await;
    view.apply(|s| s.busy = false);
}

async fn load_stats(api: DashboardApi, view: View) {
    let stats = api.stats.get_stats().await;
    if stats.is_none() {
        debug!("No detailed stats available");
    }
    view.apply(|s| s.stats = stats);
}
