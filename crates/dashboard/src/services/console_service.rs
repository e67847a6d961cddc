use std::fmt::Write as _;

use async_trait::async_trait;
use common::actors::{Actor, ActorType, ControlMessage};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{broadcast, mpsc, watch},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::services::{display::DisplayState, poller_service::PollerCommand};

pub const HELP: &str = "commands: r(efresh) f(orce) a(nalyze) s(tats) h(elp) q(uit)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Poller(PollerCommand),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Option<ConsoleCommand> {
    let command = match line.trim().to_lowercase().as_str() {
        "r" | "refresh" => ConsoleCommand::Poller(PollerCommand::Refresh),
        "f" | "force" => ConsoleCommand::Poller(PollerCommand::ForceRun),
        "a" | "analyze" => ConsoleCommand::Poller(PollerCommand::Analyze),
        "s" | "stats" => ConsoleCommand::Poller(PollerCommand::LoadStats),
        "h" | "help" | "?" => ConsoleCommand::Help,
        "q" | "quit" | "exit" => ConsoleCommand::Quit,
        _ => return None,
    };
    Some(command)
}

/// One-screen summary of the display state.
pub fn render(state: &DisplayState) -> String {
    let mut out = String::new();

    match &state.status {
        Some(status) => {
            let source = state
                .status_source
                .map(|s| format!(" [{}]", s))
                .unwrap_or_default();
            let _ = writeln!(out, "status: {}{}", status.status, source);
            let _ = writeln!(
                out,
                "portfolio: {:.2} ({:+.2}%, profit {:+.2})",
                status.virtual_portfolio_value, status.virtual_return_percentage, status.total_profit
            );
            let _ = writeln!(
                out,
                "uptime: {}s  sessions: {}  trades: {}",
                status.uptime_seconds, status.trading_sessions, status.total_trades
            );
        }
        None => {
            let _ = writeln!(out, "status: loading");
        }
    }

    if state.refreshing {
        let _ = writeln!(out, "refreshing...");
    }
    if state.busy {
        let _ = writeln!(out, "working...");
    }
    if let Some(notice) = &state.notice {
        let _ = writeln!(out, "! {}", notice);
    }

    for signal in state.signals.as_slice() {
        let _ = writeln!(
            out,
            "  {:<4} {:<5} {:.0}% impact {} ({}) {}",
            signal.action,
            signal.ticker,
            signal.confidence * 100.0,
            signal.impact_score,
            signal.ai_provider,
            signal.reason
        );
    }

    if let Some(stats) = &state.stats {
        let _ = writeln!(out, "stats: {}", stats);
    }

    out.trim_end().to_string()
}

/// Reads commands from stdin and prints the display whenever it changes.
pub struct ConsoleService {
    id: Uuid,
    display: watch::Receiver<DisplayState>,
    commands: broadcast::Sender<PollerCommand>,
}

impl ConsoleService {
    pub fn new(display: watch::Receiver<DisplayState>, commands: broadcast::Sender<PollerCommand>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display,
            commands,
        }
    }

    fn dispatch(&self, command: PollerCommand) {
        if self.commands.send(command).is_err() {
            warn!("No poller is listening for {:?}", command);
        }
    }
}

#[async_trait]
impl Actor for ConsoleService {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> ActorType {
        ActorType::ConsoleActor
    }

    async fn run(&mut self, supervisor_tx: mpsc::Sender<ControlMessage>) -> anyhow::Result<()> {
        let _heartbeat = self.spawn_heartbeat(supervisor_tx.clone());
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;
        info!("{}", HELP);

        loop {
            tokio::select! {
                line = lines.next_line(), if stdin_open => {
                    match line? {
                        Some(line) => match parse_command(&line) {
                            Some(ConsoleCommand::Poller(command)) => self.dispatch(command),
                            Some(ConsoleCommand::Help) => info!("{}", HELP),
                            Some(ConsoleCommand::Quit) => {
                                self.dispatch(PollerCommand::Unmount);
                                let _ = supervisor_tx.send(ControlMessage::Halt).await;
                                break;
                            }
                            None if line.trim().is_empty() => {}
                            None => warn!("Unknown command {:?}. {}", line.trim(), HELP),
                        },
                        None => {
                            info!("stdin closed, console is display-only now");
                            stdin_open = false;
                        }
                    }
                }

                changed = self.display.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = self.display.borrow_and_update().clone();
                    info!("\n{}", render(&state));
                }
            }
        }

        Ok(())
    }
}
