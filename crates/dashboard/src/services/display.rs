use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use common::models::{Signal, SystemStatus};
use remote::{DataSource, Fetched};
use serde_json::Value;
use tokio::sync::watch;

pub const SIGNAL_FEED_CAPACITY: usize = 10;

/// Most recent signals, newest first, never longer than
/// [`SIGNAL_FEED_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalFeed {
    signals: Vec<Signal>,
}

impl SignalFeed {
    pub fn push(&mut self, signal: Signal) {
        self.signals.insert(0, signal);
        self.signals.truncate(SIGNAL_FEED_CAPACITY);
    }

    /// `batch` must already be newest first; it lands in front of the feed.
    pub fn push_batch(&mut self, batch: Vec<Signal>) {
        let mut merged = batch;
        merged.append(&mut self.signals);
        merged.truncate(SIGNAL_FEED_CAPACITY);
        self.signals = merged;
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn as_slice(&self) -> &[Signal] {
        &self.signals
    }
}

#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    pub status: Option<SystemStatus>,
    pub status_source: Option<DataSource>,
    pub signals: SignalFeed,
    pub signal_source: Option<DataSource>,
    /// Visible indicator of a user-triggered refresh
    pub refreshing: bool,
    /// A force run or analysis cycle is in progress
    pub busy: bool,
    /// User-visible alert text
    pub notice: Option<String>,
    pub stats: Option<Value>,
    pub last_ack: Option<Value>,
}

impl DisplayState {
    pub fn set_status(&mut self, fetched: Fetched<SystemStatus>) {
        let (source, status) = fetched.into_parts();
        self.status = Some(status);
        self.status_source = Some(source);
    }

    pub fn push_signals(&mut self, fetched: Fetched<Vec<Signal>>) {
        let (source, signals) = fetched.into_parts();
        self.signals.push_batch(signals);
        self.signal_source = Some(source);
    }
}

/// Owner of the display state. Pollers mount onto it; the console watches it.
#[derive(Clone)]
pub struct Display {
    tx: Arc<watch::Sender<DisplayState>>,
}

impl Display {
    pub fn new() -> (Self, watch::Receiver<DisplayState>) {
        let (tx, rx) = watch::channel(DisplayState::default());
        (Self { tx: Arc::new(tx) }, rx)
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.tx.subscribe()
    }

    pub fn mount(&self) -> Mount {
        Mount {
            view: View {
                tx: self.tx.clone(),
                live: Arc::new(AtomicBool::new(true)),
            },
        }
    }
}

/// A mounted poller's claim on the display. Dropping it unmounts: every
/// [`View`] handed out from it stops writing.
pub struct Mount {
    view: View,
}

impl Mount {
    pub fn view(&self) -> View {
        self.view.clone()
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.view.live.store(false, Ordering::SeqCst);
    }
}

/// Write access used by in-flight refreshes.
#[derive(Clone)]
pub struct View {
    tx: Arc<watch::Sender<DisplayState>>,
    live: Arc<AtomicBool>,
}

impl View {
    pub fn is_mounted(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Applies `f` unless the owning mount is gone. Returns whether it did.
    pub fn apply(&self, f: impl FnOnce(&mut DisplayState)) -> bool {
        if !self.is_mounted() {
            return false;
        }
        self.tx.send_modify(f);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::models::SignalAction;

    fn signal(ticker: &str) -> Signal {
        Signal {
            ticker: ticker.to_string(),
            action: SignalAction::Hold,
            reason: String::new(),
            confidence: 0.7,
            impact_score: 4,
            event_type: None,
            ai_provider: "technical".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_feed_never_exceeds_capacity() {
        let mut feed = SignalFeed::default();
        for i in 0..25 {
            feed.push_batch(vec![signal(&format!("A{i}")), signal(&format!("B{i}")), signal(&format!("C{i}"))]);
            assert!(feed.len() <= SIGNAL_FEED_CAPACITY);
        }
        assert_eq!(feed.len(), SIGNAL_FEED_CAPACITY);
        assert_eq!(feed.as_slice()[0].ticker, "A24");
        assert_eq!(feed.as_slice()[3].ticker, "A23");
    }

    #[test]
    fn test_feed_drops_oldest_first() {
        let mut feed = SignalFeed::default();
        for i in 0..12 {
            feed.push(signal(&i.to_string()));
        }
        let tickers: Vec<_> = feed.as_slice().iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(tickers.first(), Some(&"11"));
        assert_eq!(tickers.last(), Some(&"2"));
    }

    #[test]
    fn test_dropped_mount_stops_writes() {
        let (display, rx) = Display::new();
        let mount = display.mount();
        let view = mount.view();

        assert!(view.apply(|s| s.busy = true));
        assert!(rx.borrow().busy);

        drop(mount);
        assert!(!view.is_mounted());
        assert!(!view.apply(|s| s.busy = false));
        assert!(rx.borrow().busy);
    }

    #[test]
    fn test_new_mount_is_independent() {
        let (display, rx) = Display::new();
        let old = display.mount().view();
        let current = display.mount();

        assert!(!old.apply(|s| s.notice = Some("stale".into())));
        assert!(current.view().apply(|s| s.notice = Some("fresh".into())));
        assert_eq!(rx.borrow().notice.as_deref(), Some("fresh"));
    }
}
