//! Paced event delivery for presentation layers
//!
//! Works on cloned events after resolution has committed them. Nothing here
//! can reach a `BattleState`, so delays never influence the outcome.

use crate::battle::{BattleEvent, EventSink};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::trace;

/// Delays inserted before each event on replay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Before ordinary events
    pub per_event: Duration,
    /// Before events that move HP, so a health bar can animate
    pub hp_change: Duration,
    /// Before a new turn starts
    pub turn_break: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::from_millis(600)
    }
}

impl Pacing {
    /// No delays at all
    pub fn instant() -> Self {
        Pacing {
            per_event: Duration::ZERO,
            hp_change: Duration::ZERO,
            turn_break: Duration::ZERO,
        }
    }

    /// Base delay of `ms`, doubled for HP changes and turn breaks
    pub fn from_millis(ms: u64) -> Self {
        Pacing {
            per_event: Duration::from_millis(ms),
            hp_change: Duration::from_millis(ms.saturating_mul(2)),
            turn_break: Duration::from_millis(ms.saturating_mul(2)),
        }
    }

    pub fn delay_for(&self, event: &BattleEvent) -> Duration {
        match event {
            BattleEvent::TurnStarted { .. } => self.turn_break,
            e if e.changes_hp() => self.hp_change,
            _ => self.per_event,
        }
    }
}

/// Deliver `events` to `sink` in order, sleeping before each one
pub async fn replay<S: EventSink + ?Sized>(events: &[BattleEvent], sink: &mut S, pacing: &Pacing) {
    for event in events {
        let delay = pacing.delay_for(event);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        sink.on_event(event);
    }
}

/// Forward everything from `rx` to `sink` with pacing until the channel closes
///
/// Returns the number of events delivered.
pub async fn forward_paced<S: EventSink + ?Sized>(
    rx: &mut mpsc::UnboundedReceiver<BattleEvent>,
    sink: &mut S,
    pacing: &Pacing,
) -> usize {
    let mut delivered = 0;
    while let Some(event) = rx.recv().await {
        replay(std::slice::from_ref(&event), sink, pacing).await;
        delivered += 1;
    }
    delivered
}

/// Sink that hands events to an async consumer
///
/// Sending never blocks. A dropped receiver is ignored so a failing
/// presentation layer cannot stall the battle.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<BattleEvent>,
}

impl ChannelSink {
    pub fn channel() -> (ChannelSink, mpsc::UnboundedReceiver<BattleEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelSink { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn on_event(&mut self, event: &BattleEvent) {
        if self.tx.send(event.clone()).is_err() {
            trace!("event receiver dropped");
        }
    }
}
