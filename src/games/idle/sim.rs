//! The simulation store: state + lifecycle + change feed.
//!
//! [`Simulation`] is the only thing the presentation layer talks to. It
//! forwards commands to the pure functions in [`logic`](super::logic) and
//! notifies subscribers after each mutation. Everything runs on the browser
//! event loop, so there is exactly one writer and no locking.

use rust_decimal::Decimal;

use super::config::{PurchasePolicy, SimConfig};
use super::error::SimError;
use super::logic;
use super::state::{FactoryKind, SimulationState};

/// What a mutating command did. Delivered to subscribers after the
/// mutation is visible through [`Simulation::state`].
#[derive(Clone, Debug, PartialEq)]
pub enum Change {
    /// One production step. `producers` is the number of owned kinds that
    /// contributed; one notification is sent per tick regardless.
    Ticked { producers: usize },
    ScoreAdded(Decimal),
    Purchased(FactoryKind),
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Running,
    Stopped,
    Disposed,
}

/// Handle returned by [`Simulation::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Change, &SimulationState)>;

pub struct Simulation {
    state: SimulationState,
    config: SimConfig,
    lifecycle: Lifecycle,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl Simulation {
    pub fn new(config: SimConfig, now_ms: f64) -> Self {
        Self {
            state: SimulationState::new(config.starting_score, now_ms),
            config,
            lifecycle: Lifecycle::Created,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Begin (or resume) production. Time spent before this call is not
    /// credited. Starting a running simulation changes nothing.
    pub fn start(&mut self, now_ms: f64) -> Result<(), SimError> {
        match self.lifecycle {
            Lifecycle::Disposed => return Err(SimError::Disposed),
            Lifecycle::Running => return Ok(()),
            Lifecycle::Created | Lifecycle::Stopped => {}
        }
        self.state.last_tick_ms = now_ms;
        self.lifecycle = Lifecycle::Running;
        Ok(())
    }

    /// Pause production. Ticks are ignored until [`start`](Self::start).
    pub fn stop(&mut self) {
        if self.lifecycle == Lifecycle::Running {
            self.lifecycle = Lifecycle::Stopped;
        }
    }

    /// Stop for good and drop every subscriber.
    pub fn dispose(&mut self) {
        self.lifecycle = Lifecycle::Disposed;
        self.listeners.clear();
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    // ── Subscriptions ───────────────────────────────────────────

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&Change, &SimulationState) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self, change: Change) {
        for (_, listener) in &mut self.listeners {
            listener(&change, &self.state);
        }
    }

    // ── Commands ────────────────────────────────────────────────

    /// Apply production up to `now_ms`. Ignored unless running.
    pub fn tick(&mut self, now_ms: f64) {
        if !self.is_running() {
            return;
        }
        let producers = logic::tick(&mut self.state, now_ms);
        self.notify(Change::Ticked { producers });
    }

    pub fn add_score(&mut self, amount: Decimal) {
        logic::add_score(&mut self.state, amount);
        self.notify(Change::ScoreAdded(amount));
    }

    /// Buy one factory according to the configured [`PurchasePolicy`].
    pub fn purchase(&mut self, kind: FactoryKind) -> Result<(), SimError> {
        match self.config.purchase_policy {
            PurchasePolicy::Unchecked => logic::purchase(&mut self.state, kind),
            PurchasePolicy::RequireFunds => logic::try_purchase(&mut self.state, kind)?,
        }
        self.notify(Change::Purchased(kind));
        Ok(())
    }

    pub fn reset(&mut self) {
        logic::reset(&mut self.state);
        self.notify(Change::Reset);
    }

    // ── Queries ─────────────────────────────────────────────────

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn score(&self) -> Decimal {
        self.state.score
    }

    pub fn max_score(&self) -> Decimal {
        self.state.max_score
    }

    pub fn number_owned(&self, kind: FactoryKind) -> Option<u32> {
        self.state.number_owned(kind)
    }

    pub fn can_afford(&self, kind: FactoryKind) -> bool {
        self.state.can_afford(kind)
    }

    pub fn should_show(&self, kind: FactoryKind) -> bool {
        self.state.should_show(kind)
    }

    pub fn owns_any(&self, kind: FactoryKind) -> bool {
        self.state.owns_any(kind)
    }
}
