//! Application state snapshot and store
//!
//! The whole session lives in one immutable [`AppState`] value that is
//! wholesale replaced on every transition. [`AppStore`] holds the current
//! snapshot behind an `Arc`, notifies subscribers synchronously on each
//! accepted replacement, and short-circuits on pointer identity so no-op
//! transitions stay silent.

use std::sync::Arc;

use serde::Serialize;

use crate::logic::TimeParts;

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Setup,
    Calculation,
}

/// Which input mode last produced the source power; drives the "active"
/// affordance in the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceSelection {
    Preset,
    Manual,
}

/// Wizard position, meaningful only while `view_mode` is `Calculation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationStep {
    Source,
    Time,
    Result,
}

/// The most recently computed conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalculationResult {
    /// Scaled heating duration for the target appliance, in seconds.
    pub target_seconds: u32,
    /// The entered source duration, normalized for display.
    pub source_preview: TimeParts,
}

/// Single immutable application snapshot.
///
/// Primitive fields (`target_power`, `source_power`, `raw_time_input`) and
/// derived fields (`last_result`, `calculation_step`) are kept consistent
/// by the transition engine; `last_result` is only ever non-`None` when
/// the buffer holds four digits, both powers are set, and the computed
/// duration is positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppState {
    /// Wattage the recipe's instructions assume; `None` before setup.
    pub target_power: Option<u32>,
    /// Wattage of the user's own appliance.
    pub source_power: Option<u32>,
    /// Live, possibly-invalid text in the free-form power field, kept
    /// apart from the validated `source_power`.
    pub manual_source_draft: String,
    /// Keypad digit buffer, 0-4 ASCII digits read as MMSS.
    pub raw_time_input: String,
    pub view_mode: ViewMode,
    pub source_selection: Option<SourceSelection>,
    pub calculation_step: CalculationStep,
    pub last_result: Option<CalculationResult>,
}

impl AppState {
    /// The session-start snapshot: everything unset, setup screen.
    pub fn initial() -> Self {
        Self {
            target_power: None,
            source_power: None,
            manual_source_draft: String::new(),
            raw_time_input: String::new(),
            view_mode: ViewMode::Setup,
            source_selection: None,
            calculation_step: CalculationStep::Source,
            last_result: None,
        }
    }
}

/// Shared handle to one snapshot.
pub type Snapshot = Arc<AppState>;

/// Handle for removing a subscribed listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&AppState)>;

/// Holds the current snapshot and fans out replacements to subscribers.
///
/// Mutation requires `&mut self`, so a listener can never re-enter
/// `set_state` while notifications are still being delivered.
pub struct AppStore {
    current: Snapshot,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl AppStore {
    pub fn new(initial: AppState) -> Self {
        Self {
            current: Arc::new(initial),
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Borrows the current snapshot.
    pub fn state(&self) -> &AppState {
        &self.current
    }

    /// Clones the shared handle to the current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.current)
    }

    /// Replaces the snapshot and notifies every subscriber with the new
    /// value, in registration order, unless `next` is the same allocation
    /// as the current snapshot. The comparison is pointer identity, not
    /// value equality; callers hand back the current `Arc` to signal a
    /// no-op.
    pub fn set_state(&mut self, next: Snapshot) {
        if Arc::ptr_eq(&next, &self.current) {
            return;
        }
        self.current = next;
        tracing::trace!(
            view_mode = ?self.current.view_mode,
            step = ?self.current.calculation_step,
            listeners = self.listeners.len(),
            "state replaced"
        );
        let state = Arc::clone(&self.current);
        for (_, listener) in &mut self.listeners {
            listener(&state);
        }
    }

    /// Applies `f` to the current snapshot and stores the result.
    pub fn update(&mut self, f: impl FnOnce(&Snapshot) -> Snapshot) {
        let next = f(&self.current);
        self.set_state(next);
    }

    /// Applies `f` once and emits at most one notification, however many
    /// fields the transition touches. Multi-field transitions go through
    /// here so subscribers never observe an intermediate snapshot.
    pub fn batch_update(&mut self, f: impl FnOnce(&Snapshot) -> Snapshot) {
        let next = f(&self.current);
        self.set_state(next);
    }

    /// Registers a listener invoked with every snapshot accepted after
    /// this call. Remove it again with [`AppStore::unsubscribe`].
    pub fn subscribe(&mut self, listener: impl FnMut(&AppState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener; returns whether it was still registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }
}
