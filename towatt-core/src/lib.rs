//! Towatt core - business logic for the wattage/time converter
//!
//! This crate contains the whole application model with zero UI
//! dependencies: the pure conversion math, the immutable state snapshot
//! with its subscriber store, and the named transitions that drive the
//! setup/calculation wizard. The GUI shell is a projection of this model
//! and feeds it exclusively through [`actions::StateActions`].

pub mod actions;
pub mod logic;
pub mod state;

pub use actions::{CalculationIssue, SetSourcePowerOptions, SourcePowerOutcome, StateActions};
pub use logic::{
    calculate_target_seconds, format_clock, is_valid_power, parse_power, parse_raw_time,
    PowerParseError, TimeParts, POWER_MAX, POWER_MIN, PRESET_POWERS, TIME_DIGITS,
};
pub use state::{
    AppState, AppStore, CalculationResult, CalculationStep, Snapshot, SourceSelection,
    SubscriptionId, ViewMode,
};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
