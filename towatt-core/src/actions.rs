//! State transition engine
//!
//! Every mutation of the session goes through a named operation on
//! [`StateActions`]; nothing else writes to the store. Each operation
//! reads the current snapshot, builds the next one, and applies it
//! through [`AppStore::batch_update`] so subscribers observe one atomic
//! replacement per operation. Calculation problems come back as tagged
//! [`CalculationIssue`] values for the caller to surface; they are never
//! stored and never raised.

use std::sync::Arc;

use serde::Serialize;

use crate::logic::{calculate_target_seconds, parse_raw_time, TIME_DIGITS};
use crate::state::{
    AppState, AppStore, CalculationResult, CalculationStep, Snapshot, SourceSelection, ViewMode,
};

/// Why an evaluation attempt produced no result.
///
/// A tagged outcome, distinct from an error: the snapshot stays
/// internally consistent whichever issue occurred, and user-facing
/// messaging is entirely the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculationIssue {
    /// Source or target power is absent despite a complete time entry.
    MissingInput,
    /// The entered or computed duration is not at least one second.
    NonPositive,
}

impl CalculationIssue {
    /// Stable tag used in telemetry params.
    pub fn as_str(self) -> &'static str {
        match self {
            CalculationIssue::MissingInput => "missing-input",
            CalculationIssue::NonPositive => "non-positive",
        }
    }
}

/// Recognized options for [`StateActions::set_source_power`].
#[derive(Debug, Clone, Copy)]
pub struct SetSourcePowerOptions {
    /// Advance the wizard to the time step after a successful selection.
    /// On by default; the live manual-entry adapter turns it off so
    /// keystrokes never yank the user forward.
    pub auto_advance: bool,
}

impl Default for SetSourcePowerOptions {
    fn default() -> Self {
        Self { auto_advance: true }
    }
}

/// What a [`StateActions::set_source_power`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePowerOutcome {
    /// Whether the stored power actually changed.
    pub has_changed: bool,
    /// Issue from the evaluation this call may have re-run.
    pub issue: Option<CalculationIssue>,
}

/// The transition engine. Owns the store; exactly one per session.
pub struct StateActions {
    store: AppStore,
}

/// Hands back the current `Arc` when the computed snapshot is value-equal
/// to it, so no-op transitions hit the store's identity short-circuit.
fn commit(current: &Snapshot, next: AppState) -> Snapshot {
    if next == **current {
        Arc::clone(current)
    } else {
        Arc::new(next)
    }
}

/// Shared evaluation: decides whether the snapshot's primitive fields
/// yield a result, updating `last_result` (and, on success, the wizard
/// step) in place.
///
/// An incomplete buffer is not an issue, just "not ready yet"; every
/// failure path clears any stale result in the same transition.
fn evaluate(state: &mut AppState) -> Option<CalculationIssue> {
    if state.raw_time_input.len() != TIME_DIGITS {
        state.last_result = None;
        return None;
    }
    let (Some(source_power), Some(target_power)) = (state.source_power, state.target_power)
    else {
        state.last_result = None;
        return Some(CalculationIssue::MissingInput);
    };

    let source_time = parse_raw_time(&state.raw_time_input);
    if source_time.total_seconds == 0 {
        state.last_result = None;
        return Some(CalculationIssue::NonPositive);
    }

    let target_seconds =
        calculate_target_seconds(source_power, target_power, source_time.total_seconds);
    if target_seconds == 0 {
        state.last_result = None;
        return Some(CalculationIssue::NonPositive);
    }

    state.last_result = Some(CalculationResult {
        target_seconds,
        source_preview: source_time,
    });
    if state.view_mode == ViewMode::Calculation
        && state.calculation_step != CalculationStep::Result
    {
        state.calculation_step = CalculationStep::Result;
    }
    None
}

impl StateActions {
    pub fn new(store: AppStore) -> Self {
        Self { store }
    }

    /// Borrows the current snapshot.
    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AppStore {
        &mut self.store
    }

    /// Confirms the wattage the recipe assumes and enters calculation
    /// mode at the source step. A different target invalidates the whole
    /// downstream computation, so every other field is reset.
    pub fn set_target_power(&mut self, value: u32) {
        tracing::debug!(target_power = value, "target power set");
        self.store.batch_update(|_current| {
            Arc::new(AppState {
                target_power: Some(value),
                source_power: None,
                manual_source_draft: String::new(),
                raw_time_input: String::new(),
                view_mode: ViewMode::Calculation,
                source_selection: None,
                calculation_step: CalculationStep::Source,
                last_result: None,
            })
        });
    }

    /// Entry point for a launch-argument target; same contract as
    /// [`StateActions::set_target_power`].
    pub fn initialize_from_target(&mut self, value: u32) {
        self.set_target_power(value);
    }

    /// Records which input mode is active; touches nothing else.
    pub fn set_source_selection(&mut self, selection: Option<SourceSelection>) {
        self.store.batch_update(|current| {
            if current.source_selection == selection {
                return Arc::clone(current);
            }
            let mut next = AppState::clone(current);
            next.source_selection = selection;
            Arc::new(next)
        });
    }

    /// Stores the free-form field's text verbatim, valid or not.
    pub fn set_manual_source_draft(&mut self, text: &str) {
        self.store.batch_update(|current| {
            if current.manual_source_draft == text {
                return Arc::clone(current);
            }
            let mut next = AppState::clone(current);
            next.manual_source_draft = text.to_owned();
            Arc::new(next)
        });
    }

    /// Applies a validated source power (or clears it with `None`).
    ///
    /// Clearing always drops the result and returns the wizard to the
    /// source step, leaving the typed digits in place. A *different*
    /// power drops the digits too, since they were scoped to the old
    /// power. Re-confirming the same power over a complete buffer re-runs
    /// the evaluation and folds its issue into the outcome.
    pub fn set_source_power(
        &mut self,
        power: Option<u32>,
        options: SetSourcePowerOptions,
    ) -> SourcePowerOutcome {
        let mut outcome = SourcePowerOutcome {
            has_changed: false,
            issue: None,
        };
        self.store.batch_update(|current| {
            let has_changed = current.source_power != power;
            outcome.has_changed = has_changed;

            let mut next = AppState::clone(current);
            if power.is_none() {
                next.last_result = None;
                if next.view_mode == ViewMode::Calculation {
                    next.calculation_step = CalculationStep::Source;
                }
            } else if has_changed {
                next.raw_time_input.clear();
                next.last_result = None;
                if next.view_mode == ViewMode::Calculation
                    && next.calculation_step == CalculationStep::Result
                {
                    next.calculation_step = CalculationStep::Time;
                }
            }
            next.source_power = power;

            if power.is_none() || !options.auto_advance {
                return commit(current, next);
            }

            if next.view_mode == ViewMode::Calculation
                && next.calculation_step != CalculationStep::Time
            {
                next.calculation_step = CalculationStep::Time;
            }

            if !has_changed && next.raw_time_input.len() == TIME_DIGITS {
                outcome.issue = evaluate(&mut next);
            }
            commit(current, next)
        });
        outcome
    }

    /// Appends one digit to the time buffer. A full buffer ignores the
    /// keystroke; reaching four digits runs the evaluation and hands its
    /// issue back.
    pub fn append_digit(&mut self, digit: char) -> Option<CalculationIssue> {
        let mut issue = None;
        self.store.batch_update(|current| {
            if !digit.is_ascii_digit() || current.raw_time_input.len() >= TIME_DIGITS {
                return Arc::clone(current);
            }
            let mut next = AppState::clone(current);
            next.raw_time_input.push(digit);
            next.last_result = None;
            if next.raw_time_input.len() == TIME_DIGITS {
                issue = evaluate(&mut next);
            }
            Arc::new(next)
        });
        issue
    }

    /// Drops the last digit of the buffer, if any, and with it any result.
    pub fn remove_last_digit(&mut self) {
        self.store.batch_update(|current| {
            if current.raw_time_input.is_empty() {
                return Arc::clone(current);
            }
            let mut next = AppState::clone(current);
            next.raw_time_input.pop();
            next.last_result = None;
            Arc::new(next)
        });
    }

    /// Empties the buffer and clears the result; from the result step
    /// this also steps back to time entry.
    pub fn clear_raw_input(&mut self) {
        self.store.batch_update(|current| {
            let mut next = AppState::clone(current);
            next.raw_time_input.clear();
            next.last_result = None;
            if next.view_mode == ViewMode::Calculation
                && next.calculation_step == CalculationStep::Result
            {
                next.calculation_step = CalculationStep::Time;
            }
            commit(current, next)
        });
    }

    /// Re-runs the evaluation against the current snapshot without
    /// touching any input. Calling it twice in a row yields the same
    /// result and the same issue both times.
    pub fn attempt_calculation(&mut self) -> Option<CalculationIssue> {
        let mut issue = None;
        self.store.batch_update(|current| {
            let mut next = AppState::clone(current);
            issue = evaluate(&mut next);
            commit(current, next)
        });
        issue
    }

    /// Jumps to a wizard step; meaningful only in calculation mode.
    pub fn go_to_step(&mut self, step: CalculationStep) {
        self.store.batch_update(|current| {
            if current.view_mode != ViewMode::Calculation || current.calculation_step == step {
                return Arc::clone(current);
            }
            let mut next = AppState::clone(current);
            next.calculation_step = step;
            Arc::new(next)
        });
    }

    /// Clears everything downstream of the target power and returns the
    /// wizard to source selection.
    pub fn reset_to_source_selection(&mut self) {
        self.store.batch_update(|current| {
            let mut next = AppState::clone(current);
            next.source_selection = None;
            next.manual_source_draft.clear();
            next.source_power = None;
            next.raw_time_input.clear();
            next.last_result = None;
            if next.view_mode == ViewMode::Calculation {
                next.calculation_step = CalculationStep::Source;
            }
            commit(current, next)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    const TARGET_POWER: u32 = 600;
    const SOURCE_POWER: u32 = 500;

    fn actions() -> StateActions {
        StateActions::new(AppStore::new(AppState::initial()))
    }

    fn set_source(actions: &mut StateActions, power: u32) -> SourcePowerOutcome {
        actions.set_source_power(Some(power), SetSourcePowerOptions::default())
    }

    fn type_digits(actions: &mut StateActions, digits: &str) -> Option<CalculationIssue> {
        let mut issue = None;
        for digit in digits.chars() {
            issue = actions.append_digit(digit);
        }
        issue
    }

    /// A result only ever coexists with a full buffer, both powers, and
    /// a positive duration.
    fn assert_consistent(state: &AppState) {
        if let Some(result) = &state.last_result {
            assert_eq!(state.raw_time_input.len(), TIME_DIGITS);
            assert!(state.source_power.is_some());
            assert!(state.target_power.is_some());
            assert!(result.target_seconds > 0);
        }
    }

    #[test]
    fn set_target_power_enters_calculation_and_resets_inputs() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);

        let state = actions.state();
        assert_eq!(state.view_mode, ViewMode::Calculation);
        assert_eq!(state.calculation_step, CalculationStep::Source);
        assert_eq!(state.target_power, Some(TARGET_POWER));
        assert_eq!(state.source_power, None);
        assert_eq!(state.raw_time_input, "");
    }

    #[test]
    fn changing_target_power_resets_everything_downstream() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        set_source(&mut actions, SOURCE_POWER);
        type_digits(&mut actions, "1234");

        actions.set_target_power(700);

        let state = actions.state();
        assert_eq!(state.target_power, Some(700));
        assert_eq!(state.source_power, None);
        assert_eq!(state.source_selection, None);
        assert_eq!(state.manual_source_draft, "");
        assert_eq!(state.raw_time_input, "");
        assert_eq!(state.last_result, None);
        assert_eq!(state.calculation_step, CalculationStep::Source);
    }

    #[test]
    fn set_source_power_advances_to_the_time_step() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        let outcome = set_source(&mut actions, SOURCE_POWER);

        assert!(outcome.has_changed);
        assert_eq!(outcome.issue, None);
        let state = actions.state();
        assert_eq!(state.source_power, Some(SOURCE_POWER));
        assert_eq!(state.calculation_step, CalculationStep::Time);
    }

    #[test]
    fn auto_advance_off_leaves_the_step_alone() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        let outcome = actions.set_source_power(
            Some(SOURCE_POWER),
            SetSourcePowerOptions {
                auto_advance: false,
            },
        );

        assert!(outcome.has_changed);
        assert_eq!(actions.state().source_power, Some(SOURCE_POWER));
        assert_eq!(actions.state().calculation_step, CalculationStep::Source);
    }

    #[test]
    fn fourth_digit_computes_the_result_and_advances() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        set_source(&mut actions, SOURCE_POWER);

        let issue = type_digits(&mut actions, "1234");

        assert_eq!(issue, None);
        let state = actions.state();
        assert_eq!(state.raw_time_input, "1234");
        assert_eq!(state.calculation_step, CalculationStep::Result);
        // parse("1234") = 754 s; round(500/600 * 754) = 628
        let result = state.last_result.expect("result");
        assert_eq!(result.target_seconds, 628);
        assert_eq!(result.source_preview.total_seconds, 754);
        assert_consistent(state);
    }

    #[test]
    fn complete_buffer_without_source_power_reports_missing_input() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);

        assert_eq!(actions.append_digit('0'), None);
        assert_eq!(actions.append_digit('0'), None);
        assert_eq!(actions.append_digit('0'), None);
        assert_eq!(
            actions.append_digit('0'),
            Some(CalculationIssue::MissingInput)
        );
        assert_eq!(actions.state().last_result, None);
        assert_consistent(actions.state());
    }

    #[test]
    fn zero_duration_reports_non_positive() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        set_source(&mut actions, SOURCE_POWER);

        let issue = type_digits(&mut actions, "0000");

        assert_eq!(issue, Some(CalculationIssue::NonPositive));
        let state = actions.state();
        assert_eq!(state.last_result, None);
        assert_eq!(state.calculation_step, CalculationStep::Time);
    }

    #[test]
    fn appending_past_four_digits_is_a_no_op() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        set_source(&mut actions, SOURCE_POWER);
        type_digits(&mut actions, "1234");

        assert_eq!(actions.append_digit('5'), None);
        assert_eq!(actions.state().raw_time_input, "1234");
        assert!(actions.state().last_result.is_some());
    }

    #[test]
    fn non_digit_characters_are_ignored() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        actions.append_digit('x');
        assert_eq!(actions.state().raw_time_input, "");
    }

    #[test]
    fn remove_last_digit_pops_and_clears_the_result() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        set_source(&mut actions, SOURCE_POWER);
        type_digits(&mut actions, "1234");

        actions.remove_last_digit();

        let state = actions.state();
        assert_eq!(state.raw_time_input, "123");
        assert_eq!(state.last_result, None);
        assert_consistent(state);
    }

    #[test]
    fn clear_raw_input_after_a_result_steps_back_to_time() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        set_source(&mut actions, SOURCE_POWER);
        type_digits(&mut actions, "1234");

        actions.clear_raw_input();

        let state = actions.state();
        assert_eq!(state.raw_time_input, "");
        assert_eq!(state.last_result, None);
        assert_eq!(state.calculation_step, CalculationStep::Time);
    }

    #[test]
    fn clearing_source_power_keeps_digits_but_returns_to_source_step() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        set_source(&mut actions, SOURCE_POWER);
        type_digits(&mut actions, "1234");

        let outcome = actions.set_source_power(None, SetSourcePowerOptions::default());

        assert!(outcome.has_changed);
        assert_eq!(outcome.issue, None);
        let state = actions.state();
        assert_eq!(state.source_power, None);
        assert_eq!(state.raw_time_input, "1234");
        assert_eq!(state.last_result, None);
        assert_eq!(state.calculation_step, CalculationStep::Source);
        assert_consistent(state);
    }

    #[test]
    fn a_different_source_power_drops_the_typed_digits() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        set_source(&mut actions, SOURCE_POWER);
        type_digits(&mut actions, "1234");

        let outcome = set_source(&mut actions, 700);

        assert!(outcome.has_changed);
        let state = actions.state();
        assert_eq!(state.source_power, Some(700));
        assert_eq!(state.raw_time_input, "");
        assert_eq!(state.last_result, None);
        assert_eq!(state.calculation_step, CalculationStep::Time);
    }

    #[test]
    fn reconfirming_the_same_power_re_evaluates_a_full_buffer() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        set_source(&mut actions, SOURCE_POWER);
        type_digits(&mut actions, "0000");
        assert_eq!(actions.state().last_result, None);

        let outcome = set_source(&mut actions, SOURCE_POWER);

        assert!(!outcome.has_changed);
        assert_eq!(outcome.issue, Some(CalculationIssue::NonPositive));
    }

    #[test]
    fn attempt_calculation_is_idempotent() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        set_source(&mut actions, SOURCE_POWER);
        type_digits(&mut actions, "0130");

        let first = actions.attempt_calculation();
        let result_after_first = actions.state().last_result;
        let second = actions.attempt_calculation();

        assert_eq!(first, None);
        assert_eq!(second, None);
        assert_eq!(actions.state().last_result, result_after_first);
        // round(500/600 * 90) = 75
        assert_eq!(result_after_first.expect("result").target_seconds, 75);
    }

    #[test]
    fn attempt_calculation_with_short_buffer_is_silent() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        set_source(&mut actions, SOURCE_POWER);
        type_digits(&mut actions, "12");

        assert_eq!(actions.attempt_calculation(), None);
        assert_eq!(actions.state().last_result, None);
    }

    #[test]
    fn go_to_step_only_applies_in_calculation_mode() {
        let mut actions = actions();
        actions.go_to_step(CalculationStep::Time);
        assert_eq!(actions.state().calculation_step, CalculationStep::Source);

        actions.set_target_power(TARGET_POWER);
        actions.go_to_step(CalculationStep::Time);
        assert_eq!(actions.state().calculation_step, CalculationStep::Time);
    }

    #[test]
    fn reset_to_source_selection_clears_the_downstream_fields() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        actions.set_source_selection(Some(SourceSelection::Manual));
        actions.set_manual_source_draft("800");
        set_source(&mut actions, 800);
        type_digits(&mut actions, "0200");

        actions.reset_to_source_selection();

        let state = actions.state();
        assert_eq!(state.target_power, Some(TARGET_POWER));
        assert_eq!(state.source_selection, None);
        assert_eq!(state.manual_source_draft, "");
        assert_eq!(state.source_power, None);
        assert_eq!(state.raw_time_input, "");
        assert_eq!(state.last_result, None);
        assert_eq!(state.calculation_step, CalculationStep::Source);
    }

    #[test]
    fn source_selection_and_draft_touch_nothing_else() {
        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        set_source(&mut actions, SOURCE_POWER);

        actions.set_source_selection(Some(SourceSelection::Preset));
        actions.set_manual_source_draft("12");

        let state = actions.state();
        assert_eq!(state.source_selection, Some(SourceSelection::Preset));
        assert_eq!(state.manual_source_draft, "12");
        assert_eq!(state.source_power, Some(SOURCE_POWER));
        assert_eq!(state.calculation_step, CalculationStep::Time);
    }

    #[test]
    fn initialize_from_target_matches_set_target_power() {
        let mut actions = actions();
        actions.initialize_from_target(800);

        let state = actions.state();
        assert_eq!(state.target_power, Some(800));
        assert_eq!(state.view_mode, ViewMode::Calculation);
        assert_eq!(state.calculation_step, CalculationStep::Source);
    }

    #[test]
    fn no_op_operations_do_not_notify_subscribers() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut actions = actions();
        actions.set_target_power(TARGET_POWER);
        set_source(&mut actions, SOURCE_POWER);

        let count = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&count);
        actions.store_mut().subscribe(move |_| *sink.borrow_mut() += 1);

        let unchanged_selection = actions.state().source_selection;
        actions.set_source_selection(unchanged_selection);
        actions.set_manual_source_draft("");
        actions.remove_last_digit();
        actions.clear_raw_input();
        actions.append_digit('x');
        actions.go_to_step(CalculationStep::Time);

        assert_eq!(*count.borrow(), 0);
    }
}
