//! Telemetry event emission
//!
//! Every signal is a structured `tracing` event on the
//! `towatt::telemetry` target, either fired directly by the adapters from
//! an operation's return value, or derived by [`observe_store`] from
//! snapshot changes. The core itself performs no I/O.

use serde_json::json;

use towatt_core::{AppState, AppStore, CalculationIssue, SourceSelection, SubscriptionId};

fn track_event(event: &str, params: serde_json::Value) {
    tracing::info!(target: "towatt::telemetry", event, %params);
}

pub fn track_target_power_confirmed(value: u32, source: &str) {
    track_event(
        "target_power_set",
        json!({ "target_power": value, "source": source }),
    );
}

pub fn track_source_power_selected(method: &str, value: u32, changed: bool) {
    track_event(
        "source_power_selected",
        json!({ "method": method, "source_power": value, "changed": changed }),
    );
}

pub fn track_source_power_cleared(reason: &str) {
    track_event("source_power_cleared", json!({ "reason": reason }));
}

pub fn track_source_power_invalid(reason: &str) {
    track_event("source_power_invalid", json!({ "reason": reason }));
}

pub fn track_keypad_interaction(action: &str, detail: &str) {
    track_event(
        "keypad_interaction",
        json!({ "action": action, "detail": detail }),
    );
}

pub fn track_calculation_issue(issue: CalculationIssue) {
    track_event("calculation_issue", json!({ "issue": issue.as_str() }));
}

pub fn track_calculation_reset(trigger: &str) {
    track_event("calculation_reset", json!({ "trigger": trigger }));
}

pub fn track_error_shown(message: &str) {
    track_event("ui_error_shown", json!({ "message": message }));
}

pub fn track_privacy_dialog(action: &str, reason: Option<&str>) {
    track_event(
        "privacy_dialog",
        json!({ "action": action, "reason": reason }),
    );
}

/// Subscribe a diffing observer that turns snapshot changes into events.
/// The first notification reports the snapshot as-is; later ones report
/// only what changed.
pub fn observe_store(store: &mut AppStore) -> SubscriptionId {
    let mut previous: Option<AppState> = None;
    store.subscribe(move |state| {
        match previous.as_ref() {
            None => emit_initial(state),
            Some(previous) => emit_changes(previous, state),
        }
        previous = Some(state.clone());
    })
}

fn emit_initial(state: &AppState) {
    track_event("view_mode_changed", json!({ "view_mode": state.view_mode }));
    track_event(
        "calculation_step_changed",
        json!({ "step": state.calculation_step, "view_mode": state.view_mode }),
    );
    track_event(
        "source_selection_changed",
        json!({ "selection": selection_tag(state.source_selection) }),
    );
}

fn emit_changes(previous: &AppState, state: &AppState) {
    if state.view_mode != previous.view_mode {
        track_event("view_mode_changed", json!({ "view_mode": state.view_mode }));
    }
    if state.calculation_step != previous.calculation_step {
        track_event(
            "calculation_step_changed",
            json!({ "step": state.calculation_step, "view_mode": state.view_mode }),
        );
    }
    if state.source_selection != previous.source_selection {
        track_event(
            "source_selection_changed",
            json!({ "selection": selection_tag(state.source_selection) }),
        );
    }
    if state.last_result != previous.last_result {
        if let Some(result) = &state.last_result {
            track_event(
                "calculation_completed",
                json!({
                    "target_power": state.target_power,
                    "source_power": state.source_power,
                    "source_seconds": result.source_preview.total_seconds,
                    "target_seconds": result.target_seconds,
                }),
            );
        }
    }
    if state.raw_time_input != previous.raw_time_input {
        track_event(
            "time_input_updated",
            json!({
                "length": state.raw_time_input.len(),
                "delta": state.raw_time_input.len() as i64 - previous.raw_time_input.len() as i64,
            }),
        );
    }
}

fn selection_tag(selection: Option<SourceSelection>) -> &'static str {
    match selection {
        Some(SourceSelection::Preset) => "preset",
        Some(SourceSelection::Manual) => "manual",
        None => "none",
    }
}
