//! Launch-target resolution
//!
//! The desktop counterpart of the original URL `target` parameter: an
//! explicit `--target` argument wins, otherwise the wattage remembered in
//! the config is reused. Invalid values are discarded, and a stale
//! remembered value is scrubbed from the config so it is not offered
//! again (the caller persists the change).

use towatt_core::is_valid_power;

use crate::config::AppConfig;

/// What `--target` parsing found on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetArg {
    Absent,
    Invalid,
    Valid(u32),
}

fn parse_target_arg(args: impl IntoIterator<Item = String>) -> TargetArg {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let raw = if let Some(value) = arg.strip_prefix("--target=") {
            Some(value.to_owned())
        } else if arg == "--target" {
            args.next()
        } else {
            continue;
        };
        return match raw.and_then(|value| value.trim().parse::<u32>().ok()) {
            Some(value) if is_valid_power(value) => TargetArg::Valid(value),
            _ => TargetArg::Invalid,
        };
    }
    TargetArg::Absent
}

/// Resolve the wattage the session should open with, if any.
pub fn resolve_initial_target(
    args: impl IntoIterator<Item = String>,
    config: &mut AppConfig,
) -> Option<u32> {
    match parse_target_arg(args) {
        TargetArg::Valid(value) => Some(value),
        // A requested-but-invalid target starts a fresh session at the
        // setup screen, exactly as an invalid URL parameter did.
        TargetArg::Invalid => None,
        TargetArg::Absent => match config.last_target_power {
            Some(value) if is_valid_power(value) => Some(value),
            Some(stale) => {
                tracing::warn!(stale, "scrubbing invalid remembered target power");
                config.clear_target();
                None
            }
            None => None,
        },
    }
}
