//! Pure conversion logic
//!
//! Stateless helpers shared by the transition engine and the shell:
//! power validation, raw keypad-buffer parsing, the inverse-power-ratio
//! scaling itself, and clock formatting. Everything here is a total
//! function over its documented input domain.

use serde::Serialize;
use thiserror::Error;

/// Lowest appliance power rating accepted, in watts.
pub const POWER_MIN: u32 = 100;

/// Highest appliance power rating accepted, in watts.
pub const POWER_MAX: u32 = 3000;

/// Width of the keypad time buffer: two digits of minutes, two of seconds.
pub const TIME_DIGITS: usize = 4;

/// Preset wattages offered for the source appliance, as shipped.
pub const PRESET_POWERS: [u32; 4] = [1500, 700, 600, 500];

/// A heating duration split into clock parts.
///
/// `minutes`/`seconds` are the normalized form (`seconds < 60`);
/// `total_seconds` is the duration they both describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeParts {
    pub minutes: u32,
    pub seconds: u32,
    pub total_seconds: u32,
}

/// Why a free-form power entry was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PowerParseError {
    /// The text is not a whole number of watts.
    #[error("not a whole number of watts")]
    NotNumeric,
    /// The value is outside [`POWER_MIN`]..=[`POWER_MAX`].
    #[error("outside the accepted range of {POWER_MIN}-{POWER_MAX} watts")]
    OutOfRange,
}

impl PowerParseError {
    /// Stable tag used in telemetry params.
    pub fn as_str(self) -> &'static str {
        match self {
            PowerParseError::NotNumeric => "non_numeric",
            PowerParseError::OutOfRange => "out_of_range",
        }
    }
}

/// The single gate for every power input: preset, manual, or launch-sourced.
pub fn is_valid_power(value: u32) -> bool {
    (POWER_MIN..=POWER_MAX).contains(&value)
}

/// Parses free-form text into a validated power rating.
///
/// Trims surrounding whitespace, requires a whole number (so "500.5" is
/// [`PowerParseError::NotNumeric`], matching the integer gate of
/// [`is_valid_power`]), then range-checks.
pub fn parse_power(text: &str) -> Result<u32, PowerParseError> {
    let value: u32 = text
        .trim()
        .parse()
        .map_err(|_| PowerParseError::NotNumeric)?;
    if is_valid_power(value) {
        Ok(value)
    } else {
        Err(PowerParseError::OutOfRange)
    }
}

/// Parses the raw keypad buffer into normalized clock parts.
///
/// The buffer is left-padded with `'0'` to [`TIME_DIGITS`]; the first two
/// characters are the minutes field and the last two the seconds field.
/// This is intentionally not a carry-safe clock parser: a seconds field of
/// 60-99 is accepted and rolls into minutes during normalization, so
/// "0199" means 1 min 99 s = 159 s and comes back as 2:39.
///
/// Total over any string of 0-4 ASCII digits.
pub fn parse_raw_time(raw: &str) -> TimeParts {
    debug_assert!(raw.len() <= TIME_DIGITS);
    debug_assert!(raw.chars().all(|c| c.is_ascii_digit()));

    let padded = format!("{:0>width$}", raw, width = TIME_DIGITS);
    let (minutes_field, seconds_field) = padded.split_at(2);
    let minutes_field: u32 = minutes_field.parse().unwrap_or(0);
    let seconds_field: u32 = seconds_field.parse().unwrap_or(0);

    let total_seconds = minutes_field * 60 + seconds_field;
    TimeParts {
        minutes: total_seconds / 60,
        seconds: total_seconds % 60,
        total_seconds,
    }
}

/// Scales a heating duration from the source appliance to the target one.
///
/// Holding delivered energy constant, required time scales inversely with
/// the power ratio: `round(source_power / target_power * source_seconds)`,
/// rounding halves away from zero.
pub fn calculate_target_seconds(source_power: u32, target_power: u32, source_seconds: u32) -> u32 {
    let scaled = f64::from(source_power) / f64::from(target_power) * f64::from(source_seconds);
    scaled.round() as u32
}

/// Renders clock parts as `MM:SS`, zero-padded to two digits each.
///
/// Minutes beyond 99 simply widen the field.
pub fn format_clock(minutes: u32, seconds: u32) -> String {
    format!("{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_bounds_are_inclusive() {
        assert!(!is_valid_power(99));
        assert!(is_valid_power(100));
        assert!(is_valid_power(3000));
        assert!(!is_valid_power(3001));
    }

    #[test]
    fn parse_power_accepts_trimmed_integers() {
        assert_eq!(parse_power("600"), Ok(600));
        assert_eq!(parse_power("  800 "), Ok(800));
    }

    #[test]
    fn parse_power_rejects_non_numeric_text() {
        assert_eq!(parse_power(""), Err(PowerParseError::NotNumeric));
        assert_eq!(parse_power("watts"), Err(PowerParseError::NotNumeric));
        assert_eq!(parse_power("500.5"), Err(PowerParseError::NotNumeric));
        assert_eq!(parse_power("-600"), Err(PowerParseError::NotNumeric));
    }

    #[test]
    fn parse_power_rejects_out_of_range_values() {
        assert_eq!(parse_power("99"), Err(PowerParseError::OutOfRange));
        assert_eq!(parse_power("3001"), Err(PowerParseError::OutOfRange));
    }

    #[test]
    fn parse_raw_time_pads_short_input() {
        let parts = parse_raw_time("90");
        assert_eq!(
            parts,
            TimeParts {
                minutes: 1,
                seconds: 30,
                total_seconds: 90
            }
        );
    }

    #[test]
    fn parse_raw_time_splits_minutes_and_seconds() {
        let parts = parse_raw_time("1234");
        assert_eq!(
            parts,
            TimeParts {
                minutes: 12,
                seconds: 34,
                total_seconds: 754
            }
        );
    }

    #[test]
    fn parse_raw_time_rolls_overflowing_seconds_into_minutes() {
        // Two independent 2-digit fields, not a carry-checked clock.
        let parts = parse_raw_time("0199");
        assert_eq!(parts.total_seconds, 159);
        assert_eq!(parts.minutes, 2);
        assert_eq!(parts.seconds, 39);
    }

    #[test]
    fn parse_raw_time_of_empty_buffer_is_zero() {
        assert_eq!(parse_raw_time("").total_seconds, 0);
    }

    #[test]
    fn scaling_matches_inverse_power_ratio() {
        assert_eq!(calculate_target_seconds(500, 600, 180), 150);
        assert_eq!(calculate_target_seconds(600, 1000, 90), 54);
    }

    #[test]
    fn scaling_rounds_half_away_from_zero() {
        // 700/600 * 10 = 11.67, 600/700 * 10 = 8.57
        assert_eq!(calculate_target_seconds(700, 600, 10), 12);
        assert_eq!(calculate_target_seconds(600, 700, 10), 9);
    }

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(format_clock(2, 5), "02:05");
        assert_eq!(format_clock(0, 0), "00:00");
    }

    #[test]
    fn clock_minutes_may_exceed_two_digits() {
        assert_eq!(format_clock(120, 3), "120:03");
    }

    #[test]
    fn parse_then_format_round_trips() {
        let parts = parse_raw_time("0190");
        assert_eq!(format_clock(parts.minutes, parts.seconds), "02:30");
    }
}
