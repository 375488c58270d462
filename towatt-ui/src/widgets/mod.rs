//! Reusable view components

mod keypad;
mod time_display;

pub use keypad::{Keypad, KeypadKey};
pub use time_display::TimeDisplay;
