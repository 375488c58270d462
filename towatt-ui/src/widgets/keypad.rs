//! Keypad widget
//!
//! The digit-at-a-time entry grid for the heating-time buffer: digits
//! 0-9 plus clear and backspace, phone-keypad layout.

use cosmic::iced::Length;
use cosmic::widget;
use cosmic::Element;

use crate::fl;

/// A single keypad press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadKey {
    Digit(char),
    Backspace,
    Clear,
}

const LAYOUT: [[KeypadKey; 3]; 4] = [
    [
        KeypadKey::Digit('1'),
        KeypadKey::Digit('2'),
        KeypadKey::Digit('3'),
    ],
    [
        KeypadKey::Digit('4'),
        KeypadKey::Digit('5'),
        KeypadKey::Digit('6'),
    ],
    [
        KeypadKey::Digit('7'),
        KeypadKey::Digit('8'),
        KeypadKey::Digit('9'),
    ],
    [
        KeypadKey::Clear,
        KeypadKey::Digit('0'),
        KeypadKey::Backspace,
    ],
];

/// Keypad component
pub struct Keypad<'a, M> {
    on_press: Box<dyn Fn(KeypadKey) -> M + 'a>,
}

impl<'a, M: Clone + 'a> Keypad<'a, M> {
    pub fn new(on_press: impl Fn(KeypadKey) -> M + 'a) -> Self {
        Self {
            on_press: Box::new(on_press),
        }
    }

    pub fn view(self) -> Element<'a, M> {
        let mut grid = widget::column().spacing(8);
        for row in LAYOUT {
            let mut line = widget::row().spacing(8);
            for key in row {
                let label = match key {
                    KeypadKey::Digit(digit) => digit.to_string(),
                    KeypadKey::Backspace => fl!("keypad-backspace"),
                    KeypadKey::Clear => fl!("keypad-clear"),
                };
                line = line.push(
                    widget::button::standard(label)
                        .on_press((self.on_press)(key))
                        .width(Length::Fixed(88.0)),
                );
            }
            grid = grid.push(line);
        }
        grid.into()
    }
}
