//! Time buffer display
//!
//! Four fixed-width digit cells read as MMSS, with a colon between the
//! minute and second pairs. The next cell to be filled shows an
//! underscore cursor; a full buffer shows no cursor.

use cosmic::iced::widget::text;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{self, container};
use cosmic::Element;

use towatt_core::TIME_DIGITS;

/// Digit cell display component
pub struct TimeDisplay<'a> {
    raw: &'a str,
}

impl<'a> TimeDisplay<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    pub fn view<M: 'a>(self) -> Element<'a, M> {
        let active_index = (self.raw.len() < TIME_DIGITS).then_some(self.raw.len());

        let mut cells = widget::row().spacing(8).align_y(Alignment::Center);
        for index in 0..TIME_DIGITS {
            if index == TIME_DIGITS / 2 {
                cells = cells.push(text(":").size(32));
            }
            let display = match self.raw.chars().nth(index) {
                Some(digit) => digit.to_string(),
                None if active_index == Some(index) => "_".to_string(),
                None => "\u{00A0}".to_string(),
            };
            let mut cell = container(text(display).size(32))
                .padding(8)
                .width(Length::Fixed(48.0))
                .align_x(Alignment::Center);
            if active_index == Some(index) {
                cell = cell.class(cosmic::theme::Container::Card);
            }
            cells = cells.push(cell);
        }
        cells.into()
    }
}
