//! Privacy policy dialog
//!
//! Explains what the local telemetry log records and why.

use cosmic::widget;
use cosmic::Element;

use crate::fl;

/// Messages for the privacy dialog
#[derive(Debug, Clone)]
pub enum PrivacyMessage {
    Close,
}

pub fn view<'a>() -> Element<'a, PrivacyMessage> {
    let body = format!(
        "{}\n\n{}\n{}\n\n{}\n{}",
        fl!("privacy-body"),
        fl!("privacy-collect-title"),
        fl!("privacy-collect-body"),
        fl!("privacy-purpose-title"),
        fl!("privacy-purpose-body"),
    );

    widget::dialog()
        .title(fl!("privacy-title"))
        .body(body)
        .primary_action(
            widget::button::suggested(fl!("privacy-close")).on_press(PrivacyMessage::Close),
        )
        .into()
}
