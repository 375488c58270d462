//! Main COSMIC Application
//!
//! The shell around the core model: `update` translates UI events into
//! named transition operations and routes returned issues to the error
//! banner and telemetry; `view` is a pure projection of the current
//! snapshot. No conversion rule lives here.

use cosmic::app::{Core, Task};
use cosmic::iced::widget::text;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{self, container, text_input};
use cosmic::{Application, Element};

use towatt_core::{
    format_clock, parse_power, parse_raw_time, AppState, AppStore, CalculationIssue,
    CalculationStep, SetSourcePowerOptions, SourceSelection, StateActions, ViewMode,
    PRESET_POWERS, TIME_DIGITS,
};

use crate::analytics;
use crate::config::AppConfig;
use crate::dialogs::privacy::{self, PrivacyMessage};
use crate::fl;
use crate::notifications::{Banner, NOTICE_DURATION_MS};
use crate::widgets::{Keypad, KeypadKey, TimeDisplay};

/// Application ID following reverse-DNS convention
const APP_ID: &str = "io.github.towatt.Towatt";

/// Application state
pub struct App {
    /// COSMIC runtime core
    core: Core,
    /// The transition engine; owns the state store
    actions: StateActions,
    /// Application configuration
    config: AppConfig,
    /// Setup form draft, owned by the adapter like the original DOM field
    setup_draft: String,
    /// Error banner with auto-hide bookkeeping
    banner: Banner,
    /// Privacy dialog visibility
    privacy_open: bool,
}

/// Application messages
#[derive(Debug, Clone)]
pub enum Message {
    // Setup form
    SetupTargetChanged(String),
    SetupSubmitted,

    // Source power selection
    PresetPressed(u32),
    ManualSourceChanged(String),
    ManualSourceSubmitted,

    // Time entry
    Keypad(KeypadKey),

    // Result step
    EditSourcePressed,

    // Privacy dialog
    PrivacyOpened,
    Privacy(PrivacyMessage),

    // Banner auto-hide
    BannerExpired(u64),
}

/// Application startup flags
#[derive(Debug, Default)]
pub struct Flags {
    pub config: AppConfig,
    /// Target wattage resolved from the launch arguments or the config.
    pub initial_target: Option<u32>,
}

impl Application for App {
    type Executor = cosmic::executor::Default;
    type Flags = Flags;
    type Message = Message;

    const APP_ID: &'static str = APP_ID;

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn init(core: Core, flags: Self::Flags) -> (Self, Task<Self::Message>) {
        let mut actions = StateActions::new(AppStore::new(AppState::initial()));
        analytics::observe_store(actions.store_mut());

        if let Some(target) = flags.initial_target {
            actions.initialize_from_target(target);
            analytics::track_target_power_confirmed(target, "launch");
        }

        let setup_draft = flags
            .config
            .last_target_power
            .map(|power| power.to_string())
            .unwrap_or_default();

        let app = Self {
            core,
            actions,
            config: flags.config,
            setup_draft,
            banner: Banner::default(),
            privacy_open: false,
        };

        (app, Task::none())
    }

    fn header_center(&self) -> Vec<Element<Self::Message>> {
        vec![text(fl!("app-title")).size(16).into()]
    }

    fn view(&self) -> Element<Self::Message> {
        let state = self.actions.state();

        let mut page = widget::column().spacing(16);

        if let Some(message) = self.banner.message() {
            page = page.push(
                container(text(message.to_owned()))
                    .padding(12)
                    .width(Length::Fill)
                    .class(cosmic::theme::Container::Card),
            );
        }

        page = page.push(match state.view_mode {
            ViewMode::Setup => self.view_setup(),
            ViewMode::Calculation => self.view_calculation(state),
        });

        // Footer: privacy policy link, on both screens
        page = page.push(widget::vertical_space());
        page = page.push(
            widget::button::link(fl!("privacy-open")).on_press(Message::PrivacyOpened),
        );

        container(page)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(16)
            .into()
    }

    fn dialog(&self) -> Option<Element<Self::Message>> {
        if !self.privacy_open {
            return None;
        }
        Some(privacy::view().map(Message::Privacy))
    }

    fn update(&mut self, message: Self::Message) -> Task<Self::Message> {
        match message {
            Message::SetupTargetChanged(value) => {
                self.setup_draft = value;
            }

            Message::SetupSubmitted => match parse_power(&self.setup_draft) {
                Ok(value) => {
                    self.actions.set_target_power(value);
                    analytics::track_target_power_confirmed(value, "form");
                    self.config.remember_target(value);
                    if let Err(e) = self.config.save() {
                        tracing::warn!("failed to remember target power: {e:#}");
                    }
                }
                Err(_) => {
                    return self.show_error(fl!("error-invalid-range"));
                }
            },

            Message::PresetPressed(power) => {
                if !PRESET_POWERS.contains(&power) {
                    return Task::none();
                }
                self.actions
                    .set_source_selection(Some(SourceSelection::Preset));
                self.actions.set_manual_source_draft("");
                let outcome = self
                    .actions
                    .set_source_power(Some(power), SetSourcePowerOptions::default());
                analytics::track_source_power_selected("preset", power, outcome.has_changed);
                return self.handle_issue(outcome.issue);
            }

            Message::ManualSourceChanged(value) => {
                self.actions.set_manual_source_draft(&value);

                let trimmed = value.trim();
                if trimmed.is_empty() {
                    self.actions.set_source_selection(None);
                    self.actions.set_source_power(
                        None,
                        SetSourcePowerOptions {
                            auto_advance: false,
                        },
                    );
                    analytics::track_source_power_cleared("manual-draft-empty");
                    return Task::none();
                }

                self.actions
                    .set_source_selection(Some(SourceSelection::Manual));
                match parse_power(trimmed) {
                    Ok(power) => {
                        self.actions.set_source_power(
                            Some(power),
                            SetSourcePowerOptions {
                                auto_advance: false,
                            },
                        );
                    }
                    Err(reason) => analytics::track_source_power_invalid(reason.as_str()),
                }
            }

            Message::ManualSourceSubmitted => {
                let draft = self.actions.state().manual_source_draft.clone();
                let trimmed = draft.trim().to_owned();

                if trimmed.is_empty() {
                    self.actions.set_manual_source_draft("");
                    self.actions.set_source_selection(None);
                    self.actions
                        .set_source_power(None, SetSourcePowerOptions::default());
                    self.actions.clear_raw_input();
                    analytics::track_source_power_cleared("manual-commit-empty");
                    return Task::none();
                }

                match parse_power(&trimmed) {
                    Ok(power) => {
                        self.actions.set_manual_source_draft(&trimmed);
                        self.actions
                            .set_source_selection(Some(SourceSelection::Manual));
                        let outcome = self
                            .actions
                            .set_source_power(Some(power), SetSourcePowerOptions::default());
                        analytics::track_source_power_selected(
                            "manual",
                            power,
                            outcome.has_changed,
                        );
                        return self.handle_issue(outcome.issue);
                    }
                    Err(reason) => {
                        analytics::track_source_power_invalid(reason.as_str());
                        return self.show_error(fl!("error-invalid-range"));
                    }
                }
            }

            Message::Keypad(key) => match key {
                KeypadKey::Digit(digit) => {
                    analytics::track_keypad_interaction("digit", &digit.to_string());
                    let issue = self.actions.append_digit(digit);
                    return self.handle_issue(issue);
                }
                KeypadKey::Backspace => {
                    analytics::track_keypad_interaction("backspace", "single");
                    self.actions.remove_last_digit();
                }
                KeypadKey::Clear => {
                    analytics::track_keypad_interaction("clear", "all");
                    self.actions.clear_raw_input();
                }
            },

            Message::EditSourcePressed => {
                analytics::track_calculation_reset("edit-source-button");
                self.actions.reset_to_source_selection();
            }

            Message::PrivacyOpened => {
                self.privacy_open = true;
                analytics::track_privacy_dialog("open", None);
            }

            Message::Privacy(PrivacyMessage::Close) => {
                self.privacy_open = false;
                analytics::track_privacy_dialog("close", Some("dismiss"));
            }

            Message::BannerExpired(generation) => {
                self.banner.expire(generation);
            }
        }

        Task::none()
    }

    fn on_close_requested(&self, _id: cosmic::iced::window::Id) -> Option<Message> {
        None
    }
}

impl App {
    /// Show an error banner and schedule its expiry; a newer banner
    /// invalidates the timer of the one it replaces.
    fn show_error(&mut self, message: String) -> Task<Message> {
        analytics::track_error_shown(&message);
        let generation = self.banner.show(message);
        Task::perform(
            async move {
                tokio::time::sleep(std::time::Duration::from_millis(NOTICE_DURATION_MS)).await;
                Message::BannerExpired(generation)
            },
            |message| message,
        )
    }

    /// Route a calculation issue to telemetry and the banner. Each issue
    /// is surfaced exactly once, by the operation that returned it.
    fn handle_issue(&mut self, issue: Option<CalculationIssue>) -> Task<Message> {
        let Some(issue) = issue else {
            return Task::none();
        };
        analytics::track_calculation_issue(issue);
        let message = match issue {
            CalculationIssue::MissingInput => fl!("error-missing-input"),
            CalculationIssue::NonPositive => fl!("error-non-positive"),
        };
        self.show_error(message)
    }

    /// Setup screen: ask for the wattage the recipe assumes.
    fn view_setup(&self) -> Element<Message> {
        let form = widget::column()
            .push(text(fl!("setup-label")).size(14))
            .push(
                text_input(fl!("setup-placeholder"), &self.setup_draft)
                    .on_input(Message::SetupTargetChanged)
                    .on_submit(|_| Message::SetupSubmitted)
                    .width(Length::Fixed(200.0)),
            )
            .push(
                widget::button::suggested(fl!("setup-submit")).on_press(Message::SetupSubmitted),
            )
            .spacing(8);

        self.group_box(fl!("setup-title"), form)
    }

    /// Calculation screen: power badges plus the current wizard step.
    fn view_calculation<'a>(&'a self, state: &'a AppState) -> Element<'a, Message> {
        let badges = widget::row()
            .push(text(fl!("badge-target-power")).size(14))
            .push(text(power_label(state.target_power)).size(14))
            .push(widget::horizontal_space())
            .push(text(fl!("badge-source-power")).size(14))
            .push(text(power_label(state.source_power)).size(14))
            .spacing(8);

        let step = match state.calculation_step {
            CalculationStep::Source => self.view_source_step(state),
            CalculationStep::Time => self.view_time_step(state),
            CalculationStep::Result => self.view_result_step(state),
        };

        widget::column()
            .push(badges)
            .push(step)
            .spacing(16)
            .into()
    }

    /// Source step: preset buttons and the free-form wattage field.
    fn view_source_step<'a>(&'a self, state: &'a AppState) -> Element<'a, Message> {
        let mut presets = widget::row().spacing(8);
        for power in PRESET_POWERS {
            let is_active = state.source_selection == Some(SourceSelection::Preset)
                && state.source_power == Some(power);
            let mut button = widget::button::standard(format!("{power} W"))
                .on_press(Message::PresetPressed(power));
            if is_active {
                button = button.class(cosmic::theme::Button::Suggested);
            }
            presets = presets.push(button);
        }

        let manual = widget::column()
            .push(text(fl!("source-manual-label")).size(14))
            .push(
                text_input(fl!("source-manual-placeholder"), &state.manual_source_draft)
                    .on_input(Message::ManualSourceChanged)
                    .on_submit(|_| Message::ManualSourceSubmitted)
                    .width(Length::Fixed(160.0)),
            )
            .spacing(4);

        let content = widget::column().push(presets).push(manual).spacing(12);
        self.group_box(fl!("source-title"), content)
    }

    /// Time step: digit cells, normalization preview, keypad.
    fn view_time_step<'a>(&'a self, state: &'a AppState) -> Element<'a, Message> {
        let (normalized, total) = if state.raw_time_input.len() == TIME_DIGITS {
            let preview = parse_raw_time(&state.raw_time_input);
            (
                fl!(
                    "time-preview-normalized",
                    minutes = preview.minutes.to_string(),
                    seconds = format!("{:02}", preview.seconds)
                ),
                fl!(
                    "time-preview-total",
                    seconds = preview.total_seconds.to_string()
                ),
            )
        } else {
            (fl!("time-preview-waiting"), String::new())
        };

        let content = widget::column()
            .push(TimeDisplay::new(&state.raw_time_input).view())
            .push(text(normalized).size(12))
            .push(text(total).size(12))
            .push(Keypad::new(Message::Keypad).view())
            .spacing(12)
            .align_x(Alignment::Center);

        self.group_box(fl!("time-title"), content)
    }

    /// Result step: the converted clock time with its total in seconds.
    fn view_result_step<'a>(&'a self, state: &'a AppState) -> Element<'a, Message> {
        let content = match &state.last_result {
            Some(result) => {
                let minutes = result.target_seconds / 60;
                let seconds = result.target_seconds % 60;
                widget::column()
                    .push(text(format_clock(minutes, seconds)).size(48))
                    .push(
                        text(fl!(
                            "result-total-seconds",
                            seconds = result.target_seconds.to_string()
                        ))
                        .size(14),
                    )
                    .push(text(fl!("result-note")).size(12))
                    .push(
                        widget::button::standard(fl!("result-edit-source"))
                            .on_press(Message::EditSourcePressed),
                    )
                    .spacing(12)
                    .align_x(Alignment::Center)
            }
            None => widget::column().push(text(fl!("result-pending")).size(20)),
        };

        self.group_box(fl!("result-title"), content)
    }

    /// Create a group box with a title
    fn group_box<'a>(
        &self,
        title: String,
        content: impl Into<Element<'a, Message>>,
    ) -> Element<'a, Message> {
        widget::column()
            .push(text(title).size(14))
            .push(
                container(content)
                    .padding(12)
                    .width(Length::Fill)
                    .class(cosmic::theme::Container::Card),
            )
            .spacing(4)
            .into()
    }
}

/// Badge text for a power value, `---` when unset.
fn power_label(power: Option<u32>) -> String {
    match power {
        Some(value) => value.to_string(),
        None => "---".to_string(),
    }
}
