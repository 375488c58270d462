//! Towatt - microwave heating-time converter
//!
//! Desktop shell entry point. It handles:
//! - Application-level logging initialization
//! - Localization setup
//! - Configuration loading and launch-target resolution
//! - Application launch

mod analytics;
mod app;
mod config;
mod dialogs;
mod i18n;
mod launch;
mod notifications;
mod widgets;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::AppConfig;

fn main() -> cosmic::iced::Result {
    // Set up logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get the system's preferred languages for i18n
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();
    i18n::init(&requested_languages);

    // A `--target` argument or a remembered wattage opens the session
    // directly in calculation mode; invalid remembered values are
    // scrubbed here so they are not offered again.
    let mut config = AppConfig::load();
    let remembered = config.last_target_power;
    let initial_target = launch::resolve_initial_target(std::env::args().skip(1), &mut config);
    if config.last_target_power != remembered {
        if let Err(e) = config.save() {
            tracing::warn!("failed to persist config: {e:#}");
        }
    }

    tracing::info!("towatt starting");
    tracing::info!("core version: {}", towatt_core::version());

    // Configure application window settings
    let settings = cosmic::app::Settings::default()
        .size_limits(
            cosmic::iced::Limits::NONE
                .min_width(360.0)
                .min_height(560.0),
        )
        .size(cosmic::iced::Size::new(420.0, 720.0));

    // Run the application
    cosmic::app::run::<app::App>(
        settings,
        app::Flags {
            config,
            initial_target,
        },
    )
}
