mod channels;
mod locale;
mod status;
mod ui;
mod wifi;

use crux_core::{render::render, Command};

use crate::events::Event;
use crate::model::Model;
use crate::types::channel_layout;
use crate::Effect;

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Initialize => initialize(model),
        Event::Channel(channel_event) => channels::handle(channel_event, model),
        Event::Wifi(wifi_event) => wifi::handle(wifi_event, model),
        Event::Status(status_event) => status::handle(status_event, model),
        Event::Locale(locale_event) => locale::handle(locale_event, model),
        Event::Ui(ui_event) => ui::handle(ui_event, model),
    }
}

/// Fetch everything the UI shows. The three requests run independently.
fn initialize(model: &mut Model) -> Command<Effect, Event> {
    model.layout = channel_layout();
    model.initializing = true;
    Command::all([
        render(),
        channels::fetch_channels(model),
        status::fetch_device_info(model),
        wifi::fetch_wifi(model),
    ])
}
