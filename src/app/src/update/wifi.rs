use crux_core::{render::render, Command};

use crate::events::{Event, WifiEvent};
use crate::handle_response;
use crate::http_get;
use crate::http_post;
use crate::model::Model;
use crate::types::{Resource, WifiConfig};
use crate::Effect;

pub fn fetch_wifi(model: &mut Model) -> Command<Effect, Event> {
    http_get!(
        Wifi,
        WifiEvent,
        model,
        Resource::Wifi,
        "/api/wifi",
        FetchWifiResponse,
        "Fetch Wi-Fi",
        expect_json: WifiConfig
    )
}

fn update_wifi(config: WifiConfig, model: &mut Model) -> Command<Effect, Event> {
    if let Err(e) = config.validate() {
        return model.set_error_and_render(format!("Wi-Fi: {e}"));
    }

    http_post!(
        model,
        Resource::SaveWifi,
        "/api/wifi",
        "Save Wi-Fi",
        body_json: &config,
        then: move |result| Event::Wifi(WifiEvent::UpdateWifiResponse { config, result })
    )
}

/// Handle Wi-Fi configuration events
pub fn handle(event: WifiEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        WifiEvent::FetchWifi => fetch_wifi(model),

        WifiEvent::FetchWifiResponse(result) => {
            handle_response!(model, Resource::Wifi, result, {
                on_success: |m, config| {
                    m.confirm_wifi(config);
                },
            })
        }

        WifiEvent::EditWifi(config) => {
            model.edit_wifi(config);
            render()
        }

        WifiEvent::ResetWifi => {
            model.reset_wifi();
            render()
        }

        WifiEvent::SaveWifi => match model.wifi_draft.clone() {
            Some(draft) => update_wifi(draft, model),
            None => model.set_error_and_render("Wi-Fi configuration not loaded yet".to_string()),
        },

        WifiEvent::UpdateWifi(config) => update_wifi(config, model),

        WifiEvent::UpdateWifiResponse { config, result } => {
            handle_response!(model, Resource::SaveWifi, result, {
                on_success: |m, _| {
                    m.confirm_wifi(config);
                },
                success_message: "Wi-Fi settings saved",
            })
        }
    }
}
