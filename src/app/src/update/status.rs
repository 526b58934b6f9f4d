use crux_core::Command;

use crate::events::{Event, StatusEvent};
use crate::handle_response;
use crate::http_get;
use crate::model::Model;
use crate::types::{DeviceStatus, Resource};
use crate::Effect;

pub fn fetch_device_info(model: &mut Model) -> Command<Effect, Event> {
    http_get!(
        Status,
        StatusEvent,
        model,
        Resource::DeviceInfo,
        "/api/status",
        FetchDeviceInfoResponse,
        "Fetch device info",
        expect_json: DeviceStatus
    )
}

/// Handle device status events
pub fn handle(event: StatusEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        StatusEvent::FetchDeviceInfo => fetch_device_info(model),
        StatusEvent::FetchDeviceInfoResponse(result) => {
            handle_response!(model, Resource::DeviceInfo, result, {
                on_success: |m, info| {
                    m.device_info = Some(info);
                },
            })
        }
    }
}
