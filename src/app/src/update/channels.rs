use crux_core::{render::render, Command};

use crate::events::{ChannelEvent, Event};
use crate::handle_response;
use crate::http_get;
use crate::http_post;
use crate::model::Model;
use crate::types::{is_known_channel, ChannelConfig, Resource, ServoStatus, SwitchAction};
use crate::Effect;

pub fn fetch_channels(model: &mut Model) -> Command<Effect, Event> {
    http_get!(
        Channel,
        ChannelEvent,
        model,
        Resource::Channels,
        "/api/config",
        FetchChannelsResponse,
        "Fetch channels",
        expect_json: Vec<ChannelConfig>
    )
}

/// Fetch the servo status list. `silent` requests never report errors to the user.
pub fn fetch_channel_status(model: &mut Model, silent: bool) -> Command<Effect, Event> {
    http_get!(
        model,
        Resource::ChannelStatus,
        "/api/channel",
        "Fetch channel status",
        expect_json: Vec<ServoStatus>,
        then: move |result| Event::Channel(ChannelEvent::ChannelStatusResponse { silent, result })
    )
}

/// Validate `config` and send it to the device
pub fn update_channel(config: ChannelConfig, model: &mut Model) -> Command<Effect, Event> {
    if let Err(e) = config.validate() {
        return model.set_error_and_render(format!("Channel {}: {e}", config.channel));
    }

    let channel = config.channel.clone();
    http_post!(
        model,
        Resource::SaveChannel(channel.clone()),
        "/api/config",
        format!("Save channel {channel}"),
        body_json: &config,
        then: move |result| Event::Channel(ChannelEvent::UpdateChannelResponse { config, result })
    )
}

fn switch_channel(action: SwitchAction, model: &mut Model) -> Command<Effect, Event> {
    if let Err(e) = action.validate() {
        return model.set_error_and_render(e);
    }

    let channel = action.channel.clone();
    http_post!(
        model,
        Resource::SwitchChannel(channel.clone()),
        "/api/channel",
        format!("Switch channel {channel}"),
        body_json: &action,
        then: move |result| Event::Channel(ChannelEvent::SwitchChannelResponse { channel, result })
    )
}

/// Handle channel configuration and switching events
pub fn handle(event: ChannelEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        ChannelEvent::FetchChannels => fetch_channels(model),

        ChannelEvent::FetchChannelsResponse(result) => {
            handle_response!(model, Resource::Channels, result, {
                on_success: |m, configs| {
                    m.replace_channels(configs);
                },
            })
        }

        ChannelEvent::EditChannel(config) => {
            if !is_known_channel(&config.channel) {
                return model.set_error_and_render(format!("Unknown channel {}", config.channel));
            }
            model.edit_channel(config);
            render()
        }

        ChannelEvent::ResetChannel { channel } => {
            model.reset_channel(&channel);
            render()
        }

        ChannelEvent::SaveChannel { channel } => match model.channel_drafts.get(&channel) {
            Some(draft) => update_channel(draft.clone(), model),
            None => model.set_error_and_render(format!("No configuration for channel {channel}")),
        },

        ChannelEvent::UpdateChannel(config) => update_channel(config, model),

        ChannelEvent::UpdateChannelResponse { config, result } => {
            let channel = config.channel.clone();
            handle_response!(model, Resource::SaveChannel(channel.clone()), result, {
                on_success: |m, _| {
                    m.confirm_channel(config);
                },
                success_message: format!("Channel {channel} saved"),
            })
        }

        ChannelEvent::FetchChannelStatus => fetch_channel_status(model, false),
        ChannelEvent::PollChannelStatus => fetch_channel_status(model, true),

        ChannelEvent::ChannelStatusResponse { silent: true, result } => {
            handle_response!(model, Resource::ChannelStatus, result, {
                on_success: |m, status| {
                    m.channel_status = status;
                },
                silent: true,
            })
        }

        ChannelEvent::ChannelStatusResponse { silent: false, result } => {
            handle_response!(model, Resource::ChannelStatus, result, {
                on_success: |m, status| {
                    m.channel_status = status;
                },
            })
        }

        ChannelEvent::SwitchChannel(action) => switch_channel(action, model),

        ChannelEvent::SwitchChannelResponse { channel, result } => {
            let switched = result.is_ok();
            let response = handle_response!(model, Resource::SwitchChannel(channel), result, {
                on_success: |_m, _| {},
            });
            if switched {
                Command::all([response, fetch_channel_status(model, true)])
            } else {
                response
            }
        }
    }
}
