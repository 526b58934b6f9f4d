use super::*;
use crate::update::update;
use crux_core::Command;
use crux_http::protocol::HttpRequest;

fn servo_config(channel: &str, left: u32) -> ChannelConfig {
    ChannelConfig {
        channel: channel.to_string(),
        channel_type: ChannelType::Servo,
        servo: Some(ServoConfig {
            left,
            ..Default::default()
        }),
        button: None,
    }
}

/// HTTP requests the command hands to the shell
fn http_requests(cmd: &mut Command<Effect, Event>) -> Vec<HttpRequest> {
    cmd.effects()
        .filter_map(Effect::into_http)
        .map(|request| request.operation)
        .collect()
}

fn single_request(cmd: &mut Command<Effect, Event>) -> HttpRequest {
    let mut requests = http_requests(cmd);
    assert_eq!(requests.len(), 1, "{requests:?}");
    requests.remove(0)
}

fn loaded_model() -> Model {
    let mut model = Model::default();
    model.replace_channels(vec![servo_config("A1", 1300), ChannelConfig::disabled("B1")]);
    model.confirm_wifi(WifiConfig::default());
    model.data_loaded = true;
    model
}

mod initialize {
    use super::*;

    #[test]
    fn starts_all_initial_fetches() {
        let mut model = Model::default();

        let _ = update(Event::Initialize, &mut model);

        assert_eq!(model.layout.len(), 16);
        assert!(model.is_loading);
        assert!(!model.data_loaded);
        for resource in Resource::INITIAL {
            assert!(model.in_flight.is_busy(&resource), "{resource:?}");
        }
    }

    #[test]
    fn requests_channels_status_and_wifi() {
        let mut model = Model::default();

        let mut cmd = update(Event::Initialize, &mut model);

        let mut requests: Vec<(String, String)> = http_requests(&mut cmd)
            .into_iter()
            .map(|request| (request.method, request.url))
            .collect();
        requests.sort();
        assert_eq!(
            requests,
            vec![
                ("GET".to_string(), "https://relative/api/config".to_string()),
                ("GET".to_string(), "https://relative/api/status".to_string()),
                ("GET".to_string(), "https://relative/api/wifi".to_string()),
            ]
        );
    }

    #[test]
    fn standalone_fetch_does_not_mark_data_loaded() {
        let mut model = Model::default();
        let _ = update(Event::Wifi(WifiEvent::FetchWifi), &mut model);

        let _ = update(
            Event::Wifi(WifiEvent::FetchWifiResponse(Ok(WifiConfig::default()))),
            &mut model,
        );

        assert!(!model.data_loaded);
        assert!(model.wifi.is_some());
    }

    #[test]
    fn data_loaded_once_every_fetch_answered() {
        let mut model = Model::default();
        let _ = update(Event::Initialize, &mut model);

        let _ = update(
            Event::Channel(ChannelEvent::FetchChannelsResponse(Ok(vec![servo_config(
                "A1", 1300,
            )]))),
            &mut model,
        );
        let _ = update(
            Event::Wifi(WifiEvent::FetchWifiResponse(Err(
                "Fetch Wi-Fi failed: timeout".to_string()
            ))),
            &mut model,
        );
        assert!(!model.data_loaded);

        let _ = update(
            Event::Status(StatusEvent::FetchDeviceInfoResponse(Ok(DeviceStatus::default()))),
            &mut model,
        );

        assert!(model.data_loaded);
        assert!(!model.is_loading);
        assert_eq!(model.configs.len(), 1);
        assert!(model.wifi.is_none());
        assert_eq!(
            model.error_message.as_deref(),
            Some("Fetch Wi-Fi failed: timeout")
        );
    }
}

mod in_flight_guard {
    use super::*;

    #[test]
    fn second_fetch_is_dropped_without_side_effects() {
        let mut model = Model::default();
        let _ = update(Event::Channel(ChannelEvent::FetchChannels), &mut model);
        model.error_message = Some("stale".to_string());
        let before = model.clone();

        let _ = update(Event::Channel(ChannelEvent::FetchChannels), &mut model);

        assert_eq!(model, before);
    }

    #[test]
    fn saves_of_different_channels_run_concurrently() {
        let mut model = loaded_model();
        model.confirm_channel(servo_config("A2", 1300));

        let _ = update(
            Event::Channel(ChannelEvent::UpdateChannel(servo_config("A1", 1000))),
            &mut model,
        );
        let _ = update(
            Event::Channel(ChannelEvent::UpdateChannel(servo_config("A2", 1000))),
            &mut model,
        );

        assert!(model
            .in_flight
            .is_busy(&Resource::SaveChannel("A1".to_string())));
        assert!(model
            .in_flight
            .is_busy(&Resource::SaveChannel("A2".to_string())));
    }

    #[test]
    fn response_releases_resource() {
        let mut model = Model::default();
        let _ = update(Event::Status(StatusEvent::FetchDeviceInfo), &mut model);

        let _ = update(
            Event::Status(StatusEvent::FetchDeviceInfoResponse(Ok(DeviceStatus::default()))),
            &mut model,
        );

        assert!(model.in_flight.is_empty());
        assert_eq!(model.device_info, Some(DeviceStatus::default()));
    }
}

mod requests {
    use super::*;

    #[test]
    fn fetch_channels() {
        let mut model = Model::default();

        let mut cmd = update(Event::Channel(ChannelEvent::FetchChannels), &mut model);

        let request = single_request(&mut cmd);
        assert_eq!(request.method, "GET");
        assert_eq!(request.url, "https://relative/api/config");
        assert!(request.body.is_empty());
    }

    #[test]
    fn fetch_device_info() {
        let mut model = Model::default();

        let mut cmd = update(Event::Status(StatusEvent::FetchDeviceInfo), &mut model);

        let request = single_request(&mut cmd);
        assert_eq!(request.method, "GET");
        assert_eq!(request.url, "https://relative/api/status");
    }

    #[test]
    fn fetch_wifi() {
        let mut model = Model::default();

        let mut cmd = update(Event::Wifi(WifiEvent::FetchWifi), &mut model);

        let request = single_request(&mut cmd);
        assert_eq!(request.method, "GET");
        assert_eq!(request.url, "https://relative/api/wifi");
    }

    #[test]
    fn fetch_channel_status() {
        let mut model = loaded_model();

        let mut cmd = update(Event::Channel(ChannelEvent::PollChannelStatus), &mut model);

        let request = single_request(&mut cmd);
        assert_eq!(request.method, "GET");
        assert_eq!(request.url, "https://relative/api/channel");
    }

    #[test]
    fn save_channel_posts_draft() {
        let mut model = loaded_model();
        let draft = servo_config("A1", 1000);
        let _ = update(
            Event::Channel(ChannelEvent::EditChannel(draft.clone())),
            &mut model,
        );

        let mut cmd = update(
            Event::Channel(ChannelEvent::SaveChannel {
                channel: "A1".to_string(),
            }),
            &mut model,
        );

        let request = single_request(&mut cmd);
        assert_eq!(request.method, "POST");
        assert_eq!(request.url, "https://relative/api/config");
        let body: ChannelConfig =
            serde_json::from_slice(&request.body).expect("body is not a channel config");
        assert_eq!(body, draft);
    }

    #[test]
    fn update_channel_posts_config() {
        let mut model = loaded_model();
        let config = ChannelConfig::disabled("B1");

        let mut cmd = update(
            Event::Channel(ChannelEvent::UpdateChannel(config.clone())),
            &mut model,
        );

        let request = single_request(&mut cmd);
        assert_eq!(request.method, "POST");
        assert_eq!(request.url, "https://relative/api/config");
        let body: ChannelConfig =
            serde_json::from_slice(&request.body).expect("body is not a channel config");
        assert_eq!(body, config);
    }

    #[test]
    fn save_wifi_posts_draft() {
        let mut model = loaded_model();
        let mut draft = WifiConfig::default();
        draft.mode = WifiMode::Off;
        let _ = update(Event::Wifi(WifiEvent::EditWifi(draft.clone())), &mut model);

        let mut cmd = update(Event::Wifi(WifiEvent::SaveWifi), &mut model);

        let request = single_request(&mut cmd);
        assert_eq!(request.method, "POST");
        assert_eq!(request.url, "https://relative/api/wifi");
        let body: WifiConfig =
            serde_json::from_slice(&request.body).expect("body is not a wifi config");
        assert_eq!(body, draft);
    }

    #[test]
    fn update_wifi_posts_config() {
        let mut model = loaded_model();
        let mut config = WifiConfig::default();
        config.hostname = "yard".to_string();

        let mut cmd = update(Event::Wifi(WifiEvent::UpdateWifi(config.clone())), &mut model);

        let request = single_request(&mut cmd);
        assert_eq!(request.method, "POST");
        assert_eq!(request.url, "https://relative/api/wifi");
        let body: WifiConfig =
            serde_json::from_slice(&request.body).expect("body is not a wifi config");
        assert_eq!(body, config);
    }

    #[test]
    fn switch_channel_posts_action() {
        let mut model = loaded_model();
        let action = SwitchAction::custom("A1", 1600);

        let mut cmd = update(
            Event::Channel(ChannelEvent::SwitchChannel(action.clone())),
            &mut model,
        );

        let request = single_request(&mut cmd);
        assert_eq!(request.method, "POST");
        assert_eq!(request.url, "https://relative/api/channel");
        let body: SwitchAction =
            serde_json::from_slice(&request.body).expect("body is not a switch action");
        assert_eq!(body, action);
    }

    #[test]
    fn busy_resource_sends_nothing() {
        let mut model = loaded_model();
        let save = || {
            Event::Channel(ChannelEvent::SaveChannel {
                channel: "A1".to_string(),
            })
        };
        let mut first = update(save(), &mut model);
        assert_eq!(http_requests(&mut first).len(), 1);

        let mut second = update(save(), &mut model);

        assert_eq!(second.effects().count(), 0);
    }

    #[test]
    fn invalid_config_sends_nothing() {
        let mut model = loaded_model();
        let mut config = servo_config("A1", 1300);
        if let Some(servo) = config.servo.as_mut() {
            servo.left = 3000;
        }

        let mut cmd = update(Event::Channel(ChannelEvent::UpdateChannel(config)), &mut model);

        assert!(http_requests(&mut cmd).is_empty());
    }
}

mod channels {
    use super::*;

    #[test]
    fn fetch_keeps_dirty_drafts() {
        let mut model = loaded_model();
        let _ = update(
            Event::Channel(ChannelEvent::EditChannel(servo_config("A1", 1000))),
            &mut model,
        );
        let _ = update(Event::Channel(ChannelEvent::FetchChannels), &mut model);

        let _ = update(
            Event::Channel(ChannelEvent::FetchChannelsResponse(Ok(vec![
                servo_config("A1", 1400),
                ChannelConfig::disabled("B1"),
            ]))),
            &mut model,
        );

        assert_eq!(model.configs["A1"], servo_config("A1", 1400));
        assert_eq!(model.channel_drafts["A1"], servo_config("A1", 1000));
        assert!(model.is_channel_dirty("A1"));
    }

    #[test]
    fn failed_fetch_keeps_state() {
        let mut model = loaded_model();
        let configs = model.configs.clone();
        let _ = update(Event::Channel(ChannelEvent::FetchChannels), &mut model);

        let _ = update(
            Event::Channel(ChannelEvent::FetchChannelsResponse(Err(
                "Fetch channels failed: HTTP 500".to_string(),
            ))),
            &mut model,
        );

        assert_eq!(model.configs, configs);
        assert!(model.error_message.is_some());
    }

    #[test]
    fn edit_of_unknown_channel_is_rejected() {
        let mut model = loaded_model();

        let _ = update(
            Event::Channel(ChannelEvent::EditChannel(ChannelConfig::disabled("C3"))),
            &mut model,
        );

        assert!(!model.channel_drafts.contains_key("C3"));
        assert!(model.error_message.is_some());
    }

    #[test]
    fn invalid_draft_is_not_sent() {
        let mut model = loaded_model();
        let mut draft = servo_config("A1", 1300);
        if let Some(servo) = draft.servo.as_mut() {
            servo.right = 3000;
        }
        let _ = update(Event::Channel(ChannelEvent::EditChannel(draft)), &mut model);

        let _ = update(
            Event::Channel(ChannelEvent::SaveChannel {
                channel: "A1".to_string(),
            }),
            &mut model,
        );

        assert!(model.in_flight.is_empty());
        assert!(model.is_channel_dirty("A1"));
        assert!(model
            .error_message
            .as_deref()
            .is_some_and(|e| e.starts_with("Channel A1")));
    }

    #[test]
    fn successful_save_cleans_channel() {
        let mut model = loaded_model();
        let draft = servo_config("A1", 1000);
        let _ = update(
            Event::Channel(ChannelEvent::EditChannel(draft.clone())),
            &mut model,
        );
        let _ = update(
            Event::Channel(ChannelEvent::SaveChannel {
                channel: "A1".to_string(),
            }),
            &mut model,
        );
        assert!(model.is_loading);

        let _ = update(
            Event::Channel(ChannelEvent::UpdateChannelResponse {
                config: draft.clone(),
                result: Ok(()),
            }),
            &mut model,
        );

        assert_eq!(model.configs["A1"], draft);
        assert!(!model.is_channel_dirty("A1"));
        assert!(!model.is_loading);
        assert_eq!(model.success_message.as_deref(), Some("Channel A1 saved"));
    }

    #[test]
    fn failed_save_keeps_draft_dirty() {
        let mut model = loaded_model();
        let draft = servo_config("A1", 1000);
        let _ = update(
            Event::Channel(ChannelEvent::EditChannel(draft.clone())),
            &mut model,
        );
        let _ = update(
            Event::Channel(ChannelEvent::SaveChannel {
                channel: "A1".to_string(),
            }),
            &mut model,
        );

        let _ = update(
            Event::Channel(ChannelEvent::UpdateChannelResponse {
                config: draft,
                result: Err("Save channel A1 failed: no capability".to_string()),
            }),
            &mut model,
        );

        assert_eq!(model.configs["A1"], servo_config("A1", 1300));
        assert!(model.is_channel_dirty("A1"));
        assert!(model.in_flight.is_empty());
        assert_eq!(
            model.error_message.as_deref(),
            Some("Save channel A1 failed: no capability")
        );
    }

    #[test]
    fn reset_discards_edit() {
        let mut model = loaded_model();
        let _ = update(
            Event::Channel(ChannelEvent::EditChannel(servo_config("A1", 1000))),
            &mut model,
        );

        let _ = update(
            Event::Channel(ChannelEvent::ResetChannel {
                channel: "A1".to_string(),
            }),
            &mut model,
        );

        assert!(model.dirty_channels.is_empty());
        assert_eq!(model.channel_drafts["A1"], model.configs["A1"]);
    }
}

mod switching {
    use super::*;

    #[test]
    fn invalid_action_is_not_sent() {
        let mut model = loaded_model();

        let _ = update(
            Event::Channel(ChannelEvent::SwitchChannel(SwitchAction::custom("A1", 100))),
            &mut model,
        );

        assert!(model.in_flight.is_empty());
        assert!(model.error_message.is_some());
    }

    #[test]
    fn valid_action_marks_channel_busy() {
        let mut model = loaded_model();

        let _ = update(
            Event::Channel(ChannelEvent::SwitchChannel(SwitchAction::new(
                "A1",
                SwitchDirection::Left,
            ))),
            &mut model,
        );

        assert!(model
            .in_flight
            .is_busy(&Resource::SwitchChannel("A1".to_string())));
    }

    #[test]
    fn successful_switch_refreshes_status() {
        let mut model = loaded_model();
        let _ = update(
            Event::Channel(ChannelEvent::SwitchChannel(SwitchAction::new(
                "A1",
                SwitchDirection::Right,
            ))),
            &mut model,
        );

        let _ = update(
            Event::Channel(ChannelEvent::SwitchChannelResponse {
                channel: "A1".to_string(),
                result: Ok(()),
            }),
            &mut model,
        );

        assert!(model.in_flight.is_busy(&Resource::ChannelStatus));
        assert!(!model.is_loading);
    }

    #[test]
    fn silent_poll_failure_shows_no_error() {
        let mut model = loaded_model();
        let _ = update(Event::Channel(ChannelEvent::PollChannelStatus), &mut model);
        assert!(!model.is_loading);

        let _ = update(
            Event::Channel(ChannelEvent::ChannelStatusResponse {
                silent: true,
                result: Err("Fetch channel status failed: offline".to_string()),
            }),
            &mut model,
        );

        assert!(model.error_message.is_none());
        assert!(model.in_flight.is_empty());
    }

    #[test]
    fn status_response_replaces_list() {
        let mut model = loaded_model();
        let status = vec![ServoStatus {
            channel: "A1".to_string(),
            time: 1300,
            position: SwitchDirection::Left,
            next_position: None,
            overdrawing: false,
        }];
        let _ = update(Event::Channel(ChannelEvent::FetchChannelStatus), &mut model);

        let _ = update(
            Event::Channel(ChannelEvent::ChannelStatusResponse {
                silent: false,
                result: Ok(status.clone()),
            }),
            &mut model,
        );

        assert_eq!(model.channel_status, status);
    }
}

mod wifi {
    use super::*;

    fn station() -> WifiConfig {
        let mut config = WifiConfig::default();
        config.mode = WifiMode::Sta;
        config.sta.ssid = "garden".to_string();
        config
    }

    #[test]
    fn save_without_loaded_config_is_an_error() {
        let mut model = Model::default();

        let _ = update(Event::Wifi(WifiEvent::SaveWifi), &mut model);

        assert!(model.error_message.is_some());
        assert!(model.in_flight.is_empty());
    }

    #[test]
    fn successful_save_confirms_draft() {
        let mut model = loaded_model();
        let _ = update(Event::Wifi(WifiEvent::EditWifi(station())), &mut model);
        assert!(model.wifi_dirty);

        let _ = update(Event::Wifi(WifiEvent::SaveWifi), &mut model);
        assert!(model.in_flight.is_busy(&Resource::SaveWifi));

        let _ = update(
            Event::Wifi(WifiEvent::UpdateWifiResponse {
                config: station(),
                result: Ok(()),
            }),
            &mut model,
        );

        assert_eq!(model.wifi, Some(station()));
        assert!(!model.wifi_dirty);
        assert!(model.success_message.is_some());
    }

    #[test]
    fn failed_save_keeps_confirmed_value() {
        let mut model = loaded_model();
        let _ = update(Event::Wifi(WifiEvent::EditWifi(station())), &mut model);
        let _ = update(Event::Wifi(WifiEvent::SaveWifi), &mut model);

        let _ = update(
            Event::Wifi(WifiEvent::UpdateWifiResponse {
                config: station(),
                result: Err("Save Wi-Fi failed: HTTP 500".to_string()),
            }),
            &mut model,
        );

        assert_eq!(model.wifi, Some(WifiConfig::default()));
        assert!(model.wifi_dirty);
        assert!(model.error_message.is_some());
    }

    #[test]
    fn static_station_with_bad_address_is_not_sent() {
        let mut model = loaded_model();
        let mut config = station();
        config.sta.method = IpMethod::Static;
        config.sta.static_ip.address = "10.0.0".to_string();

        let _ = update(Event::Wifi(WifiEvent::UpdateWifi(config)), &mut model);

        assert!(model.in_flight.is_empty());
        assert!(model.error_message.is_some());
    }
}

mod locale {
    use super::*;

    #[test]
    fn switch_to_supported_locale() {
        let mut model = Model::default();

        let _ = update(
            Event::Locale(LocaleEvent::SwitchLocale {
                locale: "en".to_string(),
            }),
            &mut model,
        );

        assert_eq!(model.locale, Locale::En);
        assert!(model.error_message.is_none());
    }

    #[test]
    fn unsupported_locale_is_rejected() {
        let mut model = Model::default();

        let _ = update(
            Event::Locale(LocaleEvent::SwitchLocale {
                locale: "fr".to_string(),
            }),
            &mut model,
        );

        assert_eq!(model.locale, Locale::De);
        assert!(model.error_message.is_some());
    }

    #[test]
    fn restore_ignores_unsupported_value() {
        let mut model = Model::default();

        let _ = update(
            Event::Locale(LocaleEvent::RestoreLocale {
                stored: Some("en-GB".to_string()),
            }),
            &mut model,
        );

        assert_eq!(model.locale, Locale::De);
        assert!(model.error_message.is_none());
    }
}

#[test]
fn clear_error() {
    let mut model = Model {
        error_message: Some("Some error".to_string()),
        ..Default::default()
    };

    let _ = update(Event::Ui(UiEvent::ClearError), &mut model);

    assert_eq!(model.error_message, None);
}
