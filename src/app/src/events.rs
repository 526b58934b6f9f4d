use serde::{Deserialize, Serialize};

use crate::types::*;

/// Channel configuration and servo switching events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum ChannelEvent {
    FetchChannels,
    /// Replace the local draft of a channel
    EditChannel(ChannelConfig),
    ResetChannel {
        channel: String,
    },
    /// Send the draft of a channel to the device
    SaveChannel {
        channel: String,
    },
    UpdateChannel(ChannelConfig),
    FetchChannelStatus,
    /// Shell-driven refresh of the servo status, failures stay silent
    PollChannelStatus,
    SwitchChannel(SwitchAction),

    #[serde(skip)]
    FetchChannelsResponse(Result<Vec<ChannelConfig>, String>),
    #[serde(skip)]
    UpdateChannelResponse {
        config: ChannelConfig,
        result: Result<(), String>,
    },
    #[serde(skip)]
    ChannelStatusResponse {
        silent: bool,
        result: Result<Vec<ServoStatus>, String>,
    },
    #[serde(skip)]
    SwitchChannelResponse {
        channel: String,
        result: Result<(), String>,
    },
}

/// Wi-Fi configuration events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum WifiEvent {
    FetchWifi,
    EditWifi(WifiConfig),
    ResetWifi,
    SaveWifi,
    UpdateWifi(WifiConfig),

    #[serde(skip)]
    FetchWifiResponse(Result<WifiConfig, String>),
    #[serde(skip)]
    UpdateWifiResponse {
        config: WifiConfig,
        result: Result<(), String>,
    },
}

/// Device status events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    FetchDeviceInfo,
    #[serde(skip)]
    FetchDeviceInfoResponse(Result<DeviceStatus, String>),
}

/// Locale selection events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum LocaleEvent {
    SwitchLocale { locale: String },
    /// Value the shell found in local storage at startup
    RestoreLocale { stored: Option<String> },
}

/// UI events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ClearError,
    ClearSuccess,
}

/// Events that can happen in the app
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Event {
    Initialize,
    Channel(ChannelEvent),
    Wifi(WifiEvent),
    Status(StatusEvent),
    Locale(LocaleEvent),
    Ui(UiEvent),
}
