use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::i18n::Locale;
use crate::types::*;

/// Trait for types that can handle error messages
///
/// This allows HTTP helper functions to work with Model without directly depending on it.
pub trait ModelErrorHandler {
    fn set_error(&mut self, error: String);
}

/// Application Model - the complete state
/// Also serves as the ViewModel when serialized
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct Model {
    /// True once every fetch issued by `Initialize` was answered
    pub data_loaded: bool,
    /// `Initialize` ran and its fetches are not all answered yet
    #[serde(skip)]
    pub initializing: bool,

    // Channel state
    /// Last configs confirmed by the device, keyed by channel
    pub configs: BTreeMap<String, ChannelConfig>,
    /// Local edits, one per known channel
    pub channel_drafts: BTreeMap<String, ChannelConfig>,
    pub dirty_channels: BTreeSet<String>,
    pub channel_status: Vec<ServoStatus>,
    pub layout: Vec<ChannelCapabilities>,

    // Wi-Fi state
    pub wifi: Option<WifiConfig>,
    pub wifi_draft: Option<WifiConfig>,
    pub wifi_dirty: bool,

    // Device state
    pub device_info: Option<DeviceStatus>,

    pub in_flight: InFlight,
    pub locale: Locale,

    // UI state
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl Model {
    /// Start a loading operation (sets is_loading=true, clears error)
    pub fn start_loading(&mut self) {
        self.is_loading = true;
        self.error_message = None;
    }

    /// Set an error message. Loading continues only while other requests are pending.
    pub fn set_error(&mut self, error: String) {
        self.is_loading = self.in_flight.shows_loading();
        self.error_message = Some(error);
    }

    /// Set an error message and return a render command
    pub fn set_error_and_render(
        &mut self,
        error: String,
    ) -> crux_core::Command<crate::Effect, crate::events::Event> {
        self.set_error(error);
        crux_core::render::render()
    }

    /// Claim `resource` for a new request. Returns false if one is already in flight.
    pub fn begin_request(&mut self, resource: Resource) -> bool {
        let shows_loading = resource.shows_loading();
        if !self.in_flight.try_begin(resource) {
            return false;
        }
        if shows_loading {
            self.start_loading();
        }
        true
    }

    /// Mark a response as handled and refresh `is_loading` and `data_loaded`
    pub fn finish_request(&mut self, resource: &Resource) {
        self.in_flight.finish(resource);
        self.is_loading = self.in_flight.shows_loading();
        if self.initializing && !Resource::INITIAL.iter().any(|r| self.in_flight.is_busy(r)) {
            self.initializing = false;
            self.data_loaded = true;
        }
    }

    pub fn is_channel_dirty(&self, channel: &str) -> bool {
        self.dirty_channels.contains(channel)
    }

    fn refresh_channel_dirty(&mut self, channel: &str) {
        let dirty = match (self.channel_drafts.get(channel), self.configs.get(channel)) {
            (Some(draft), Some(confirmed)) => draft != confirmed,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if dirty {
            self.dirty_channels.insert(channel.to_string());
        } else {
            self.dirty_channels.remove(channel);
        }
    }

    /// Store a config the device confirmed. A clean draft follows it,
    /// a dirty one is kept and compared against the new value.
    pub fn confirm_channel(&mut self, config: ChannelConfig) {
        let channel = config.channel.clone();
        if !self.is_channel_dirty(&channel) {
            self.channel_drafts.insert(channel.clone(), config.clone());
        }
        self.configs.insert(channel.clone(), config);
        self.refresh_channel_dirty(&channel);
    }

    /// Replace all confirmed configs with the device's list
    pub fn replace_channels(&mut self, configs: Vec<ChannelConfig>) {
        let received: BTreeSet<String> = configs.iter().map(|c| c.channel.clone()).collect();

        let dirty = &self.dirty_channels;
        self.channel_drafts
            .retain(|channel, _| received.contains(channel) || dirty.contains(channel));
        self.configs.clear();

        for config in configs {
            self.confirm_channel(config);
        }

        let channels: Vec<String> = self.channel_drafts.keys().cloned().collect();
        for channel in channels {
            self.refresh_channel_dirty(&channel);
        }
    }

    pub fn edit_channel(&mut self, config: ChannelConfig) {
        let channel = config.channel.clone();
        self.channel_drafts.insert(channel.clone(), config);
        self.refresh_channel_dirty(&channel);
    }

    /// Drop the local edit of a channel
    pub fn reset_channel(&mut self, channel: &str) {
        match self.configs.get(channel) {
            Some(confirmed) => {
                self.channel_drafts
                    .insert(channel.to_string(), confirmed.clone());
            }
            None => {
                self.channel_drafts.remove(channel);
            }
        }
        self.refresh_channel_dirty(channel);
    }

    /// Store a Wi-Fi config the device confirmed, same rules as channels
    pub fn confirm_wifi(&mut self, config: WifiConfig) {
        if !self.wifi_dirty {
            self.wifi_draft = Some(config.clone());
        }
        self.wifi = Some(config);
        self.wifi_dirty = self.wifi_draft != self.wifi;
    }

    pub fn edit_wifi(&mut self, config: WifiConfig) {
        self.wifi_dirty = self.wifi.as_ref() != Some(&config);
        self.wifi_draft = Some(config);
    }

    pub fn reset_wifi(&mut self) {
        self.wifi_draft = self.wifi.clone();
        self.wifi_dirty = false;
    }
}

impl ModelErrorHandler for Model {
    fn set_error(&mut self, error: String) {
        Model::set_error(self, error)
    }
}
