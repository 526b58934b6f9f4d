use serde::{Deserialize, Serialize};
use serde_valid::Validate;

use super::layout::{channel_pin, is_known_channel, CAP_I2C, CAP_SERVO_OUT, CAP_SMART_BUTTON};

/// Shortest servo pulse in microseconds
pub const MIN_SERVO_TIME: u32 = 800;
/// Longest servo pulse in microseconds
pub const MAX_SERVO_TIME: u32 = 2200;
/// Pulse used by a custom switch action when none is given
pub const DEFAULT_CUSTOM_TIME: u32 = 1500;

pub fn is_valid_servo_time(time: u32) -> bool {
    (MIN_SERVO_TIME..=MAX_SERVO_TIME).contains(&time)
}

/// What a channel is used for
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChannelType {
    #[default]
    Disabled,
    Servo,
    SmartButton,
    I2c,
}

impl ChannelType {
    /// Capability bit a channel needs to be configured with this type
    pub fn required_capability(self) -> Option<u8> {
        match self {
            Self::Disabled => None,
            Self::Servo => Some(CAP_SERVO_OUT),
            Self::SmartButton => Some(CAP_SMART_BUTTON),
            Self::I2c => Some(CAP_I2C),
        }
    }
}

/// Servo pulse timings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct ServoConfig {
    /// Pulse in µs for the left position
    #[serde(rename = "posLeft")]
    #[validate(minimum = 800)]
    #[validate(maximum = 2200)]
    pub left: u32,
    /// Pulse in µs for the right position
    #[serde(rename = "posRight")]
    #[validate(minimum = 800)]
    #[validate(maximum = 2200)]
    pub right: u32,
    /// Pulse in µs used while overdrawing to the left
    #[serde(rename = "posLeftOverdraw")]
    #[validate(minimum = 800)]
    #[validate(maximum = 2200)]
    pub overdraw_left: u32,
    /// Pulse in µs used while overdrawing to the right
    #[serde(rename = "posRightOverdraw")]
    #[validate(minimum = 800)]
    #[validate(maximum = 2200)]
    pub overdraw_right: u32,
    /// Seconds to hold the overdraw pulse
    #[serde(rename = "overdrawTime")]
    #[validate(minimum = 0.0)]
    #[validate(maximum = 5.0)]
    pub overdraw_time: f64,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            left: 1300,
            right: 1700,
            overdraw_left: 1250,
            overdraw_right: 1750,
            overdraw_time: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SwitchDirection {
    Left,
    Right,
    #[default]
    Unknown,
    Custom,
}

fn default_custom_time() -> u32 {
    DEFAULT_CUSTOM_TIME
}

/// Request to move a servo channel, locally or on another device
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SwitchAction {
    pub channel: String,
    pub direction: SwitchDirection,
    /// Address of the device owning the channel, `None` for this device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Pulse in µs, only used by `Custom`
    #[serde(rename = "time", default = "default_custom_time")]
    pub custom_time: u32,
}

impl SwitchAction {
    pub fn new(channel: impl Into<String>, direction: SwitchDirection) -> Self {
        Self {
            channel: channel.into(),
            direction,
            ip: None,
            custom_time: DEFAULT_CUSTOM_TIME,
        }
    }

    pub fn custom(channel: impl Into<String>, time: u32) -> Self {
        Self {
            custom_time: time,
            ..Self::new(channel, SwitchDirection::Custom)
        }
    }

    /// Remote address if the action targets another device
    pub fn remote_ip(&self) -> Option<&str> {
        self.ip.as_deref().filter(|ip| !ip.is_empty())
    }

    pub fn validate(&self) -> Result<(), String> {
        if !is_known_channel(&self.channel) {
            return Err("Provided channel is invalid.".to_string());
        }
        if self.direction == SwitchDirection::Unknown {
            return Err("Provided direction is invalid".to_string());
        }
        if self.direction == SwitchDirection::Custom && !is_valid_servo_time(self.custom_time) {
            return Err("Provided time is out of range.".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ButtonConfig {
    #[serde(default)]
    pub action_on_press: Vec<SwitchAction>,
    #[serde(default)]
    pub inverted_input: bool,
    #[serde(default)]
    pub inverted_output: bool,
}

impl ButtonConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.action_on_press
            .iter()
            .try_for_each(SwitchAction::validate)
    }
}

/// Configuration of a single channel as exchanged with the device
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChannelConfig {
    pub channel: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<ButtonConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servo: Option<ServoConfig>,
}

impl ChannelConfig {
    /// Default configuration of a channel: disabled, no sub-configs
    pub fn disabled(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            ..Default::default()
        }
    }

    pub fn has_capability(&self) -> bool {
        match self.channel_type.required_capability() {
            None => true,
            Some(cap) => channel_pin(&self.channel).is_some_and(|pin| pin.supports(cap)),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !is_known_channel(&self.channel) {
            return Err("unknown gpio entry specified".to_string());
        }
        if !self.has_capability() {
            return Err("no capability".to_string());
        }

        match self.channel_type {
            ChannelType::Disabled | ChannelType::I2c => Ok(()),
            ChannelType::Servo => {
                let servo = self
                    .servo
                    .as_ref()
                    .ok_or("No servo configuration provided")?;
                Validate::validate(servo).map_err(|e| format!("Invalid servo configuration: {e}"))
            }
            ChannelType::SmartButton => self
                .button
                .as_ref()
                .ok_or("No button configuration provided")?
                .validate(),
        }
    }
}

/// Live state of a servo output channel
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServoStatus {
    pub channel: String,
    /// Current pulse in µs
    pub time: u32,
    pub position: SwitchDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_position: Option<SwitchDirection>,
    pub overdrawing: bool,
}
