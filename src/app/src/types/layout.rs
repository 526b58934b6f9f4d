use serde::{Deserialize, Serialize};

/// Channel can drive a smart button (input with feedback LED)
pub const CAP_SMART_BUTTON: u8 = 0x1 << 1;
/// Channel can drive a servo output (LEDC PWM)
pub const CAP_SERVO_OUT: u8 = 0x1 << 2;
/// Channel can be used as I2C bus line
pub const CAP_I2C: u8 = 0x1 << 3;

/// Static description of one connector slot of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelPin {
    pub channel: &'static str,
    pub gpio: u8,
    pub capabilities: u8,
}

impl ChannelPin {
    const fn new(channel: &'static str, gpio: u8, capabilities: u8) -> Self {
        Self {
            channel,
            gpio,
            capabilities,
        }
    }

    pub fn supports(&self, capability: u8) -> bool {
        self.capabilities & capability != 0
    }
}

/// All channels of the board, A1..A8 followed by B1..B8
pub const CHANNEL_PINS: [ChannelPin; 16] = [
    ChannelPin::new("A1", 25, CAP_SMART_BUTTON | CAP_SERVO_OUT),
    ChannelPin::new("A2", 13, CAP_SMART_BUTTON | CAP_SERVO_OUT),
    ChannelPin::new("A3", 23, CAP_SMART_BUTTON | CAP_SERVO_OUT),
    ChannelPin::new("A4", 19, CAP_SMART_BUTTON | CAP_SERVO_OUT),
    ChannelPin::new("A5", 18, CAP_SMART_BUTTON | CAP_SERVO_OUT),
    ChannelPin::new("A6", 17, CAP_SMART_BUTTON | CAP_SERVO_OUT),
    ChannelPin::new("A7", 16, CAP_SMART_BUTTON | CAP_SERVO_OUT),
    ChannelPin::new("A8", 4, CAP_SMART_BUTTON | CAP_SERVO_OUT),
    ChannelPin::new("B1", 22, CAP_SMART_BUTTON | CAP_I2C),
    ChannelPin::new("B2", 21, CAP_SMART_BUTTON | CAP_I2C),
    ChannelPin::new("B3", 32, CAP_SMART_BUTTON),
    ChannelPin::new("B4", 33, CAP_SMART_BUTTON),
    ChannelPin::new("B5", 26, CAP_SMART_BUTTON),
    ChannelPin::new("B6", 27, CAP_SMART_BUTTON),
    ChannelPin::new("B7", 14, CAP_SMART_BUTTON),
    ChannelPin::new("B8", 15, CAP_SMART_BUTTON),
];

/// Look up the pin description of a channel
pub fn channel_pin(channel: &str) -> Option<&'static ChannelPin> {
    CHANNEL_PINS.iter().find(|pin| pin.channel == channel)
}

pub fn is_known_channel(channel: &str) -> bool {
    channel_pin(channel).is_some()
}

/// What the UI needs to know to render a channel card
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelCapabilities {
    pub channel: String,
    pub servo: bool,
}

/// Channel layout as shown by the UI
pub fn channel_layout() -> Vec<ChannelCapabilities> {
    CHANNEL_PINS
        .iter()
        .map(|pin| ChannelCapabilities {
            channel: pin.channel.to_string(),
            servo: pin.supports(CAP_SERVO_OUT),
        })
        .collect()
}
