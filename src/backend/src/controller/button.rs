use super::servo::ServoChannel;
use crate::hardware::Hardware;
use std::collections::BTreeMap;
use switch_control_core::{ButtonConfig, SwitchAction, SwitchDirection};

/// Consecutive pressed samples that count as one press
pub const REQUIRED_TICKS: u32 = 3;

/// How the servos compare to the button's configured actions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchingState {
    NoMatch,
    Match,
    #[default]
    Pending,
}

/// A push button with a built-in LED sharing one pin
#[derive(Debug)]
pub struct ButtonChannel {
    gpio: u8,
    config: ButtonConfig,
    ticks_pressed: u32,
    matching: MatchingState,
}

impl ButtonChannel {
    pub fn new(gpio: u8, config: ButtonConfig, hardware: &mut dyn Hardware) -> Self {
        hardware.reset_pin(gpio);

        Self {
            gpio,
            config,
            ticks_pressed: 0,
            matching: MatchingState::default(),
        }
    }

    pub fn actions(&self) -> &[SwitchAction] {
        &self.config.action_on_press
    }

    pub fn matching(&self) -> MatchingState {
        self.matching
    }

    fn set_led(&self, hardware: &mut dyn Hardware, on: bool) {
        hardware.set_level(self.gpio, on ^ self.config.inverted_output);
    }

    /// Sample the button, refresh the LED and report whether a press completed
    ///
    /// A press fires exactly once, on the tick it has been held for
    /// [`REQUIRED_TICKS`] samples.
    pub fn tick(&mut self, hardware: &mut dyn Hardware, blink_on: bool) -> bool {
        if hardware.read_level(self.gpio) ^ self.config.inverted_input {
            self.ticks_pressed = self.ticks_pressed.saturating_add(1);
        } else {
            self.ticks_pressed = 0;
        }

        match self.matching {
            MatchingState::Pending => self.set_led(hardware, blink_on),
            MatchingState::Match => self.set_led(hardware, true),
            MatchingState::NoMatch => self.set_led(hardware, false),
        }

        self.ticks_pressed == REQUIRED_TICKS
    }

    /// Compare the servos' current and pending positions with the button's actions
    ///
    /// Any servo in a different known position means no match. Otherwise a
    /// pending move towards an action's direction keeps the LED blinking.
    pub fn update_matching_state(&mut self, servos: &BTreeMap<String, ServoChannel>) {
        if self.config.action_on_press.is_empty() {
            self.matching = MatchingState::NoMatch;
            return;
        }

        let mut pending = 0;
        let mut mismatched = 0;
        for action in &self.config.action_on_press {
            let Some(servo) = servos.get(&action.channel) else {
                continue;
            };

            let current = servo.direction();
            if servo
                .pending()
                .is_some_and(|next| next.direction == action.direction)
            {
                pending += 1;
            } else if current != SwitchDirection::Unknown && current != action.direction {
                mismatched += 1;
            }
        }

        self.matching = if mismatched > 0 {
            MatchingState::NoMatch
        } else if pending > 0 {
            MatchingState::Pending
        } else {
            MatchingState::Match
        };
    }
}
