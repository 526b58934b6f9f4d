//! Servo and smart button operation
//!
//! The controller is ticked periodically. Each tick samples the buttons, runs
//! at most one queued servo move and finishes overdraw moves that are due.

pub mod button;
pub mod servo;

use crate::hardware::Hardware;
use button::ButtonChannel;
use log::{debug, error, info, warn};
use servo::ServoChannel;
use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};
use switch_control_core::{
    ChannelConfig, ChannelType, ServoStatus, SwitchAction, SwitchDirection, channel_pin,
};

/// Minimum time between two queued servo moves
pub const CHANGE_COOLDOWN: Duration = Duration::from_secs(2);

const BLINK_CYCLE_MS: u128 = 1000;
const BLINK_OFF_MS: u128 = 500;

pub struct OperationController {
    hardware: Box<dyn Hardware + Send>,
    servos: BTreeMap<String, ServoChannel>,
    buttons: BTreeMap<String, ButtonChannel>,
    last_change: Option<Instant>,
    started: Instant,
    remote_actions: Vec<SwitchAction>,
}

impl OperationController {
    pub fn new(hardware: Box<dyn Hardware + Send>) -> Self {
        Self {
            hardware,
            servos: BTreeMap::new(),
            buttons: BTreeMap::new(),
            last_change: None,
            started: Instant::now(),
            remote_actions: Vec::new(),
        }
    }

    /// Set up the channel described by `config`
    pub fn add_channel(&mut self, config: &ChannelConfig) {
        let Some(pin) = channel_pin(&config.channel) else {
            warn!("skipping unknown channel {}", config.channel);
            return;
        };

        match config.channel_type {
            ChannelType::Disabled | ChannelType::I2c => self.hardware.reset_pin(pin.gpio),
            ChannelType::Servo => {
                let Some(servo) = config.servo.clone() else {
                    error!("servo channel {} has no servo configuration", config.channel);
                    self.hardware.reset_pin(pin.gpio);
                    return;
                };
                let channel =
                    ServoChannel::new(&config.channel, pin.gpio, servo, self.hardware.as_mut());
                self.servos.insert(config.channel.clone(), channel);
            }
            ChannelType::SmartButton => {
                let button = config.button.clone().unwrap_or_default();
                let channel = ButtonChannel::new(pin.gpio, button, self.hardware.as_mut());
                self.buttons.insert(config.channel.clone(), channel);
            }
        }

        self.update_matching_states();
    }

    /// Replace whatever the channel was used for by `config`
    pub fn update_channel(&mut self, config: &ChannelConfig) {
        self.servos.remove(&config.channel);
        self.buttons.remove(&config.channel);

        self.add_channel(config);
    }

    /// Move a servo right away, bypassing queue and cooldown
    pub fn force_switch_change(&mut self, action: SwitchAction, now: Instant) {
        let Some(servo) = self.servos.get_mut(&action.channel) else {
            info!(
                "skipping change request, unknown servo output channel: {}",
                action.channel
            );
            return;
        };

        servo.set_pending(action);
        servo.execute_pending(self.hardware.as_mut(), now);
        self.update_matching_states();
    }

    /// Queue one move per servo
    ///
    /// A new request replaces the servo's pending move. Requests for the
    /// position a servo already holds are dropped, custom moves excepted.
    /// Requests addressed to another device are collected for forwarding.
    pub fn request_switch_change(&mut self, actions: &[SwitchAction]) {
        for action in actions {
            if action.remote_ip().is_some() {
                debug!("queuing remote change request: {action:?}");
                self.remote_actions.push(action.clone());
                continue;
            }

            let Some(servo) = self.servos.get_mut(&action.channel) else {
                info!(
                    "skipping change request, unknown servo output channel: {}",
                    action.channel
                );
                continue;
            };
            servo.remove_pending();

            if action.direction != SwitchDirection::Custom && servo.direction() == action.direction
            {
                info!(
                    "skipping change request, already in position: {} {:?}",
                    action.channel, action.direction
                );
                continue;
            }

            info!(
                "queuing change request: {} {:?}",
                action.channel, action.direction
            );
            servo.set_pending(action.clone());
        }

        self.update_matching_states();
    }

    /// Actions addressed to other devices since the last call
    pub fn take_remote_actions(&mut self) -> Vec<SwitchAction> {
        std::mem::take(&mut self.remote_actions)
    }

    pub fn tick(&mut self, now: Instant) {
        let blink_on = self.blink_on(now);

        let mut pressed = Vec::new();
        for (channel, button) in self.buttons.iter_mut() {
            if button.tick(self.hardware.as_mut(), blink_on) {
                info!("button {channel} has been pressed, performing change");
                pressed.push(button.actions().to_vec());
            }
        }
        for actions in pressed {
            self.request_switch_change(&actions);
        }

        self.perform_next_servo_change(now);

        for servo in self.servos.values_mut() {
            servo.check_overdraw(self.hardware.as_mut(), now);
        }
    }

    pub fn status(&self) -> Vec<ServoStatus> {
        self.servos.values().map(ServoChannel::status).collect()
    }

    fn perform_next_servo_change(&mut self, now: Instant) {
        let Some(servo) = self
            .servos
            .values_mut()
            .find(|servo| servo.pending().is_some())
        else {
            return;
        };

        if let Some(last) = self.last_change {
            if now.duration_since(last) < CHANGE_COOLDOWN {
                return;
            }
        }
        self.last_change = Some(now);

        servo.execute_pending(self.hardware.as_mut(), now);
        self.update_matching_states();
    }

    fn update_matching_states(&mut self) {
        for button in self.buttons.values_mut() {
            button.update_matching_state(&self.servos);
        }
    }

    fn blink_on(&self, now: Instant) -> bool {
        now.duration_since(self.started).as_millis() % BLINK_CYCLE_MS > BLINK_OFF_MS
    }
}
