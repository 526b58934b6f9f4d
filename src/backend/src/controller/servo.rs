use crate::hardware::{Hardware, servo_duty};
use log::info;
use std::time::Instant;
use switch_control_core::{ServoConfig, ServoStatus, SwitchAction, SwitchDirection};

/// A servo output driving one switch
#[derive(Debug)]
pub struct ServoChannel {
    channel: String,
    gpio: u8,
    config: ServoConfig,
    time: u32,
    direction: SwitchDirection,
    pending: Option<SwitchAction>,
    overdraw_started: Option<Instant>,
}

impl ServoChannel {
    /// Configure the PWM output and park the servo at the left position
    pub fn new(
        channel: impl Into<String>,
        gpio: u8,
        config: ServoConfig,
        hardware: &mut dyn Hardware,
    ) -> Self {
        let channel = channel.into();
        info!("initializing servo channel {channel}");
        hardware.reset_pin(gpio);
        hardware.set_servo_duty(gpio, servo_duty(config.left));

        Self {
            channel,
            gpio,
            time: config.left,
            config,
            direction: SwitchDirection::Unknown,
            pending: None,
            overdraw_started: None,
        }
    }

    pub fn direction(&self) -> SwitchDirection {
        self.direction
    }

    pub fn pending(&self) -> Option<&SwitchAction> {
        self.pending.as_ref()
    }

    pub fn set_pending(&mut self, action: SwitchAction) {
        self.pending = Some(action);
    }

    pub fn remove_pending(&mut self) {
        self.pending = None;
    }

    pub fn is_overdrawing(&self) -> bool {
        self.overdraw_started.is_some()
    }

    fn set_servo(&mut self, hardware: &mut dyn Hardware, us: u32) {
        info!(
            "set servo {} to {us} us (duty {})",
            self.channel,
            servo_duty(us)
        );
        hardware.set_servo_duty(self.gpio, servo_duty(us));
        self.time = us;
    }

    /// Move according to the pending action and clear it
    ///
    /// Left and right moves start with the overdraw pulse, custom moves go
    /// straight to the requested pulse.
    pub fn execute_pending(&mut self, hardware: &mut dyn Hardware, now: Instant) {
        let Some(action) = self.pending.take() else {
            return;
        };

        match action.direction {
            SwitchDirection::Left => {
                self.set_servo(hardware, self.config.overdraw_left);
                self.overdraw_started = Some(now);
                self.direction = SwitchDirection::Left;
            }
            SwitchDirection::Right => {
                self.set_servo(hardware, self.config.overdraw_right);
                self.overdraw_started = Some(now);
                self.direction = SwitchDirection::Right;
            }
            SwitchDirection::Custom => {
                self.set_servo(hardware, action.custom_time);
                self.overdraw_started = None;
                self.direction = SwitchDirection::Custom;
            }
            SwitchDirection::Unknown => {}
        }
    }

    /// Settle to the final position once the overdraw time has passed
    pub fn check_overdraw(&mut self, hardware: &mut dyn Hardware, now: Instant) {
        let Some(started) = self.overdraw_started else {
            return;
        };

        if now.duration_since(started).as_secs_f64() <= self.config.overdraw_time {
            return;
        }

        match self.direction {
            SwitchDirection::Left => self.set_servo(hardware, self.config.left),
            SwitchDirection::Right => self.set_servo(hardware, self.config.right),
            _ => {}
        }
        self.overdraw_started = None;
    }

    pub fn status(&self) -> ServoStatus {
        ServoStatus {
            channel: self.channel.clone(),
            time: self.time,
            position: self.direction,
            next_position: self.pending.as_ref().map(|action| action.direction),
            overdrawing: self.is_overdrawing(),
        }
    }
}
