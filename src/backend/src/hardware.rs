#[cfg(feature = "mock")]
use mockall::automock;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

/// Servo PWM frequency is 50 Hz, so one period is 20 ms
const PWM_PERIOD_US: u32 = 20_000;
const PWM_DUTY_BITS: u32 = 15;

pub const BOOT_BUTTON_GPIO: u8 = 0;

/// PWM duty value for a pulse of `us` microseconds
pub fn servo_duty(us: u32) -> u32 {
    ((1u64 << PWM_DUTY_BITS) * u64::from(us) / u64::from(PWM_PERIOD_US)) as u32
}

/// GPIO and PWM access used by the operation and Wi-Fi controllers
#[cfg_attr(feature = "mock", automock)]
pub trait Hardware {
    fn reset_pin(&mut self, gpio: u8);
    fn set_level(&mut self, gpio: u8, high: bool);
    fn read_level(&mut self, gpio: u8) -> bool;
    fn set_servo_duty(&mut self, gpio: u8, duty: u32);
}

#[derive(Debug, Default)]
struct PinState {
    outputs: HashMap<u8, bool>,
    inputs: HashMap<u8, bool>,
    duties: HashMap<u8, u32>,
}

/// In-memory pins for hosts without GPIO
///
/// Clones share the same pins, so tests can drive inputs and observe outputs
/// while a controller owns another handle.
#[derive(Clone, Debug)]
pub struct SimulatedHardware {
    state: Arc<Mutex<PinState>>,
}

impl SimulatedHardware {
    pub fn new() -> Self {
        let mut state = PinState::default();
        // the boot button doubling as Wi-Fi mode button has a pull-up
        state.inputs.insert(BOOT_BUTTON_GPIO, true);

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, PinState> {
        // pin state stays consistent even if a holder panicked
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Drive an input pin as an external circuit would
    pub fn set_input(&self, gpio: u8, high: bool) {
        self.state().inputs.insert(gpio, high);
    }

    pub fn output(&self, gpio: u8) -> Option<bool> {
        self.state().outputs.get(&gpio).copied()
    }

    pub fn duty(&self, gpio: u8) -> Option<u32> {
        self.state().duties.get(&gpio).copied()
    }
}

impl Default for SimulatedHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl Hardware for SimulatedHardware {
    fn reset_pin(&mut self, gpio: u8) {
        let mut state = self.state();
        state.outputs.remove(&gpio);
        state.duties.remove(&gpio);
    }

    fn set_level(&mut self, gpio: u8, high: bool) {
        self.state().outputs.insert(gpio, high);
    }

    fn read_level(&mut self, gpio: u8) -> bool {
        self.state().inputs.get(&gpio).copied().unwrap_or(false)
    }

    fn set_servo_duty(&mut self, gpio: u8, duty: u32) {
        self.state().duties.insert(gpio, duty);
    }
}
