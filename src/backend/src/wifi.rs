use crate::hardware::{BOOT_BUTTON_GPIO, Hardware};
use anyhow::Result;
use log::{debug, error, info};
#[cfg(feature = "mock")]
use mockall::automock;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use switch_control_core::{
    ConnectionState, IpMethod, WifiApConfig, WifiConfig, WifiMode, WifiStationConfig, WifiStatus,
};

pub const MODE_BUTTON_GPIO: u8 = BOOT_BUTTON_GPIO;
pub const STATUS_LED_GPIO: u8 = 2;
/// Ticks the mode button must be held to switch to the next mode
pub const MODE_BUTTON_TICKS: u32 = 100;
/// Reconnect attempts after a station disconnect
pub const MAX_RETRIES: u32 = 5;

/// Connection events reported by the driver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WifiDriverEvent {
    StaStarted,
    StaConnected,
    StaDisconnected,
    GotIp,
}

/// Radio control used by [`WifiController`]
#[cfg_attr(feature = "mock", automock)]
pub trait WifiDriver {
    fn stop(&mut self) -> Result<()>;
    fn start_ap(&mut self, hostname: &str, ap: &WifiApConfig) -> Result<()>;
    fn connect_sta(&mut self, hostname: &str, sta: &WifiStationConfig) -> Result<()>;
    fn reconnect(&mut self) -> Result<()>;
    fn poll_event(&mut self) -> Option<WifiDriverEvent>;
}

#[derive(Debug, Default)]
struct SimulatedWifiState {
    active: Option<WifiMode>,
    events: VecDeque<WifiDriverEvent>,
    reconnects: u32,
}

/// Driver for hosts without a radio; station connects always succeed
#[derive(Clone, Debug, Default)]
pub struct SimulatedWifi {
    state: Arc<Mutex<SimulatedWifiState>>,
}

impl SimulatedWifi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SimulatedWifiState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mode the radio currently runs in, `None` when stopped
    pub fn active(&self) -> Option<WifiMode> {
        self.state().active
    }

    pub fn reconnects(&self) -> u32 {
        self.state().reconnects
    }

    /// Inject an event as the radio would report it
    pub fn push_event(&self, event: WifiDriverEvent) {
        self.state().events.push_back(event);
    }
}

impl WifiDriver for SimulatedWifi {
    fn stop(&mut self) -> Result<()> {
        let mut state = self.state();
        state.active = None;
        state.events.clear();
        Ok(())
    }

    fn start_ap(&mut self, hostname: &str, ap: &WifiApConfig) -> Result<()> {
        info!("starting access point {} as {hostname}", ap.ssid);
        self.state().active = Some(WifiMode::Ap);
        Ok(())
    }

    fn connect_sta(&mut self, hostname: &str, sta: &WifiStationConfig) -> Result<()> {
        match sta.method {
            IpMethod::Dhcp => info!("connecting to {} as {hostname} using dhcp", sta.ssid),
            IpMethod::Static => info!(
                "connecting to {} as {hostname} with address {}",
                sta.ssid, sta.static_ip.address
            ),
        }

        let mut state = self.state();
        state.active = Some(WifiMode::Sta);
        state.events.extend([
            WifiDriverEvent::StaStarted,
            WifiDriverEvent::StaConnected,
            WifiDriverEvent::GotIp,
        ]);
        Ok(())
    }

    fn reconnect(&mut self) -> Result<()> {
        let mut state = self.state();
        state.reconnects += 1;
        state.events.push_back(WifiDriverEvent::StaConnected);
        Ok(())
    }

    fn poll_event(&mut self) -> Option<WifiDriverEvent> {
        self.state().events.pop_front()
    }
}

/// Applies the Wi-Fi mode, watches the mode button and drives the status LED
pub struct WifiController {
    config: WifiConfig,
    driver: Box<dyn WifiDriver + Send>,
    hardware: Box<dyn Hardware + Send>,
    state: ConnectionState,
    retries: u32,
    update_pending: bool,
    button_ticks: u32,
    started: Instant,
}

impl WifiController {
    pub fn new(
        config: WifiConfig,
        driver: Box<dyn WifiDriver + Send>,
        hardware: Box<dyn Hardware + Send>,
    ) -> Self {
        let mut controller = Self {
            config,
            driver,
            hardware,
            state: ConnectionState::Unknown,
            retries: 0,
            update_pending: false,
            button_ticks: 0,
            started: Instant::now(),
        };
        controller.apply_mode();
        controller
    }

    pub fn config(&self) -> &WifiConfig {
        &self.config
    }

    /// Take over `config`; the radio is reconfigured on the next tick
    pub fn update_config(&mut self, config: WifiConfig) {
        self.config = config;
        self.update_pending = true;
    }

    pub fn status(&self) -> WifiStatus {
        WifiStatus {
            mode: self.config.mode,
            connected: (self.config.mode == WifiMode::Sta).then_some(self.state),
        }
    }

    /// Returns the new config if the mode button switched modes, so it can be persisted
    pub fn tick(&mut self, now: Instant) -> Option<WifiConfig> {
        self.handle_driver_events();

        if self.update_pending {
            self.update_pending = false;
            self.apply_mode();
            return None;
        }

        // mode button is active low
        if self.hardware.read_level(MODE_BUTTON_GPIO) {
            self.button_ticks = 0;
        } else {
            self.button_ticks = self.button_ticks.saturating_add(1);
        }

        let mut switched = None;
        if self.button_ticks == MODE_BUTTON_TICKS {
            self.config.mode = self.config.mode.next();
            info!(
                "switching wifi mode to {:?} because button was pressed",
                self.config.mode
            );
            self.apply_mode();
            switched = Some(self.config.clone());
        }

        self.update_led(now);
        switched
    }

    fn apply_mode(&mut self) {
        self.retries = 0;
        self.state = ConnectionState::Unknown;

        let hostname = self.config.hostname.as_str();
        let result = match self.config.mode {
            WifiMode::Off => self.driver.stop(),
            WifiMode::Ap => self
                .driver
                .stop()
                .and_then(|_| self.driver.start_ap(hostname, &self.config.ap)),
            WifiMode::Sta => self
                .driver
                .stop()
                .and_then(|_| self.driver.connect_sta(hostname, &self.config.sta)),
        };

        if let Err(e) = result {
            error!("failed to apply wifi mode {:?}: {e:#}", self.config.mode);
        }
    }

    fn handle_driver_events(&mut self) {
        while let Some(event) = self.driver.poll_event() {
            debug!("wifi event: {event:?}");
            match event {
                WifiDriverEvent::StaStarted => self.state = ConnectionState::Starting,
                WifiDriverEvent::StaConnected => self.state = ConnectionState::Connected,
                WifiDriverEvent::GotIp => self.state = ConnectionState::IpReceived,
                WifiDriverEvent::StaDisconnected => {
                    self.state = ConnectionState::Disconnected;
                    if self.retries < MAX_RETRIES {
                        self.retries += 1;
                        info!("wifi lost connection, retry {}", self.retries);
                        if let Err(e) = self.driver.reconnect() {
                            error!("failed to reconnect wifi: {e:#}");
                        }
                    }
                }
            }
        }
    }

    fn update_led(&mut self, now: Instant) {
        let millis = now.duration_since(self.started).as_millis();
        let blink = |cycle: u128, value: u128| millis % cycle > value;

        let level = match self.config.mode {
            WifiMode::Off => false,
            WifiMode::Ap => blink(500, 300),
            WifiMode::Sta if self.state.is_connected() => blink(2000, 1500),
            WifiMode::Sta => blink(2000, 500),
        };
        self.hardware.set_level(STATUS_LED_GPIO, level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::SimulatedHardware;
    use std::time::Duration;

    fn config(mode: WifiMode) -> WifiConfig {
        let mut config = WifiConfig::default();
        config.mode = mode;
        config.sta.ssid = "yard".to_string();
        config
    }

    fn controller(mode: WifiMode) -> (WifiController, SimulatedWifi, SimulatedHardware) {
        let driver = SimulatedWifi::new();
        let hardware = SimulatedHardware::new();
        let controller = WifiController::new(
            config(mode),
            Box::new(driver.clone()),
            Box::new(hardware.clone()),
        );
        (controller, driver, hardware)
    }

    mod modes {
        use super::*;

        #[test]
        fn starts_in_configured_mode() {
            let (_, driver, _) = controller(WifiMode::Ap);

            assert_eq!(driver.active(), Some(WifiMode::Ap));
        }

        #[test]
        fn station_connects_and_reports_state() {
            let (mut controller, _, _) = controller(WifiMode::Sta);

            controller.tick(Instant::now());

            assert_eq!(
                controller.status(),
                WifiStatus {
                    mode: WifiMode::Sta,
                    connected: Some(ConnectionState::IpReceived),
                }
            );
        }

        #[test]
        fn access_point_hides_connection_state() {
            let (mut controller, _, _) = controller(WifiMode::Ap);

            controller.tick(Instant::now());

            assert_eq!(controller.status().connected, None);
        }

        #[test]
        fn update_applies_on_next_tick() {
            let (mut controller, driver, _) = controller(WifiMode::Ap);

            controller.update_config(config(WifiMode::Off));
            assert_eq!(driver.active(), Some(WifiMode::Ap));
            assert_eq!(controller.config().mode, WifiMode::Off);

            controller.tick(Instant::now());
            assert_eq!(driver.active(), None);
        }
    }

    mod reconnect {
        use super::*;

        #[test]
        fn gives_up_after_max_retries() {
            let (mut controller, driver, _) = controller(WifiMode::Sta);
            let now = Instant::now();
            controller.tick(now);

            for _ in 0..MAX_RETRIES + 2 {
                driver.push_event(WifiDriverEvent::StaDisconnected);
                controller.tick(now);
            }

            assert_eq!(driver.reconnects(), MAX_RETRIES);
        }
    }

    mod mode_button {
        use super::*;

        #[test]
        fn long_press_cycles_mode_once() {
            let (mut controller, driver, hardware) = controller(WifiMode::Ap);
            let now = Instant::now();
            hardware.set_input(MODE_BUTTON_GPIO, false);

            let switched: Vec<WifiConfig> = (0..MODE_BUTTON_TICKS + 50)
                .filter_map(|_| controller.tick(now))
                .collect();

            assert_eq!(switched.len(), 1);
            assert_eq!(switched[0].mode, WifiMode::Off);
            assert_eq!(driver.active(), None);
        }

        #[test]
        fn short_press_keeps_mode() {
            let (mut controller, _, hardware) = controller(WifiMode::Off);
            let now = Instant::now();

            hardware.set_input(MODE_BUTTON_GPIO, false);
            for _ in 0..MODE_BUTTON_TICKS - 1 {
                assert!(controller.tick(now).is_none());
            }
            hardware.set_input(MODE_BUTTON_GPIO, true);
            assert!(controller.tick(now).is_none());

            assert_eq!(controller.config().mode, WifiMode::Off);
        }
    }

    mod led {
        use super::*;

        #[test]
        fn off_mode_keeps_led_dark() {
            let (mut controller, _, hardware) = controller(WifiMode::Off);

            controller.tick(Instant::now() + Duration::from_millis(450));

            assert_eq!(hardware.output(STATUS_LED_GPIO), Some(false));
        }

        #[test]
        fn connected_station_blinks_slowly() {
            let (mut controller, _, hardware) = controller(WifiMode::Sta);
            let started = controller.started;

            controller.tick(started + Duration::from_millis(1000));
            assert_eq!(hardware.output(STATUS_LED_GPIO), Some(false));

            controller.tick(started + Duration::from_millis(1600));
            assert_eq!(hardware.output(STATUS_LED_GPIO), Some(true));
        }
    }
}
