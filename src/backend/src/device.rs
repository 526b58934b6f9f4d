use crate::{
    controller::OperationController,
    hardware::SimulatedHardware,
    remote::{RemoteSwitchClient, forward_actions},
    status::device_status,
    storage::ConfigurationStorage,
    wifi::{SimulatedWifi, WifiController},
};
use anyhow::{Result, anyhow};
use log::{error, info};
use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use switch_control_core::{
    ChannelConfig, DeviceStatus, ServoStatus, SwitchAction, SwitchDirection, WifiConfig,
};
use tokio::time::MissedTickBehavior;

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| anyhow!("failed to lock {name}: poisoned"))
}

/// Storage and controllers shared by the HTTP handlers and the tick loop
///
/// Locks are taken in the order storage, controller, unsaved_wifi, wifi.
pub struct Device {
    storage: Mutex<ConfigurationStorage>,
    controller: Mutex<OperationController>,
    /// Mode change from the button that could not be written yet
    unsaved_wifi: Mutex<Option<WifiConfig>>,
    wifi: Mutex<WifiController>,
}

impl Device {
    /// Set up every stored channel on `controller`
    pub fn new(
        storage: ConfigurationStorage,
        mut controller: OperationController,
        wifi: WifiController,
    ) -> Self {
        for config in storage.channels() {
            info!("initializing channel {}", config.channel);
            controller.add_channel(&config);
        }

        Self {
            storage: Mutex::new(storage),
            controller: Mutex::new(controller),
            unsaved_wifi: Mutex::new(None),
            wifi: Mutex::new(wifi),
        }
    }

    /// Device backed by simulated pins and radio
    pub fn simulated(storage: ConfigurationStorage) -> Self {
        let hardware = SimulatedHardware::new();
        let controller = OperationController::new(Box::new(hardware.clone()));
        let wifi = WifiController::new(
            storage.wifi().clone(),
            Box::new(SimulatedWifi::new()),
            Box::new(hardware),
        );

        Self::new(storage, controller, wifi)
    }

    pub fn channels(&self) -> Result<Vec<ChannelConfig>> {
        Ok(lock(&self.storage, "storage")?.channels())
    }

    pub fn channel(&self, channel: &str) -> Result<Option<ChannelConfig>> {
        Ok(lock(&self.storage, "storage")?.get_config(channel).cloned())
    }

    /// Persist `config` and reconfigure the channel; `config` must be validated
    pub fn save_channel(&self, config: ChannelConfig) -> Result<()> {
        let mut storage = lock(&self.storage, "storage")?;
        storage.set_config(config.clone())?;
        lock(&self.controller, "controller")?.update_channel(&config);
        Ok(())
    }

    pub fn servo_status(&self) -> Result<Vec<ServoStatus>> {
        Ok(lock(&self.controller, "controller")?.status())
    }

    /// Local custom moves run immediately, everything else is queued
    pub fn switch(&self, action: SwitchAction) -> Result<()> {
        let mut controller = lock(&self.controller, "controller")?;

        if action.direction == SwitchDirection::Custom && action.remote_ip().is_none() {
            controller.force_switch_change(action, Instant::now());
        } else {
            controller.request_switch_change(&[action]);
        }
        Ok(())
    }

    /// Active Wi-Fi config, including a mode change not yet written to disk
    pub fn wifi_config(&self) -> Result<WifiConfig> {
        let storage = lock(&self.storage, "storage")?;
        let unsaved = lock(&self.unsaved_wifi, "unsaved wifi")?;
        Ok(unsaved.clone().unwrap_or_else(|| storage.wifi().clone()))
    }

    pub fn save_wifi(&self, config: WifiConfig) -> Result<()> {
        let mut storage = lock(&self.storage, "storage")?;
        storage.set_wifi(config.clone())?;
        *lock(&self.unsaved_wifi, "unsaved wifi")? = None;
        lock(&self.wifi, "wifi")?.update_config(config);
        Ok(())
    }

    pub fn status(&self) -> Result<DeviceStatus> {
        let wifi = lock(&self.wifi, "wifi")?.status();
        Ok(device_status(wifi))
    }

    /// Run one operation cycle and return the actions to forward to other devices
    ///
    /// Wi-Fi failures are logged only, the taken remote actions are always returned.
    pub fn tick(&self, now: Instant) -> Result<Vec<SwitchAction>> {
        let remote = {
            let mut controller = lock(&self.controller, "controller")?;
            controller.tick(now);
            controller.take_remote_actions()
        };

        let persisted = lock(&self.wifi, "wifi")
            .map(|mut wifi| wifi.tick(now))
            .and_then(|switched| self.persist_wifi(switched));
        if let Err(e) = persisted {
            error!("failed to persist wifi mode change: {e:#}");
        }

        Ok(remote)
    }

    /// Write a mode change, or retry the last one that failed
    fn persist_wifi(&self, switched: Option<WifiConfig>) -> Result<()> {
        let mut storage = lock(&self.storage, "storage")?;
        let mut unsaved = lock(&self.unsaved_wifi, "unsaved wifi")?;

        if let Some(config) = switched {
            *unsaved = Some(config);
        }
        if let Some(config) = unsaved.as_ref() {
            storage.set_wifi(config.clone())?;
            *unsaved = None;
        }
        Ok(())
    }
}

/// Tick `device` every `period` and forward remote actions in the background
pub async fn run_ticker<C>(device: Arc<Device>, client: C, period: Duration)
where
    C: RemoteSwitchClient + Clone + Send + Sync + 'static,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        match device.tick(Instant::now()) {
            Ok(actions) if !actions.is_empty() => {
                let client = client.clone();
                tokio::spawn(async move { forward_actions(&client, actions).await });
            }
            Ok(_) => {}
            Err(e) => error!("tick failed: {e:#}"),
        }
    }
}
