use std::thread;
use switch_control_core::{AppInfo, ChipInfo, DeviceStatus, WifiStatus};

const CHIP_MODEL: &str = "LINUX-SIM";

pub fn app_info() -> AppInfo {
    AppInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        revision: env!("GIT_SHORT_REV").to_string(),
    }
}

pub fn chip_info() -> ChipInfo {
    let cores = thread::available_parallelism()
        .map(|cores| u32::try_from(cores.get()).unwrap_or(u32::MAX))
        .unwrap_or(1);

    ChipInfo {
        model: CHIP_MODEL.to_string(),
        cores,
        revision: 0,
        features: 0,
    }
}

pub fn device_status(wifi: WifiStatus) -> DeviceStatus {
    DeviceStatus {
        wifi,
        app: app_info(),
        chip: chip_info(),
    }
}
