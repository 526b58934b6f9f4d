use serde::{Deserialize, Serialize};

use super::wifi::WifiMode;

/// Station connection progress as reported by the Wi-Fi driver
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Unknown,
    Starting,
    Connected,
    IpReceived,
    Disconnected,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected | Self::IpReceived)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WifiStatus {
    pub mode: WifiMode,
    /// Only reported in station mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected: Option<ConnectionState>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub revision: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChipInfo {
    pub model: String,
    pub cores: u32,
    pub revision: u32,
    pub features: u32,
}

/// Response of `GET /api/status`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceStatus {
    pub wifi: WifiStatus,
    pub app: AppInfo,
    pub chip: ChipInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_point_status_has_no_connection_state() {
        let status = WifiStatus {
            mode: WifiMode::Ap,
            connected: None,
        };

        assert_eq!(
            serde_json::to_value(status).unwrap(),
            serde_json::json!({"mode": "AP"})
        );
    }

    #[test]
    fn parses_station_status() {
        let json = r#"{
            "wifi": {"mode": "STA", "connected": "IpReceived"},
            "app": {"name": "switch-control", "version": "0.1.0", "revision": "abc1234"},
            "chip": {"model": "LINUX-SIM", "cores": 4, "revision": 0, "features": 0}
        }"#;

        let status: DeviceStatus = serde_json::from_str(json).unwrap();

        assert_eq!(status.wifi.mode, WifiMode::Sta);
        assert!(status.wifi.connected.is_some_and(ConnectionState::is_connected));
        assert_eq!(status.chip.cores, 4);
    }
}
