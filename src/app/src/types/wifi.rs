use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Shortest passphrase a WPA2 access point accepts
pub const MIN_AP_PASSPHRASE_LEN: usize = 8;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum WifiMode {
    Off,
    #[serde(rename = "STA")]
    Sta,
    #[default]
    #[serde(rename = "AP")]
    Ap,
}

impl WifiMode {
    /// Mode selected by the mode button after this one
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::Sta,
            Self::Sta => Self::Ap,
            Self::Ap => Self::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IpMethod {
    #[default]
    Dhcp,
    Static,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaticIpConfig {
    pub address: String,
    pub gateway: String,
    pub netmask: String,
}

impl Default for StaticIpConfig {
    fn default() -> Self {
        Self {
            address: "192.168.178.30".to_string(),
            gateway: "192.168.178.1".to_string(),
            netmask: "255.255.255.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WifiStationConfig {
    pub ssid: String,
    pub passphrase: String,
    #[serde(default)]
    pub method: IpMethod,
    #[serde(default)]
    pub static_ip: StaticIpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WifiApConfig {
    pub ssid: String,
    pub passphrase: String,
}

impl Default for WifiApConfig {
    fn default() -> Self {
        Self {
            ssid: "switch-control".to_string(),
            passphrase: "emergency".to_string(),
        }
    }
}

/// Wi-Fi settings of the device
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WifiConfig {
    pub mode: WifiMode,
    pub hostname: String,
    #[serde(default)]
    pub sta: WifiStationConfig,
    #[serde(default)]
    pub ap: WifiApConfig,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            mode: WifiMode::default(),
            hostname: "switch-control".to_string(),
            sta: WifiStationConfig::default(),
            ap: WifiApConfig::default(),
        }
    }
}

fn check_ipv4(field: &str, value: &str) -> Result<(), String> {
    value
        .parse::<Ipv4Addr>()
        .map(|_| ())
        .map_err(|_| format!("Invalid {field}: {value}"))
}

impl WifiConfig {
    /// Checks only the settings the selected mode actually uses
    pub fn validate(&self) -> Result<(), String> {
        match self.mode {
            WifiMode::Off => Ok(()),
            WifiMode::Ap => {
                if self.ap.ssid.is_empty() {
                    return Err("Access point SSID must not be empty".to_string());
                }
                if !self.ap.passphrase.is_empty()
                    && self.ap.passphrase.len() < MIN_AP_PASSPHRASE_LEN
                {
                    return Err(format!(
                        "Access point passphrase needs at least {MIN_AP_PASSPHRASE_LEN} characters"
                    ));
                }
                Ok(())
            }
            WifiMode::Sta => {
                if self.sta.ssid.is_empty() {
                    return Err("Station SSID must not be empty".to_string());
                }
                if self.sta.method == IpMethod::Static {
                    let ip = &self.sta.static_ip;
                    check_ipv4("address", &ip.address)?;
                    check_ipv4("gateway", &ip.gateway)?;
                    check_ipv4("netmask", &ip.netmask)?;
                }
                Ok(())
            }
        }
    }
}
