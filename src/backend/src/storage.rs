use anyhow::{Context, Result, bail};
use log::{debug, error, info};
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use switch_control_core::{CHANNEL_PINS, ChannelConfig, WifiConfig};

const WIFI_FILE: &str = "wifi.json";

/// Persistent channel and Wi-Fi configuration, one JSON file per entry
#[derive(Debug)]
pub struct ConfigurationStorage {
    dir: PathBuf,
    channels: BTreeMap<String, ChannelConfig>,
    wifi: WifiConfig,
}

impl ConfigurationStorage {
    /// Load every known channel and the Wi-Fi config from `dir`
    ///
    /// Missing or invalid entries are replaced by their defaults, which are
    /// written back so the directory is complete afterwards.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;

        let mut channels = BTreeMap::new();
        for pin in CHANNEL_PINS.iter() {
            let config = load_channel(&dir, pin.channel)?;
            channels.insert(pin.channel.to_string(), config);
        }

        let wifi = load_wifi(&dir)?;

        info!("loaded {} channel configs from {}", channels.len(), dir.display());

        Ok(Self {
            dir,
            channels,
            wifi,
        })
    }

    pub fn has_config(&self, channel: &str) -> bool {
        self.channels.contains_key(channel)
    }

    pub fn get_config(&self, channel: &str) -> Option<&ChannelConfig> {
        self.channels.get(channel)
    }

    /// All channel configs ordered by channel name
    pub fn channels(&self) -> Vec<ChannelConfig> {
        self.channels.values().cloned().collect()
    }

    pub fn set_config(&mut self, config: ChannelConfig) -> Result<()> {
        if !self.has_config(&config.channel) {
            bail!("unknown channel {}", config.channel);
        }

        write_json(&channel_path(&self.dir, &config.channel), &config)?;
        self.channels.insert(config.channel.clone(), config);
        Ok(())
    }

    pub fn wifi(&self) -> &WifiConfig {
        &self.wifi
    }

    pub fn set_wifi(&mut self, config: WifiConfig) -> Result<()> {
        write_json(&self.dir.join(WIFI_FILE), &config)?;
        self.wifi = config;
        Ok(())
    }
}

fn channel_path(dir: &Path, channel: &str) -> PathBuf {
    dir.join(format!("{channel}.json"))
}

fn load_channel(dir: &Path, channel: &str) -> Result<ChannelConfig> {
    let path = channel_path(dir, channel);

    let loaded = read_json::<ChannelConfig>(&path).and_then(|config| match config {
        Some(config) if config.channel != channel => {
            bail!("file belongs to channel {}", config.channel)
        }
        Some(config) => {
            config.validate().map_err(anyhow::Error::msg)?;
            Ok(Some(config))
        }
        None => Ok(None),
    });

    match loaded {
        Ok(Some(config)) => Ok(config),
        Ok(None) => {
            debug!("no config for channel {channel}, writing default");
            write_default(&path, ChannelConfig::disabled(channel))
        }
        Err(e) => {
            error!("invalid config for channel {channel}, resetting: {e:#}");
            write_default(&path, ChannelConfig::disabled(channel))
        }
    }
}

fn load_wifi(dir: &Path) -> Result<WifiConfig> {
    let path = dir.join(WIFI_FILE);

    match read_json::<WifiConfig>(&path) {
        Ok(Some(config)) => Ok(config),
        Ok(None) => {
            debug!("no wifi config, writing default");
            write_default(&path, WifiConfig::default())
        }
        Err(e) => {
            error!("invalid wifi config, resetting: {e:#}");
            write_default(&path, WifiConfig::default())
        }
    }
}

fn write_default<T: Serialize>(path: &Path, config: T) -> Result<T> {
    write_json(path, &config)?;
    Ok(config)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
    };

    serde_json::from_str(&content)
        .map(Some)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).context("failed to serialize config")?;
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
