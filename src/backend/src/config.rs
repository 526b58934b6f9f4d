use anyhow::{Context, Result};
use std::{env, path::PathBuf, sync::OnceLock, time::Duration};

/// Application configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// UI server configuration
    pub ui: UiConfig,

    /// Path configuration
    pub paths: PathConfig,

    /// Operation loop configuration
    pub controller: ControllerConfig,
}

#[derive(Clone, Debug)]
pub struct UiConfig {
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct PathConfig {
    /// Directory holding one JSON file per channel plus `wifi.json`
    pub config_dir: PathBuf,
    /// Built web UI served for all non-API paths
    pub ui_dist_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct ControllerConfig {
    pub tick_interval: Duration,
    pub remote_timeout: Duration,
}

impl AppConfig {
    /// Get or load the application configuration
    ///
    /// Returns a reference to the cached configuration. On first call, it loads
    /// and validates all configuration from environment variables. Subsequent
    /// calls return the cached instance.
    ///
    /// # Panics
    /// Panics if configuration loading fails. This is intentional as the
    /// application cannot function without valid configuration.
    pub fn get() -> &'static Self {
        static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();
        APP_CONFIG.get_or_init(|| {
            Self::load_internal().expect("failed to load application configuration")
        })
    }

    fn load_internal() -> Result<Self> {
        let ui = UiConfig::load()?;
        let paths = PathConfig::load()?;
        let controller = ControllerConfig::load()?;

        Ok(Self {
            ui,
            paths,
            controller,
        })
    }
}

impl UiConfig {
    fn load() -> Result<Self> {
        let port = env::var("UI_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("failed to parse UI_PORT: invalid format")?;

        Ok(Self { port })
    }
}

impl PathConfig {
    fn load() -> Result<Self> {
        let config_dir = env::var("CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_config_dir());

        std::fs::create_dir_all(&config_dir).context("failed to create config directory")?;

        let ui_dist_dir = env::var("UI_DIST_DIR")
            .unwrap_or_else(|_| "/data/ui".to_string())
            .into();

        Ok(Self {
            config_dir,
            ui_dist_dir,
        })
    }

    #[cfg(not(any(test, feature = "mock")))]
    fn default_config_dir() -> PathBuf {
        PathBuf::from("/data/config")
    }

    // In test mode, use temp directory as default to avoid /data requirement
    #[cfg(any(test, feature = "mock"))]
    fn default_config_dir() -> PathBuf {
        std::env::temp_dir().join("switch-control-test")
    }
}

impl ControllerConfig {
    fn load() -> Result<Self> {
        let tick_interval = env::var("TICK_INTERVAL_MS")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<u64>()
            .context("failed to parse TICK_INTERVAL_MS: invalid format")?;
        anyhow::ensure!(tick_interval > 0, "TICK_INTERVAL_MS must not be 0");

        let remote_timeout = env::var("REMOTE_TIMEOUT_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse::<u64>()
            .context("failed to parse REMOTE_TIMEOUT_MS: invalid format")?;

        Ok(Self {
            tick_interval: Duration::from_millis(tick_interval),
            remote_timeout: Duration::from_millis(remote_timeout),
        })
    }
}
