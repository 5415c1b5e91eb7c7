pub mod config_validator;
pub mod constants;
pub mod raw_config;

use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

pub use raw_config::RawConfig;
use serde::{Deserialize, Deserializer, Serialize};

use constants::{APP_NAME, CONFIG_NAME, HOME_ENV, LOG_DIR, STATE_FILE, TRIGGER_DIR};

/// Key chord that flips the layout by hand. The user has already switched,
/// so a toggle updates remembered state without asking for an external switch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ManualToggle {
    #[default]
    AltShift,
    CtrlShift,
    Disabled,
}

/// Transport used to reach the out-of-process layout switcher.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignalTransport {
    #[default]
    TriggerFile,
    Disabled,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Config {
    pub contact_check_throttle_ms: u64,
    pub contact_click_delay_ms: u64,
    pub detection_buffer_capacity: usize,
    pub contact_min_typed_chars: usize,

    pub init_delay_ms: u64,
    pub init_retries: u32,
    pub init_retry_backoff_ms: u64,
    pub visibility_retries: u32,

    pub trigger_cleanup_delay_ms: u64,
    pub switch_on_detection: bool,

    pub per_contact_mode: bool,
    pub contact_site_host: String,
    pub contact_key_prefix: String,

    pub manual_toggle: ManualToggle,
    pub signal: SignalTransport,

    pub state_file: Option<PathBuf>,
    pub trigger_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contact_check_throttle_ms: 500,
            contact_click_delay_ms: 300,
            detection_buffer_capacity: 10,
            contact_min_typed_chars: 3,

            init_delay_ms: 100,
            init_retries: 3,
            init_retry_backoff_ms: 200,
            visibility_retries: 1,

            trigger_cleanup_delay_ms: 5000,
            switch_on_detection: true,

            per_contact_mode: true,
            contact_site_host: "web.whatsapp.com".to_string(),
            contact_key_prefix: "whatsapp_contact_".to_string(),

            manual_toggle: ManualToggle::AltShift,
            signal: SignalTransport::TriggerFile,

            state_file: None,
            trigger_dir: None,
            log_dir: None,
        }
    }
}

/// Directory holding config, state and logs.
///
/// `AUTOLANG_HOME` wins; otherwise confy's per-platform location is used.
pub fn home_dir() -> io::Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }

    let path = confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(confy_err)?;
    path.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "config path has no parent"))
}

pub fn config_path() -> io::Result<PathBuf> {
    Ok(home_dir()?.join(format!("{CONFIG_NAME}.toml")))
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    std::fs::create_dir_all(dir)
}

fn confy_err(e: confy::ConfyError) -> io::Error {
    io::Error::other(e)
}

pub fn load() -> io::Result<Config> {
    let path = config_path()?;
    ensure_parent_dir(&path)?;

    confy::load_path(&path).map_err(confy_err)
}

pub fn save(cfg: &Config) -> io::Result<()> {
    cfg.validate()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let path = config_path()?;
    ensure_parent_dir(&path)?;
    confy::store_path(path, cfg).map_err(confy_err)
}

impl TryFrom<RawConfig> for Config {
    type Error = String;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let cfg = Self {
            contact_check_throttle_ms: raw.contact_check_throttle_ms,
            contact_click_delay_ms: raw.contact_click_delay_ms,
            detection_buffer_capacity: raw.detection_buffer_capacity,
            contact_min_typed_chars: raw.contact_min_typed_chars,
            init_delay_ms: raw.init_delay_ms,
            init_retries: raw.init_retries,
            init_retry_backoff_ms: raw.init_retry_backoff_ms,
            visibility_retries: raw.visibility_retries,
            trigger_cleanup_delay_ms: raw.trigger_cleanup_delay_ms,
            switch_on_detection: raw.switch_on_detection,
            per_contact_mode: raw.per_contact_mode,
            contact_site_host: raw.contact_site_host,
            contact_key_prefix: raw.contact_key_prefix,
            manual_toggle: raw.manual_toggle,
            signal: raw.signal,
            state_file: raw.state_file,
            trigger_dir: raw.trigger_dir,
            log_dir: raw.log_dir,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawConfig::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl Config {
    pub fn contact_check_throttle(&self) -> Duration {
        Duration::from_millis(self.contact_check_throttle_ms)
    }

    pub fn contact_click_delay(&self) -> Duration {
        Duration::from_millis(self.contact_click_delay_ms)
    }

    pub fn init_delay(&self) -> Duration {
        Duration::from_millis(self.init_delay_ms)
    }

    pub fn init_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.init_retry_backoff_ms)
    }

    pub fn trigger_cleanup_delay(&self) -> Duration {
        Duration::from_millis(self.trigger_cleanup_delay_ms)
    }

    pub fn state_file_in(&self, home: &Path) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| home.join(STATE_FILE))
    }

    pub fn log_dir_in(&self, home: &Path) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| home.join(LOG_DIR))
    }

    pub fn trigger_dir(&self) -> PathBuf {
        self.trigger_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(TRIGGER_DIR))
    }
}
