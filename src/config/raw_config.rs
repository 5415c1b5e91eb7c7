use std::path::PathBuf;

use serde::Deserialize;

use super::{Config, ManualToggle, SignalTransport};

/// Unvalidated on-disk shape of [`Config`]. Missing fields take defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawConfig {
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

impl Default for RawConfig {
    fn default() -> Self {
        let d = Config::default();
        Self {
            contact_check_throttle_ms: d.contact_check_throttle_ms,
            contact_click_delay_ms: d.contact_click_delay_ms,
            detection_buffer_capacity: d.detection_buffer_capacity,
            contact_min_typed_chars: d.contact_min_typed_chars,
            init_delay_ms: d.init_delay_ms,
            init_retries: d.init_retries,
            init_retry_backoff_ms: d.init_retry_backoff_ms,
            visibility_retries: d.visibility_retries,
            trigger_cleanup_delay_ms: d.trigger_cleanup_delay_ms,
            switch_on_detection: d.switch_on_detection,
            per_contact_mode: d.per_contact_mode,
            contact_site_host: d.contact_site_host,
            contact_key_prefix: d.contact_key_prefix,
            manual_toggle: d.manual_toggle,
            signal: d.signal,
            state_file: d.state_file,
            trigger_dir: d.trigger_dir,
            log_dir: d.log_dir,
        }
    }
}
