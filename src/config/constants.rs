pub const APP_NAME: &str = "autolang";
pub const CONFIG_NAME: &str = "config";
pub const HOME_ENV: &str = "AUTOLANG_HOME";

pub const STATE_FILE: &str = "state.json";
pub const LOG_DIR: &str = "logs";
pub const LOG_FILE: &str = "autolang.log";
pub const TRIGGER_DIR: &str = "autolang";

/// Storage key holding the tab-id -> label snapshot.
pub const TAB_LANGUAGES_KEY: &str = "tabLanguages";

pub const MAX_INIT_RETRIES: u32 = 10;

// Field names used in validation messages.
pub const CONTACT_CHECK_THROTTLE: &str = "contact_check_throttle_ms";
pub const CONTACT_MIN_TYPED_CHARS: &str = "contact_min_typed_chars";
pub const DETECTION_BUFFER_CAPACITY: &str = "detection_buffer_capacity";
pub const INIT_RETRIES: &str = "init_retries";
pub const CONTACT_KEY_PREFIX: &str = "contact_key_prefix";
pub const CONTACT_SITE_HOST: &str = "contact_site_host";
