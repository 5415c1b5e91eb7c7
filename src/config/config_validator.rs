use std::fmt::Write as _;

use crate::config::{
    Config,
    constants::{
        CONTACT_CHECK_THROTTLE, CONTACT_KEY_PREFIX, CONTACT_MIN_TYPED_CHARS, CONTACT_SITE_HOST,
        DETECTION_BUFFER_CAPACITY, INIT_RETRIES, MAX_INIT_RETRIES,
    },
};

/// Collects every problem in `config`, one line per offending field.
pub fn find_config_problems(config: &Config) -> Vec<(&'static str, String)> {
    let mut problems = Vec::new();

    if config.contact_check_throttle_ms == 0 {
        problems.push((CONTACT_CHECK_THROTTLE, "must be greater than zero".to_string()));
    }

    if config.detection_buffer_capacity == 0 {
        problems.push((DETECTION_BUFFER_CAPACITY, "must be greater than zero".to_string()));
    }

    if config.contact_min_typed_chars == 0
        || config.contact_min_typed_chars > config.detection_buffer_capacity
    {
        problems.push((
            CONTACT_MIN_TYPED_CHARS,
            format!(
                "must be between 1 and the detection buffer capacity ({})",
                config.detection_buffer_capacity
            ),
        ));
    }

    if config.init_retries > MAX_INIT_RETRIES {
        problems.push((INIT_RETRIES, format!("must not exceed {MAX_INIT_RETRIES}")));
    }

    if config.contact_key_prefix.trim().is_empty() {
        problems.push((CONTACT_KEY_PREFIX, "must not be empty".to_string()));
    }

    if config.per_contact_mode && config.contact_site_host.trim().is_empty() {
        problems.push((
            CONTACT_SITE_HOST,
            "must not be empty when per_contact_mode is on".to_string(),
        ));
    }

    problems
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        let problems = find_config_problems(self);
        if problems.is_empty() {
            return Ok(());
        }

        let mut error = String::from("Invalid configuration:\n\n");
        for (field, message) in &problems {
            // `String` implements `fmt::Write` infallibly.
            let _ = writeln!(error, "• '{field}' {message}");
        }
        error.push_str("\nFix the listed fields and reload.");
        Err(error)
    }
}
