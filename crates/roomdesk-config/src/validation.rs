//! Configuration validation. Collects every problem before failing.

use roomdesk_common::ConfigError;

use crate::schema::RoomdeskConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &RoomdeskConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if let Err(e) = validate_scheme(config.scheme()) {
        errors.push(e);
    }

    if config.updates.enabled {
        let url = config.feed_url();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("updates.feed_url must be an http(s) URL, got `{url}`"));
        }
    }
    if config.updates.channel.trim().is_empty() {
        errors.push("updates.channel must not be empty".to_string());
    }
    let cache = &config.updates.cache_dir_name;
    if cache.trim().is_empty() || cache.contains(['/', '\\']) || cache == ".." {
        errors.push(format!(
            "updates.cache_dir_name must be a single directory name, got `{cache}`"
        ));
    }
    validate_positive(&mut errors, "updates.check_interval_secs", config.updates.check_interval_secs);

    validate_positive(&mut errors, "windows.main_min_width", config.windows.main_min_width.into());
    validate_positive(&mut errors, "windows.main_min_height", config.windows.main_min_height.into());
    validate_positive(&mut errors, "windows.whiteboard_width", config.windows.whiteboard_width.into());
    validate_positive(&mut errors, "windows.whiteboard_height", config.windows.whiteboard_height.into());
    validate_positive(
        &mut errors,
        "windows.display_tolerance_px",
        config.windows.display_tolerance_px.into(),
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// A URL scheme is a letter followed by letters, digits, `+`, `-` or `.`.
fn validate_scheme(scheme: &str) -> Result<(), String> {
    let mut chars = scheme.chars();
    match chars.next() {
        None => return Err("protocol.scheme must not be empty".to_string()),
        Some(c) if !c.is_ascii_alphabetic() => {
            return Err(format!("protocol.scheme must start with a letter, got `{scheme}`"));
        }
        Some(_) => {}
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Ok(())
    } else {
        Err(format!("protocol.scheme contains invalid characters: `{scheme}`"))
    }
}

fn validate_positive(errors: &mut Vec<String>, name: &str, value: u64) {
    if value == 0 {
        errors.push(format!("{name} must be greater than zero"));
    }
}
