use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::time::Duration;

const DEFAULT_UPLOAD_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    /// How long the simulated image upload takes
    pub simulated_upload_delay: Duration,
    /// Reject category ids missing from the loaded category list
    pub require_known_category: bool,
}

impl WizardConfig {
    pub fn new() -> Self {
        CONFIG.clone()
    }

    /// Builds the config from any key lookup. Malformed values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let simulated_upload_delay = match lookup("SIMULATED_UPLOAD_DELAY_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    tracing::warn!(
                        "SIMULATED_UPLOAD_DELAY_MS={} is not a number, using {}",
                        raw,
                        DEFAULT_UPLOAD_DELAY_MS
                    );
                    Duration::from_millis(DEFAULT_UPLOAD_DELAY_MS)
                }
            },
            None => Duration::from_millis(DEFAULT_UPLOAD_DELAY_MS),
        };

        let require_known_category = match lookup("REQUIRE_KNOWN_CATEGORY") {
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                tracing::warn!("REQUIRE_KNOWN_CATEGORY={} is not a flag, using true", raw);
                true
            }),
            None => true,
        };

        WizardConfig {
            simulated_upload_delay,
            require_known_category,
        }
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        WizardConfig::new()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

static CONFIG: Lazy<WizardConfig> = Lazy::new(|| {
    dotenv().ok();

    let config = WizardConfig::from_lookup(|key| std::env::var(key).ok());

    tracing::info!("Config loaded");

    config
});
