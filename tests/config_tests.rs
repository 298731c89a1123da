use arrow_admin_lib::config::WizardConfig;
use std::collections::HashMap;
use std::time::Duration;

fn config_from(pairs: &[(&str, &str)]) -> WizardConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    WizardConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults_when_nothing_is_set() {
    let config = config_from(&[]);

    assert_eq!(config.simulated_upload_delay, Duration::from_millis(1000));
    assert!(config.require_known_category);
}

#[test]
fn test_values_are_read_from_lookup() {
    let config = config_from(&[
        ("SIMULATED_UPLOAD_DELAY_MS", "250"),
        ("REQUIRE_KNOWN_CATEGORY", "false"),
    ]);

    assert_eq!(config.simulated_upload_delay, Duration::from_millis(250));
    assert!(!config.require_known_category);
}

#[test]
fn test_malformed_values_fall_back_to_defaults() {
    let config = config_from(&[
        ("SIMULATED_UPLOAD_DELAY_MS", "soon"),
        ("REQUIRE_KNOWN_CATEGORY", "maybe"),
    ]);

    assert_eq!(config.simulated_upload_delay, Duration::from_millis(1000));
    assert!(config.require_known_category);
}

#[test]
fn test_flag_accepts_common_spellings() {
    assert!(!config_from(&[("REQUIRE_KNOWN_CATEGORY", "0")]).require_known_category);
    assert!(!config_from(&[("REQUIRE_KNOWN_CATEGORY", "Off")]).require_known_category);
    assert!(config_from(&[("REQUIRE_KNOWN_CATEGORY", " YES ")]).require_known_category);
}
