use plugwiz::config::{load_settings, parse_settings, Settings, WizardConfig};
use plugwiz::constants::SETTINGS_FILES;
use plugwiz::error::Error;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_parse_json_settings() {
    let settings = parse_settings(
        r#"{"author": "Jane Doe", "plugin_type": "jsplugin", "excludes": ["*.bak"]}"#,
    )
    .unwrap();
    assert_eq!(settings.author.as_deref(), Some("Jane Doe"));
    assert_eq!(settings.plugin_type.as_deref(), Some("jsplugin"));
    assert_eq!(settings.excludes, vec!["*.bak".to_string()]);
    assert!(settings.org.is_none());
}

#[test]
fn test_parse_yaml_settings() {
    let settings = parse_settings("org: ACME\nrules_file: shared/rules.txt\n").unwrap();
    assert_eq!(settings.org.as_deref(), Some("ACME"));
    assert_eq!(settings.rules_file, Some(PathBuf::from("shared/rules.txt")));
}

#[test]
fn test_invalid_settings() {
    assert!(matches!(parse_settings("colour: blue\n"), Err(Error::SettingsError(_))));
    assert!(matches!(parse_settings("author: [unclosed"), Err(Error::SettingsError(_))));
}

#[test]
fn test_load_settings() {
    let temp_dir = TempDir::new().unwrap();
    assert_eq!(load_settings(temp_dir.path(), &SETTINGS_FILES).unwrap(), None);

    fs::write(temp_dir.path().join("plugwiz.yml"), "author: From Yaml\n").unwrap();
    let settings = load_settings(temp_dir.path(), &SETTINGS_FILES).unwrap().unwrap();
    assert_eq!(settings.author.as_deref(), Some("From Yaml"));

    fs::write(temp_dir.path().join("plugwiz.json"), r#"{"author": "From Json"}"#).unwrap();
    let settings = load_settings(temp_dir.path(), &SETTINGS_FILES).unwrap().unwrap();
    assert_eq!(settings, Settings { author: Some("From Json".into()), ..Default::default() });
}

#[test]
fn test_validate() {
    let temp_dir = TempDir::new().unwrap();
    let collection = temp_dir.path();

    let config = WizardConfig::new("1000005", "Foo", collection.join("missing"));
    assert!(matches!(config.validate(), Err(Error::ConfigurationError(_))));

    let config = WizardConfig::new("1000005", "Foo", collection);
    assert!(config.validate().is_err(), "blueprint directory does not exist yet");

    fs::create_dir(collection.join("cmdplugin")).unwrap();
    assert!(config.validate().is_ok());

    assert!(WizardConfig::new("", "Foo", collection).validate().is_err());
    assert!(WizardConfig::new("1000005", "", collection).validate().is_err());
    assert!(WizardConfig::new("1000005", "a/b", collection).validate().is_err());
    assert!(WizardConfig::new("42", "Foo", collection).validate().is_ok());

    let mut config = WizardConfig::new("", "", collection);
    config.testing_fallbacks = true;
    assert!(config.validate().is_ok());
}

#[test]
fn test_plugin_name_must_be_a_directory_name() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("cmdplugin")).unwrap();

    for name in [".", "..", "...", "a/b", "a\\b"] {
        let config = WizardConfig::new("1000005", name, temp_dir.path());
        assert!(matches!(config.validate(), Err(Error::ConfigurationError(_))), "{name:?}");
    }
    assert!(WizardConfig::new("1000005", ".Foo", temp_dir.path()).validate().is_ok());
}

#[test]
fn test_missing_blueprint_lists_available_ones() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = WizardConfig::new("1000005", "Foo", temp_dir.path());
    config.plugin_type = "nope".to_string();

    let Err(Error::ConfigurationError(message)) = config.validate() else {
        panic!("expected a configuration error");
    };
    assert!(message.ends_with("(none available)"), "{message}");

    fs::create_dir(temp_dir.path().join("cmdplugin")).unwrap();
    fs::create_dir(temp_dir.path().join("jsplugin")).unwrap();
    let Err(Error::ConfigurationError(message)) = config.validate() else {
        panic!("expected a configuration error");
    };
    assert!(message.ends_with("(available: cmdplugin, jsplugin)"), "{message}");
}
