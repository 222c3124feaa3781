use publish_props_core::{PropagationConfig, PublishPropsConfig, PublishingType};
use tempfile::TempDir;

#[test]
fn load_returns_defaults_when_no_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = PublishPropsConfig::load(tmp.path()).unwrap();

    assert_eq!(config.propagation.property_file, "publish.properties");
    assert_eq!(config.variants.release, "release");
    assert_eq!(config.variants.declared, vec!["debug", "release"]);
    assert_eq!(config.publishing.publishing_type, PublishingType::UserManaged);
}

#[test]
fn load_parses_full_config() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[propagation]
property_file = "secrets/local.properties"

[variants]
release = "prod"
declared = ["dev", "staging", "prod"]

[publishing]
publishing_type = "AUTOMATIC"
"#;
    std::fs::write(tmp.path().join("publish-props.toml"), toml).unwrap();

    let config = PublishPropsConfig::load(tmp.path()).unwrap();

    assert_eq!(config.propagation.property_file, "secrets/local.properties");
    assert_eq!(config.variants.release, "prod");
    assert_eq!(config.variants.declared, vec!["dev", "staging", "prod"]);
    assert_eq!(config.publishing.publishing_type, PublishingType::Automatic);
}

#[test]
fn load_partial_config_fills_defaults() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[variants]
release = "prod"
"#;
    std::fs::write(tmp.path().join("publish-props.toml"), toml).unwrap();

    let config = PublishPropsConfig::load(tmp.path()).unwrap();

    assert_eq!(config.variants.release, "prod");
    // Defaults preserved
    assert_eq!(config.variants.declared, vec!["debug", "release"]);
    assert_eq!(config.propagation.property_file, "publish.properties");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("publish-props.toml"), "not valid {{{{ toml").unwrap();

    let result = PublishPropsConfig::load(tmp.path());
    assert!(result.is_err());

    let err = result.unwrap_err().to_string();
    assert!(err.contains("parse"));
}

#[test]
fn load_empty_config_returns_defaults() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("publish-props.toml"), "").unwrap();

    let config = PublishPropsConfig::load(tmp.path()).unwrap();
    assert_eq!(config, PublishPropsConfig::default());
}

#[test]
fn propagation_config_uses_settings_file() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("publish-props.toml"),
        "[propagation]\nproperty_file = \"local.properties\"\n",
    )
    .unwrap();

    let config = PropagationConfig::load(tmp.path()).unwrap();

    assert_eq!(
        config.property_file_path(),
        tmp.path().join("local.properties")
    );
}
