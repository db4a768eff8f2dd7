use testreport::config::Config;

#[test]
fn test_default_config_values() {
    let config = Config::default();

    assert_eq!(config.report.format, "cunit");
    assert!(config.report.output_root.is_none());
    assert!(config.report.package_name.is_none());
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(".testreportrc.toml");
    std::fs::write(&path, "[report]\nformat = \"junit\"\n").expect("Failed to write config");

    let config = Config::load_from_file(&path).expect("Failed to load config");
    assert_eq!(config.report.format, "junit");
}
