// Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report format (cunit, junit)
    #[serde(default = "default_format")]
    pub format: String,

    /// Root of the report file names
    #[serde(default)]
    pub output_root: Option<String>,

    /// Package name prefixed to generated identifiers
    #[serde(default)]
    pub package_name: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            output_root: None,
            package_name: None,
        }
    }
}

// Default values
pub const ENV_TESTREPORT_OUTPUT_ROOT: &str = "TESTREPORT_OUTPUT_ROOT";

pub const CONFIG_FILE_NAME: &str = ".testreportrc.toml";

pub fn default_format() -> String {
    String::from("cunit")
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // Check locations in order:
        // 1. .testreportrc.toml (current directory)
        // 2. ~/.testreportrc.toml (home directory)

        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(CONFIG_FILE_NAME));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(CONFIG_FILE_NAME));
        }

        paths
            .iter()
            .find(|path| path.exists())
            .and_then(|path| Self::load_from_file(path))
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Generate configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[report]
format = "junit"
output_root = "build/results"
package_name = "com.example"
"#;

        let config = Config::parse(toml).expect("Failed to parse config");
        assert_eq!(config.report.format, "junit");
        assert_eq!(config.report.output_root.as_deref(), Some("build/results"));
        assert_eq!(config.report.package_name.as_deref(), Some("com.example"));
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").expect("Failed to parse config");
        assert_eq!(config.report.format, "cunit");
        assert!(config.report.output_root.is_none());
    }

    #[test]
    fn test_toml_round_trip_keeps_format() {
        let config = Config::default();
        let parsed = Config::parse(&config.to_toml()).expect("Failed to parse generated config");
        assert_eq!(parsed.report.format, config.report.format);
    }
}
