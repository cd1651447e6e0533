//! Application configuration loading.

use crate::paths::TipcardPaths;
use std::fs;
use std::path::Path;
use tipcard_core::config::AppConfig;
use tipcard_core::error::Result;

/// Loads `AppConfig` from a TOML file. A missing file is not an error: the
/// defaults apply.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    Ok(config)
}

/// Loads the config from the default location
/// (`~/.config/tipcard/config.toml`).
pub fn load_default_config() -> Result<AppConfig> {
    load_config(&TipcardPaths::config_file()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
tip_base_url = "https://tips.example.com"

[demo]
email = "demo@example.com"
password = "example1"
org_id = "EXA00001"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.tip_base_url, "https://tips.example.com");
        assert_eq!(config.demo.email, "demo@example.com");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "tip_base_url = [not toml").unwrap();

        assert!(load_config(&path).is_err());
    }
}
