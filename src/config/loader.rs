//! Config file loading

use crate::domain::FileConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Section name that may wrap the settings in a shared config file.
const SECTION: &str = "rich";
const CANDIDATES: [&str; 3] = ["config.toml", "config.yaml", "config.yml"];

/// Load the explicit config file, or the one in the user's config directory.
pub fn load_config(config_path: Option<&Path>) -> Result<FileConfig> {
    let config_dir = dirs::config_dir().map(|dir| dir.join("rich"));
    load_config_from(config_dir.as_deref(), config_path)
}

pub fn load_config_from(config_dir: Option<&Path>, config_path: Option<&Path>) -> Result<FileConfig> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => config_dir.and_then(discover_config),
    };

    let Some(config_file) = discovered else {
        return Ok(FileConfig::default());
    };
    tracing::debug!("loading config from {}", config_file.display());

    let content = match fs::read_to_string(&config_file) {
        Ok(content) => content,
        Err(e) if config_path_provided => {
            return Err(e).with_context(|| format!("Failed reading config file: {}", config_file.display()));
        }
        Err(e) => {
            tracing::warn!("Failed reading config file {}: {}", config_file.display(), e);
            return Ok(FileConfig::default());
        }
    };

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "toml" => parse_toml_config(&content, &config_file),
        "yaml" | "yml" => parse_yaml_config(&content, &config_file),
        other => Err(anyhow::anyhow!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        )),
    };

    match parsed {
        Ok(config) => Ok(config),
        Err(e) if config_path_provided => Err(e),
        Err(e) => {
            // Auto-discovered: warn and fall back to defaults
            tracing::warn!("Failed to parse auto-discovered config {}: {:#}", config_file.display(), e);
            Ok(FileConfig::default())
        }
    }
}

/// Parse TOML config, supporting a nested [rich] section.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<FileConfig> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, supporting a nested `rich:` section.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<FileConfig> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    // An empty file parses as null
    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None if raw.is_null() => return Ok(FileConfig::default()),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(config_dir: &Path) -> Option<PathBuf> {
    CANDIDATES.iter().map(|candidate| config_dir.join(candidate)).find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PanelBox;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults_when_missing() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = load_config_from(Some(tmp.path()), None).expect("config");
        assert_eq!(cfg, FileConfig::default());
        let cfg = load_config_from(None, None).expect("config");
        assert_eq!(cfg, FileConfig::default());
    }

    #[test]
    fn test_load_toml_config() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("config.toml"), "theme = 'monokai'\nline_numbers = true\npanel = 'rounded'\n")
            .expect("write");

        let cfg = load_config_from(Some(tmp.path()), None).expect("config");
        assert_eq!(cfg.theme.as_deref(), Some("monokai"));
        assert_eq!(cfg.line_numbers, Some(true));
        assert_eq!(cfg.panel, Some(PanelBox::Rounded));
    }

    #[test]
    fn test_nested_toml_section() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("shared.toml");
        fs::write(&path, "[rich]\nguides = true\nmax_width = 100\n").expect("write");

        let cfg = load_config_from(None, Some(path.as_path())).expect("config");
        assert_eq!(cfg.guides, Some(true));
        assert_eq!(cfg.max_width, Some(100));
    }

    #[test]
    fn test_load_yaml_config() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("config.yaml"), "rich:\n  rule_char: '='\n  emoji: true\n").expect("write");

        let cfg = load_config_from(Some(tmp.path()), None).expect("config");
        assert_eq!(cfg.rule_char.as_deref(), Some("="));
        assert_eq!(cfg.emoji, Some(true));
    }

    #[test]
    fn test_explicit_config_invalid_type_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "line_numbers = 'yes please'\n").expect("write");

        let result = load_config_from(None, Some(path.as_path()));
        assert!(result.is_err(), "explicit config with invalid type should return Err");
    }

    #[test]
    fn test_explicit_config_unknown_key_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.yaml");
        fs::write(&path, "colour: red\n").expect("write");

        let result = load_config_from(None, Some(path.as_path()));
        assert!(result.is_err(), "unknown keys should be rejected");
    }

    #[test]
    fn test_explicit_missing_file_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let result = load_config_from(None, Some(tmp.path().join("missing.toml").as_path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_auto_discovered_invalid_config_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("config.toml"), "panel = 'sparkly'\n").expect("write");

        let cfg = load_config_from(Some(tmp.path()), None).expect("should not error on auto-discovery");
        assert_eq!(cfg, FileConfig::default());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("config.yml"), "").expect("write");
        let cfg = load_config_from(Some(tmp.path()), None).expect("config");
        assert_eq!(cfg, FileConfig::default());
    }
}
