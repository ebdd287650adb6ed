use log::warn;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "phoneapi";
const FILE_NAME: Option<&str> = None;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct UserConfig {
  /// Region used to parse numbers written without a leading `+`.
  pub default_region: String,
  pub host: String,
  pub port: u16,
  /// Decorate results with ISO 3166 country records.
  pub country_registry: bool,
}

impl Default for UserConfig {
  fn default() -> Self {
    Self {
      default_region: "FR".to_string(),
      host: "127.0.0.1".to_string(),
      port: 5000,
      country_registry: true,
    }
  }
}

impl UserConfig {
  pub fn bind_addr(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

/// Read ~/.config/phoneapi/default-config.toml (or OS equivalent).
pub fn load() -> UserConfig {
  confy::load(APP_NAME, FILE_NAME).unwrap_or_else(|e| {
    warn!("Could not load config file, using defaults: {e}");
    UserConfig::default()
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let cfg = UserConfig::default();
    assert_eq!(cfg.default_region, "FR");
    assert_eq!(cfg.bind_addr(), "127.0.0.1:5000");
    assert!(cfg.country_registry);
  }

  #[test]
  fn test_missing_fields_use_defaults() {
    let cfg: UserConfig =
      serde_json::from_str(r#"{"port": 8080, "country_registry": false}"#)
        .expect("partial config should deserialize");
    assert_eq!(cfg.port, 8080);
    assert!(!cfg.country_registry);
    assert_eq!(cfg.default_region, "FR");
    assert_eq!(cfg.host, "127.0.0.1");
  }
}
