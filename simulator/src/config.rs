//! Simulator configuration.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

use bondswap_common::Address;
use bondswap_predicate::params::{
    TEMPLATE_VARIABLES, TMPL_APPLICATION_ID, TMPL_APP_MANAGER, TMPL_NEW_BOND, TMPL_OLD_BOND,
};
use bondswap_predicate::{BoundParameters, TemplateError};

/// Main simulator configuration.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Template variable values for the predicate instance.
    pub template: HashMap<String, String>,
    /// Log level.
    pub log_level: String,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        let template = HashMap::from([
            (TMPL_OLD_BOND.to_string(), "1001".to_string()),
            (TMPL_NEW_BOND.to_string(), "1002".to_string()),
            (TMPL_APPLICATION_ID.to_string(), "77".to_string()),
            (
                TMPL_APP_MANAGER.to_string(),
                Address::new([0x4d; 32]).to_string(),
            ),
        ]);

        Self {
            template,
            log_level: "info".to_string(),
        }
    }
}

impl SimulatorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        for name in TEMPLATE_VARIABLES {
            if let Ok(value) = std::env::var(name) {
                config.template.insert(name.to_string(), value);
            }
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Override template values from a JSON object of `TMPL_*` keys.
    ///
    /// Values may be JSON strings or numbers.
    pub fn merge_params_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading parameters from {}", path.display()))?;
        let values: HashMap<String, serde_json::Value> = serde_json::from_str(&text)
            .with_context(|| format!("parsing parameters from {}", path.display()))?;

        for (name, value) in values {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                other => anyhow::bail!("{name} must be a string or number, got {other}"),
            };
            self.template.insert(name, value);
        }

        Ok(())
    }

    /// Bind the configured template values.
    pub fn bound_parameters(&self) -> Result<BoundParameters, TemplateError> {
        BoundParameters::from_template_map(&self.template)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.log_level.is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        self.bound_parameters()
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulatorConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = SimulatorConfig::default();
        config.template.remove(TMPL_APP_MANAGER);
        assert!(config.validate().is_err());

        let mut config = SimulatorConfig::default();
        config.log_level.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_params_file() {
        let path = std::env::temp_dir().join(format!(
            "bondswap-params-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"TMPL_OLD_BOND": 5, "TMPL_NEW_BOND": "6"}"#).unwrap();

        let mut config = SimulatorConfig::default();
        config.merge_params_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let params = config.bound_parameters().unwrap();
        assert_eq!(params.old_asset_id().0, 5);
        assert_eq!(params.new_asset_id().0, 6);
    }
}
