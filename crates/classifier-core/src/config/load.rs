use anyhow::Result;
use inference::FEATURE_ORDER;
use tracing::warn;

use super::types::ServiceConfig;

impl ServiceConfig {
    /// Defaults, then the TOML file (if any), then `EXO_*` environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_file_config()?;
        cfg.apply_env_overrides();
        cfg.warn_unknown_features();
        Ok(cfg)
    }

    fn warn_unknown_features(&self) {
        for name in &self.required_features {
            if !FEATURE_ORDER.contains(&name.as_str()) {
                warn!(feature = %name, "ignoring unknown required feature");
            }
        }
    }
}
