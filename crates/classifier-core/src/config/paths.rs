use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use super::constants::{CONFIG_CANDIDATES, CONFIG_ENV_VAR};
use super::util::env_non_empty;

/// An explicit `EXO_CLASSIFIER_CONFIG` must exist; otherwise the first existing candidate wins.
pub(super) fn resolve_config_path() -> Result<Option<PathBuf>> {
    if let Some(explicit) = env_non_empty(CONFIG_ENV_VAR) {
        let path = PathBuf::from(explicit);
        if !path.exists() {
            anyhow::bail!(
                "configured {} does not exist: {}",
                CONFIG_ENV_VAR,
                path.display()
            );
        }
        return Ok(Some(path));
    }

    let found = CONFIG_CANDIDATES
        .iter()
        .map(Path::new)
        .find(|candidate| candidate.exists())
        .map(Path::to_path_buf);
    if let Some(path) = &found {
        debug!(path = %path.display(), "using config candidate");
    }
    Ok(found)
}
