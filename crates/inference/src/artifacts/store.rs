use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use tracing::{info, warn};

use super::loader::{ArtifactLoader, JsonArtifactLoader};
use super::model::{Classifier, Imputer, Scaler};
use crate::errors::ArtifactError;

/// Imputer, scaler and classifier loaded together. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactSet {
    pub imputer: Imputer,
    pub scaler: Scaler,
    pub classifier: Classifier,
    /// Name of the artifact directory the set was read from.
    pub version_tag: String,
}

/// Process-lifetime owner of the lazily loaded [`ArtifactSet`].
///
/// The first `get_artifacts` call runs the loader; concurrent first callers
/// block on that single load and all observe the same result. Afterwards
/// reads are lock-free. A failed load is cached too: the store stays
/// unavailable until [`ArtifactStore::reset`] is called.
pub struct ArtifactStore {
    root: PathBuf,
    loader: Box<dyn ArtifactLoader>,
    cell: OnceLock<Result<Arc<ArtifactSet>, ArtifactError>>,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_loader(root, JsonArtifactLoader)
    }

    pub fn with_loader(root: impl Into<PathBuf>, loader: impl ArtifactLoader + 'static) -> Self {
        Self {
            root: root.into(),
            loader: Box::new(loader),
            cell: OnceLock::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get_artifacts(&self) -> Result<Arc<ArtifactSet>, ArtifactError> {
        self.cell.get_or_init(|| self.load()).clone()
    }

    /// True once a load has completed, successfully or not.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Forget the cached result so the next access reloads from disk.
    ///
    /// Requires exclusive access: no request can observe a half-reset store.
    pub fn reset(&mut self) {
        if self.cell.take().is_some() {
            info!(root = %self.root.display(), "artifact store reset");
        }
    }

    fn load(&self) -> Result<Arc<ArtifactSet>, ArtifactError> {
        let started = Instant::now();
        match self.loader.load(&self.root) {
            Ok(set) => {
                info!(
                    root = %self.root.display(),
                    version = %set.version_tag,
                    model_id = set.classifier.model_id(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "artifacts loaded"
                );
                Ok(Arc::new(set))
            }
            Err(err) => {
                warn!(
                    root = %self.root.display(),
                    file = err.file(),
                    error = %err,
                    "artifact load failed; store unavailable until reset"
                );
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("root", &self.root)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
