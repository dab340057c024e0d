//! Branch / experiment discovery for trained classifier models.
//!
//! Layout: `<experiments root>/<branch>/<experiment>/summary.txt`. Nothing is
//! cached; every call looks at the filesystem again so experiments created
//! mid-session show up immediately.

use crate::errors::DashboardError;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "summary.txt";

/// Raw catalog access, no existence checks.
pub trait CatalogProvider {
    fn branches(&self) -> Result<BTreeSet<String>, DashboardError>;

    fn experiments(&self, branch: &str) -> Result<BTreeSet<String>, DashboardError>;

    /// Summary text, `None` when the experiment has none.
    fn summary(&self, branch: &str, experiment: &str) -> Result<Option<String>, DashboardError>;
}

/// Catalog backed by nested directories.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn experiment_dir(&self, branch: &str, experiment: &str) -> PathBuf {
        self.root.join(branch).join(experiment)
    }
}

impl CatalogProvider for DirectoryCatalog {
    fn branches(&self) -> Result<BTreeSet<String>, DashboardError> {
        list_subdirs(&self.root)
    }

    fn experiments(&self, branch: &str) -> Result<BTreeSet<String>, DashboardError> {
        list_subdirs(&self.root.join(branch))
    }

    fn summary(&self, branch: &str, experiment: &str) -> Result<Option<String>, DashboardError> {
        let path = self.experiment_dir(branch, experiment).join(SUMMARY_FILE);
        match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Ok(None),
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DashboardError::io(path, e)),
        }
    }
}

/// Names of immediate subdirectories, following symlinks; empty when `dir`
/// is missing.
fn list_subdirs(dir: &Path) -> Result<BTreeSet<String>, DashboardError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => return Err(DashboardError::io(dir, e)),
    };

    let mut out = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|e| DashboardError::io(dir, e))?;
        // dangling links are skipped like any other non-directory
        let is_dir = match std::fs::metadata(entry.path()) {
            Ok(meta) => meta.is_dir(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(DashboardError::io(entry.path(), e)),
        };
        if !is_dir {
            continue;
        }
        // non-UTF-8 names cannot be selected by name anyway
        if let Ok(name) = entry.file_name().into_string() {
            out.insert(name);
        }
    }
    Ok(out)
}

/// Validating front for a [`CatalogProvider`].
#[derive(Debug, Clone)]
pub struct ExperimentBrowser<P> {
    provider: P,
}

impl<P: CatalogProvider> ExperimentBrowser<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn list_branches(&self) -> Result<BTreeSet<String>, DashboardError> {
        self.provider.branches()
    }

    pub fn list_experiments(&self, branch: &str) -> Result<BTreeSet<String>, DashboardError> {
        self.ensure_branch(branch)?;
        self.provider.experiments(branch)
    }

    pub fn get_summary(
        &self,
        branch: &str,
        experiment: &str,
    ) -> Result<Option<String>, DashboardError> {
        self.ensure_experiment(branch, experiment)?;
        self.provider.summary(branch, experiment)
    }

    /// Fails unless `branch/experiment` is listed right now.
    pub fn ensure_experiment(&self, branch: &str, experiment: &str) -> Result<(), DashboardError> {
        if self.list_experiments(branch)?.contains(experiment) {
            Ok(())
        } else {
            Err(DashboardError::UnknownExperiment {
                branch: branch.to_string(),
                experiment: experiment.to_string(),
            })
        }
    }

    fn ensure_branch(&self, branch: &str) -> Result<(), DashboardError> {
        if self.provider.branches()?.contains(branch) {
            Ok(())
        } else {
            Err(DashboardError::UnknownBranch(branch.to_string()))
        }
    }
}

impl ExperimentBrowser<DirectoryCatalog> {
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self::new(DirectoryCatalog::new(root))
    }
}
