//! The SQLite-backed manager the dashboard reads from and classifies with.

use crate::catalog::{DirectoryCatalog, ExperimentBrowser};
use crate::classify::ClassifierLoader;
use crate::config::{Backend, Config};
use crate::manager::{ClassificationManager, ClassificationReport, RecordStore};
use crate::model::{Record, RowLimit};
use crate::storage::Store;
use anyhow::Context;
use std::path::PathBuf;

pub const DEFAULT_BATCH_SIZE: usize = 64;

pub struct SqliteManager {
    store: Store,
    browser: ExperimentBrowser<DirectoryCatalog>,
    loader: Box<dyn ClassifierLoader>,
    batch_size: usize,
}

impl SqliteManager {
    pub fn new(
        store: Store,
        experiments_root: impl Into<PathBuf>,
        loader: impl ClassifierLoader + 'static,
    ) -> Self {
        Self {
            store,
            browser: ExperimentBrowser::from_root(experiments_root),
            loader: Box::new(loader),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Open the database named by `config`, creating its schema if needed.
    /// Fails before touching disk when the configured backend is not SQLite.
    pub fn from_config(config: &Config, loader: impl ClassifierLoader + 'static) -> anyhow::Result<Self> {
        match config.backend()? {
            Backend::Sqlite => {}
        }
        let db_path = config.db_path();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let store = Store::open(&db_path)?;
        store.init_schema()?;
        tracing::debug!(db = %db_path.display(), "opened sqlite manager");
        Ok(Self::new(store, config.experiments_root(), loader))
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl RecordStore for SqliteManager {
    type Error = anyhow::Error;

    fn get_all(&self, scraped: Option<bool>, limit: Option<usize>) -> anyhow::Result<Vec<Record>> {
        self.store.get_all(scraped, limit)
    }
}

impl ClassificationManager for SqliteManager {
    type Error = anyhow::Error;

    fn run_pending_classification_from_experiment(
        &self,
        branch: &str,
        experiment: &str,
        limit: RowLimit,
    ) -> anyhow::Result<ClassificationReport> {
        self.browser.ensure_experiment(branch, experiment)?;
        let dir = self.browser.provider().experiment_dir(branch, experiment);
        let classifier = self
            .loader
            .load(&dir)
            .with_context(|| format!("failed to load classifier {branch}/{experiment}"))?;

        let pending = self.store.pending_for_classification(limit.as_option())?;
        let mut report = ClassificationReport {
            branch: branch.to_string(),
            experiment: experiment.to_string(),
            considered: pending.len(),
            labelled: 0,
        };

        for batch in pending.chunks(self.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|r| r.content.as_str()).collect();
            let labels = classifier.classify(&texts)?;
            anyhow::ensure!(
                labels.len() == batch.len(),
                "classifier returned {} labels for {} records",
                labels.len(),
                batch.len()
            );
            let updates: Vec<_> = batch
                .iter()
                .map(|r| r.url.clone())
                .zip(labels)
                .collect();
            report.labelled += self.store.set_labels(&updates)?;
        }

        tracing::info!(
            branch,
            experiment,
            considered = report.considered,
            labelled = report.labelled,
            "classification finished"
        );
        Ok(report)
    }
}
