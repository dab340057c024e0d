//! Seams to the persistence manager that owns the records.

use crate::model::{Record, RowLimit};
use serde::Serialize;

/// Read side of the manager.
pub trait RecordStore {
    type Error;

    /// All records in storage order. `scraped` restricts to records whose
    /// `scraped` flag equals the given value; `limit` caps the number
    /// returned.
    fn get_all(&self, scraped: Option<bool>, limit: Option<usize>) -> Result<Vec<Record>, Self::Error>;
}

/// Write side of the manager: labels pending records with a trained model.
pub trait ClassificationManager {
    type Error;

    fn run_pending_classification_from_experiment(
        &self,
        branch: &str,
        experiment: &str,
        limit: RowLimit,
    ) -> Result<ClassificationReport, Self::Error>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationReport {
    pub branch: String,
    pub experiment: String,
    /// Pending records handed to the classifier.
    pub considered: usize,
    /// Records whose label was written back.
    pub labelled: usize,
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    type Error = S::Error;

    fn get_all(&self, scraped: Option<bool>, limit: Option<usize>) -> Result<Vec<Record>, Self::Error> {
        (**self).get_all(scraped, limit)
    }
}
