use microscope_core::cache::ShapeCache;
use microscope_core::classify::{classify, Classifier, KeywordClassifier, RULES_FILE};
use microscope_core::model::{Label, Record, Source};
use microscope_core::shaper::{DashboardQuery, ANY, NO_LABEL};
use microscope_core::storage::{SqliteManager, Store};
use microscope_core::{DashboardError, RecordStore};
use std::cell::RefCell;
use std::path::Path;
use tempfile::TempDir;

/// Fake store that records every call it receives.
#[derive(Default)]
struct SpyStore {
    records: Vec<Record>,
    calls: RefCell<Vec<(Option<bool>, Option<usize>)>>,
    down: bool,
}

#[derive(Debug, PartialEq)]
struct BackendDown(&'static str);

impl RecordStore for SpyStore {
    type Error = BackendDown;

    fn get_all(&self, scraped: Option<bool>, limit: Option<usize>) -> Result<Vec<Record>, BackendDown> {
        self.calls.borrow_mut().push((scraped, limit));
        if self.down {
            return Err(BackendDown("connection refused"));
        }
        Ok(self
            .records
            .iter()
            .filter(|r| scraped.map_or(true, |s| s == r.scraped))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}

fn spy(records: Vec<Record>) -> SpyStore {
    SpyStore {
        records,
        ..Default::default()
    }
}

#[test]
fn scraped_filter_is_pushed_down() {
    let store = spy(vec![
        Record::new("1", "a").with_scraped(true),
        Record::new("2", "b"),
    ]);
    for (filter, expected) in [("ANY", None), ("YES", Some(true)), ("NO", Some(false))] {
        DashboardQuery::new(NO_LABEL, filter, 10, 50)
            .unwrap()
            .run(&store)
            .unwrap();
        assert_eq!(store.calls.borrow().last().unwrap().0, expected);
    }
    assert_eq!(store.calls.borrow().len(), 3);
}

#[test]
fn row_cap_is_pushed_down_only_without_label_filter() {
    let store = spy(vec![]);
    DashboardQuery::new(ANY, ANY, 7, 50).unwrap().run(&store).unwrap();
    DashboardQuery::new("UNKNOWN", ANY, 7, 50).unwrap().run(&store).unwrap();
    DashboardQuery::new(ANY, ANY, -1, 50).unwrap().run(&store).unwrap();
    let calls = store.calls.borrow();
    assert_eq!(calls[0].1, Some(7));
    assert_eq!(calls[1].1, None);
    assert_eq!(calls[2].1, None);
}

#[test]
fn invalid_filter_makes_no_store_call() {
    let store = spy(vec![Record::new("1", "a")]);
    let res = DashboardQuery::new("BOGUS", ANY, 10, 10).map(|q| q.run(&store));
    assert!(matches!(res, Err(DashboardError::InvalidFilter { .. })));
    assert!(store.calls.borrow().is_empty());
}

#[test]
fn store_errors_come_back_unchanged() {
    let store = SpyStore {
        down: true,
        ..Default::default()
    };
    let err = DashboardQuery::new(ANY, ANY, 10, 10)
        .unwrap()
        .run(&store)
        .unwrap_err();
    assert_eq!(err, BackendDown("connection refused"));
}

#[test]
fn label_filter_with_cap_counts_only_matches() {
    let mut records = Vec::new();
    for i in 0..20 {
        let r = Record::new(format!("u{i}"), "x");
        records.push(if i % 2 == 0 { r.with_label(Label::Irrelevant) } else { r });
    }
    let rows = DashboardQuery::new(NO_LABEL, ANY, 3, 10)
        .unwrap()
        .run(&spy(records))
        .unwrap();
    let urls: Vec<_> = rows.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["u1", "u3", "u5"]);
}

#[test]
fn repeated_queries_are_identical() {
    let store = spy(vec![
        Record::new("1", "é".repeat(40)).with_source(Source::Client),
        Record::new("2", "b").with_label(Label::ServiceOutageReport),
    ]);
    let q = DashboardQuery::new(ANY, ANY, 10, 5).unwrap();
    assert_eq!(q.run(&store).unwrap(), q.run(&store).unwrap());
}

fn write_experiment(root: &Path, branch: &str, experiment: &str, rules: Option<&str>) {
    let dir = root.join(branch).join(experiment);
    std::fs::create_dir_all(&dir).unwrap();
    if let Some(rules) = rules {
        std::fs::write(dir.join(RULES_FILE), rules).unwrap();
    }
}

fn manager(root: &Path) -> SqliteManager {
    let store = Store::memory().unwrap();
    store.init_schema().unwrap();
    SqliteManager::new(store, root, KeywordClassifier::loader()).with_batch_size(2)
}

#[test]
fn classification_labels_pending_records_through_manager() -> anyhow::Result<()> {
    let tmp = TempDir::new()?;
    write_experiment(
        tmp.path(),
        "main",
        "keywords",
        Some("default: IRRELEVANTE\nrules:\n  - label: DENUNCIA FALTA DEL SERVICIO\n    keywords: [sin luz]\n"),
    );
    let m = manager(tmp.path());
    m.store().upsert_records(&[
        Record::new("1", "Maracaibo sin luz otra vez").with_scraped(true),
        Record::new("2", "resultado del partido").with_scraped(true),
        Record::new("3", "not scraped yet"),
        Record::new("4", "ya clasificado").with_scraped(true).with_label(Label::Unknown),
        Record::new("5", "sin luz en Merida").with_scraped(true),
    ])?;

    let before = m.store().revision()?;
    let report = classify(&m, "main", "keywords", 2)?;
    assert_eq!(report.considered, 2);
    assert_eq!(report.labelled, 2);
    assert!(m.store().revision()? > before);

    let report = classify(&m, "main", "keywords", -1)?;
    assert_eq!(report.considered, 1);

    let rows = DashboardQuery::new("DENUNCIA FALTA DEL SERVICIO", "YES", -1, 200)?.run(&m)?;
    let urls: Vec<_> = rows.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["1", "5"]);

    let unlabelled = DashboardQuery::new(NO_LABEL, ANY, -1, 200)?.run(&m)?;
    assert_eq!(unlabelled.len(), 1);
    assert_eq!(unlabelled[0].url, "3");
    Ok(())
}

#[test]
fn classification_rejects_unknown_experiment() {
    let tmp = TempDir::new().unwrap();
    write_experiment(tmp.path(), "main", "exp", None);
    let m = manager(tmp.path());
    let err = classify(&m, "main", "missing", 10).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DashboardError>(),
        Some(DashboardError::UnknownExperiment { .. })
    ));
    let err = classify(&m, "nope", "exp", 10).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DashboardError>(),
        Some(DashboardError::UnknownBranch(_))
    ));
}

#[test]
fn classifier_load_failure_propagates() {
    let tmp = TempDir::new().unwrap();
    write_experiment(tmp.path(), "main", "no_rules", None);
    let m = manager(tmp.path());
    let err = classify(&m, "main", "no_rules", -1).unwrap_err();
    assert!(format!("{err:#}").contains("main/no_rules"));
}

struct ShortClassifier;

impl Classifier for ShortClassifier {
    fn classify(&self, _texts: &[&str]) -> anyhow::Result<Vec<Label>> {
        Ok(vec![])
    }
}

#[test]
fn classifier_returning_wrong_count_is_an_error() {
    let tmp = TempDir::new().unwrap();
    write_experiment(tmp.path(), "b", "e", None);
    let store = Store::memory().unwrap();
    store.init_schema().unwrap();
    store
        .upsert_record(&Record::new("1", "x").with_scraped(true))
        .unwrap();
    let m = SqliteManager::new(store, tmp.path(), |_: &Path| -> anyhow::Result<Box<dyn Classifier>> {
        Ok(Box::new(ShortClassifier))
    });
    let err = classify(&m, "b", "e", -1).unwrap_err();
    assert!(err.to_string().contains("0 labels for 1 records"));
}

#[test]
fn cache_follows_store_revision() -> anyhow::Result<()> {
    let tmp = TempDir::new()?;
    let m = manager(tmp.path());
    m.store().upsert_record(&Record::new("1", "a"))?;
    let q = DashboardQuery::new(ANY, ANY, 10, 10)?;
    let mut cache = ShapeCache::new();

    let first = cache.get_or_compute(&q, m.store().revision()?, || q.run(&m))?;
    assert_eq!(first.len(), 1);

    m.store().upsert_record(&Record::new("2", "b"))?;
    let second = cache.get_or_compute(&q, m.store().revision()?, || q.run(&m))?;
    assert_eq!(second.len(), 2);
    Ok(())
}
