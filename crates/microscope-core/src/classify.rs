//! Classification trigger and the classifier seam used by the manager.

use crate::manager::{ClassificationManager, ClassificationReport};
use crate::model::{Label, RowLimit};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

pub const RULES_FILE: &str = "rules.yaml";

/// Forward a classification request to the manager. `limit < 0` means no
/// limit. Whatever the manager returns is handed back untouched.
pub fn classify<M>(
    manager: &M,
    branch: &str,
    experiment: &str,
    limit: i64,
) -> Result<ClassificationReport, M::Error>
where
    M: ClassificationManager + ?Sized,
{
    let limit = RowLimit::from_signed(limit);
    tracing::info!(branch, experiment, %limit, "running pending classification");
    manager.run_pending_classification_from_experiment(branch, experiment, limit)
}

/// Assigns one label per input text.
pub trait Classifier {
    fn classify(&self, texts: &[&str]) -> anyhow::Result<Vec<Label>>;
}

/// Loads the classifier trained by a given experiment.
pub trait ClassifierLoader {
    fn load(&self, experiment_dir: &Path) -> anyhow::Result<Box<dyn Classifier>>;
}

impl<F> ClassifierLoader for F
where
    F: Fn(&Path) -> anyhow::Result<Box<dyn Classifier>>,
{
    fn load(&self, experiment_dir: &Path) -> anyhow::Result<Box<dyn Classifier>> {
        self(experiment_dir)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeywordRule {
    pub label: Label,
    pub keywords: Vec<String>,
}

/// Case-insensitive keyword matcher read from an experiment's `rules.yaml`.
///
/// ```yaml
/// default: IRRELEVANTE
/// rules:
///   - label: DENUNCIA FALTA DEL SERVICIO
///     keywords: [sin agua, sin luz]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordClassifier {
    #[serde(default = "default_label")]
    pub default: Label,
    #[serde(default)]
    pub rules: Vec<KeywordRule>,
}

fn default_label() -> Label {
    Label::Irrelevant
}

impl KeywordClassifier {
    pub fn from_experiment_dir(dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join(RULES_FILE);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read classifier rules {}", path.display()))?;
        let mut parsed: Self = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse classifier rules {}", path.display()))?;
        for rule in &mut parsed.rules {
            for k in &mut rule.keywords {
                *k = k.to_lowercase();
            }
        }
        Ok(parsed)
    }

    pub fn loader() -> impl ClassifierLoader {
        |dir: &Path| -> anyhow::Result<Box<dyn Classifier>> {
            Ok(Box::new(KeywordClassifier::from_experiment_dir(dir)?))
        }
    }

    fn label_for(&self, text: &str) -> Label {
        let text = text.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.keywords.iter().any(|k| text.contains(k.as_str())))
            .map_or(self.default, |r| r.label)
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, texts: &[&str]) -> anyhow::Result<Vec<Label>> {
        Ok(texts.iter().map(|t| self.label_for(t)).collect())
    }
}
