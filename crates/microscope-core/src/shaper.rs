//! Dashboard query shaping: filter, normalize, truncate, cap.
//!
//! One pass over the manager's records in storage order. Filters are
//! validated when the query is built, so running a query never fails for
//! reasons of its own; any error comes from the store and is returned as is.

use crate::errors::{DashboardError, FilterKind};
use crate::manager::RecordStore;
use crate::model::{DisplayRecord, Enumerated, Label, Record, RowLimit, Variant};

pub const TRUNCATION_MARKER: &str = "...";
pub const ANY: &str = "ANY";
pub const NO_LABEL: &str = "NO_LABEL";
pub const YES: &str = "YES";
pub const NO: &str = "NO";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelFilter {
    Any,
    NoLabel,
    Is(Label),
}

impl LabelFilter {
    pub fn parse(s: &str) -> Result<Self, DashboardError> {
        match s {
            ANY => Ok(Self::Any),
            NO_LABEL => Ok(Self::NoLabel),
            other => Label::from_value(other)
                .map(Self::Is)
                .ok_or_else(|| DashboardError::InvalidFilter {
                    kind: FilterKind::Label,
                    value: other.to_string(),
                    expected: label_options().join(", "),
                }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => ANY,
            Self::NoLabel => NO_LABEL,
            Self::Is(label) => label.value(),
        }
    }

    pub fn matches(self, label: &Variant<Label>) -> bool {
        match self {
            Self::Any => true,
            Self::NoLabel => label.is_unset(),
            Self::Is(wanted) => label.display_value() == wanted.value(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrapedFilter {
    Any,
    Yes,
    No,
}

impl ScrapedFilter {
    pub fn parse(s: &str) -> Result<Self, DashboardError> {
        match s {
            ANY => Ok(Self::Any),
            YES => Ok(Self::Yes),
            NO => Ok(Self::No),
            other => Err(DashboardError::InvalidFilter {
                kind: FilterKind::Scraped,
                value: other.to_string(),
                expected: scraped_options().join(", "),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => ANY,
            Self::Yes => YES,
            Self::No => NO,
        }
    }

    /// Predicate pushed down to the store.
    pub fn as_predicate(self) -> Option<bool> {
        match self {
            Self::Any => None,
            Self::Yes => Some(true),
            Self::No => Some(false),
        }
    }

    pub fn matches(self, scraped: bool) -> bool {
        self.as_predicate().map_or(true, |want| want == scraped)
    }
}

/// Label filter choices in the order the dashboard offers them.
pub fn label_options() -> Vec<&'static str> {
    std::iter::once(ANY)
        .chain(Label::ALL.iter().map(|l| l.value()))
        .chain(std::iter::once(NO_LABEL))
        .collect()
}

pub fn scraped_options() -> &'static [&'static str] {
    &[ANY, YES, NO]
}

/// A validated dashboard request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DashboardQuery {
    pub label: LabelFilter,
    pub scraped: ScrapedFilter,
    pub max_rows: RowLimit,
    pub max_content_len: usize,
}

impl DashboardQuery {
    pub const DEFAULT_MAX_ROWS: i64 = 100;
    pub const DEFAULT_MAX_CONTENT_LEN: usize = 200;

    pub fn new(
        label: &str,
        scraped: &str,
        max_rows: i64,
        max_content_len: usize,
    ) -> Result<Self, DashboardError> {
        Ok(Self {
            label: LabelFilter::parse(label)?,
            scraped: ScrapedFilter::parse(scraped)?,
            max_rows: RowLimit::from_signed(max_rows),
            max_content_len,
        })
    }

    /// Query the store once and shape what it returns.
    ///
    /// The scraped predicate is pushed down. The row cap is pushed down too
    /// when no label filter applies, since then every returned record
    /// survives filtering.
    pub fn run<S>(&self, store: &S) -> Result<Vec<DisplayRecord>, S::Error>
    where
        S: RecordStore + ?Sized,
    {
        let limit = match self.label {
            LabelFilter::Any => self.max_rows.as_option(),
            _ => None,
        };
        let records = store.get_all(self.scraped.as_predicate(), limit)?;
        let fetched = records.len();
        let rows = self.shape(records);
        tracing::debug!(
            label = self.label.as_str(),
            scraped = self.scraped.as_str(),
            max_rows = %self.max_rows,
            fetched,
            shown = rows.len(),
            "shaped dashboard rows"
        );
        Ok(rows)
    }

    /// Filter, normalize, truncate and cap `records`, preserving order.
    ///
    /// With a finite cap, no more records are pulled from the iterator than
    /// needed to fill it.
    pub fn shape<I>(&self, records: I) -> Vec<DisplayRecord>
    where
        I: IntoIterator<Item = Record>,
    {
        let cap = self.max_rows.as_option().unwrap_or(usize::MAX);
        records
            .into_iter()
            .filter(|r| self.scraped.matches(r.scraped) && self.label.matches(&r.label))
            .take(cap)
            .map(|r| to_display(&r, self.max_content_len))
            .collect()
    }
}

/// Shape already-fetched records from raw filter strings.
pub fn shape<I>(
    records: I,
    max_rows: i64,
    max_content_len: usize,
    label_filter: &str,
    scraped_filter: &str,
) -> Result<Vec<DisplayRecord>, DashboardError>
where
    I: IntoIterator<Item = Record>,
{
    let query = DashboardQuery::new(label_filter, scraped_filter, max_rows, max_content_len)?;
    Ok(query.shape(records))
}

/// Keep the first `max_len` characters, appending the marker only when
/// something was cut.
pub fn truncate_content(content: &str, max_len: usize) -> String {
    match content.char_indices().nth(max_len) {
        None => content.to_string(),
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
            out.push_str(&content[..cut]);
            out.push_str(TRUNCATION_MARKER);
            out
        }
    }
}

fn to_display(record: &Record, max_content_len: usize) -> DisplayRecord {
    DisplayRecord {
        url: record.url.clone(),
        title: record.title.clone().unwrap_or_default(),
        author: record.author.clone().unwrap_or_default(),
        date: record.date.clone().unwrap_or_default(),
        categories: record.categories.join(", "),
        last_scraped: record
            .last_scraped
            .map(|t| t.to_rfc3339())
            .unwrap_or_default(),
        content: truncate_content(&record.content, max_content_len),
        source: record.source.display_value().to_string(),
        label: record.label.display_value().to_string(),
        scraped: record.scraped,
    }
}
