//! Records as the manager stores them and as the dashboard displays them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Fixed string enumerations stored in variant columns.
pub trait Enumerated: Copy + Eq + 'static {
    const ALL: &'static [Self];

    fn value(self) -> &'static str;

    fn from_value(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.value() == s)
    }
}

/// Classification assigned to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "IRRELEVANTE")]
    Irrelevant,
    #[serde(rename = "DENUNCIA FALTA DEL SERVICIO")]
    ServiceOutageReport,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Enumerated for Label {
    const ALL: &'static [Self] = &[Self::Irrelevant, Self::ServiceOutageReport, Self::Unknown];

    fn value(self) -> &'static str {
        match self {
            Self::Irrelevant => "IRRELEVANTE",
            Self::ServiceOutageReport => "DENUNCIA FALTA DEL SERVICIO",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Where a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "UNKNOWN")]
    Unknown,
    #[serde(rename = "CLIENT")]
    Client,
    #[serde(rename = "SCRAPING")]
    Scraping,
}

impl Enumerated for Source {
    const ALL: &'static [Self] = &[Self::Unknown, Self::Client, Self::Scraping];

    fn value(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Client => "CLIENT",
            Self::Scraping => "SCRAPING",
        }
    }
}

/// A field that holds either a member of `T` or nothing at all.
///
/// Serialized as `null` when unset and as the member's string value
/// otherwise. An empty string deserializes to `Unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant<T> {
    Unset,
    Known(T),
}

impl<T> Default for Variant<T> {
    fn default() -> Self {
        Self::Unset
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown enumeration value {:?}", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

impl<T: Enumerated> Variant<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Plain string value; `""` when unset.
    pub fn display_value(&self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Known(v) => v.value(),
        }
    }

    /// Nullable column representation.
    pub fn as_column(&self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Known(v) => Some(v.value()),
        }
    }

    pub fn from_column(raw: Option<&str>) -> Result<Self, UnknownVariant> {
        match raw {
            None | Some("") => Ok(Self::Unset),
            Some(s) => T::from_value(s)
                .map(Self::Known)
                .ok_or_else(|| UnknownVariant(s.to_string())),
        }
    }
}

impl<T> From<Option<T>> for Variant<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Self::Known)
    }
}

impl<T> From<T> for Variant<T>
where
    T: Enumerated,
{
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

impl<T: Enumerated> Serialize for Variant<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_column().serialize(serializer)
    }
}

impl<'de, T: Enumerated> Deserialize<'de> for Variant<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Self::from_column(raw.as_deref()).map_err(serde::de::Error::custom)
    }
}

/// One scraped (and possibly classified) item owned by the manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub last_scraped: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: Variant<Source>,
    #[serde(default)]
    pub label: Variant<Label>,
    #[serde(default)]
    pub scraped: bool,
}

impl Record {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            author: None,
            date: None,
            categories: Vec::new(),
            last_scraped: None,
            content: content.into(),
            source: Variant::Unset,
            label: Variant::Unset,
            scraped: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<Variant<Label>>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<Variant<Source>>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_scraped(mut self, scraped: bool) -> Self {
        self.scraped = scraped;
        self
    }
}

/// A record ready for one render pass: variants flattened to strings and
/// content truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRecord {
    pub url: String,
    pub title: String,
    pub author: String,
    pub date: String,
    pub categories: String,
    pub last_scraped: String,
    pub content: String,
    pub source: String,
    pub label: String,
    pub scraped: bool,
}

/// Row cap. Built from a signed count where negative means no cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowLimit {
    Unlimited,
    AtMost(usize),
}

impl RowLimit {
    pub fn from_signed(n: i64) -> Self {
        usize::try_from(n).map_or(Self::Unlimited, Self::AtMost)
    }

    pub fn as_option(self) -> Option<usize> {
        match self {
            Self::Unlimited => None,
            Self::AtMost(n) => Some(n),
        }
    }
}

impl fmt::Display for RowLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str("unlimited"),
            Self::AtMost(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_column_roundtrip_keeps_unset_distinct() {
        assert_eq!(Variant::<Label>::from_column(None).unwrap(), Variant::Unset);
        assert_eq!(Variant::<Label>::from_column(Some("")).unwrap(), Variant::Unset);
        assert_eq!(
            Variant::<Label>::from_column(Some("IRRELEVANTE")).unwrap(),
            Variant::Known(Label::Irrelevant)
        );
        assert!(Variant::<Source>::from_column(Some("irrelevante")).is_err());
    }

    #[test]
    fn variant_serializes_as_nullable_string() {
        let rec = Record::new("u", "c").with_label(Label::ServiceOutageReport);
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["label"], "DENUNCIA FALTA DEL SERVICIO");
        assert!(v["source"].is_null());
    }

    #[test]
    fn record_deserializes_with_defaults() {
        let rec: Record =
            serde_json::from_str(r#"{"url":"http://x","content":"hi","label":""}"#).unwrap();
        assert_eq!(rec.label, Variant::Unset);
        assert!(!rec.scraped);
        assert!(rec.categories.is_empty());
    }

    #[test]
    fn row_limit_negative_is_unlimited() {
        assert_eq!(RowLimit::from_signed(-1), RowLimit::Unlimited);
        assert_eq!(RowLimit::from_signed(0), RowLimit::AtMost(0));
        assert_eq!(RowLimit::from_signed(7).as_option(), Some(7));
    }
}
