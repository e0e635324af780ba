//! Property decoding.
//!
//! Turns the typed property bag of a [`RemotePage`] into plain values. Every
//! accessor fails with a [`DecodeError`] when the property is absent or has a
//! different kind than requested; a schema mismatch is fatal for the record.

use super::models::{Person, PropertyValue, RawDate, RemotePage, RichText, Rollup};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Errors produced while reading page properties.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The page has no property with the given name
    #[error("page {page}: property '{property}' is missing")]
    MissingProperty { page: String, property: String },

    /// The property exists but is of another kind
    #[error("page {page}: property '{property}' is {found}, expected {expected}")]
    TypeMismatch {
        page: String,
        property: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A date bound could not be parsed
    #[error("page {page}: property '{property}' has an invalid date '{value}'")]
    InvalidDate {
        page: String,
        property: String,
        value: String,
    },

    /// A property that must hold a value is empty
    #[error("page {page}: property '{property}' is empty")]
    EmptyValue { page: String, property: String },
}

/// Inclusive date range; Notion allows an open end.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

/// Types that can be built from a single remote page.
///
pub trait FromPage: Sized {
    fn from_page(page: &RemotePage) -> Result<Self, DecodeError>;
}

impl RemotePage {
    fn property(&self, name: &str) -> Result<&PropertyValue, DecodeError> {
        self.properties
            .get(name)
            .ok_or_else(|| DecodeError::MissingProperty {
                page: self.id.clone(),
                property: name.to_owned(),
            })
    }

    fn mismatch(&self, name: &str, expected: &'static str, found: &PropertyValue) -> DecodeError {
        DecodeError::TypeMismatch {
            page: self.id.clone(),
            property: name.to_owned(),
            expected,
            found: found.kind(),
        }
    }

    /// Concatenated plain text of a title property.
    ///
    pub fn title(&self, name: &str) -> Result<String, DecodeError> {
        match self.property(name)? {
            PropertyValue::Title { title } => Ok(plain_text(title)),
            other => Err(self.mismatch(name, "title", other)),
        }
    }

    /// Concatenated plain text of a rich text property.
    ///
    pub fn rich_text(&self, name: &str) -> Result<String, DecodeError> {
        match self.property(name)? {
            PropertyValue::RichText { rich_text } => Ok(plain_text(rich_text)),
            other => Err(self.mismatch(name, "rich_text", other)),
        }
    }

    /// Label of a status property, `None` when unset.
    ///
    pub fn status(&self, name: &str) -> Result<Option<String>, DecodeError> {
        match self.property(name)? {
            PropertyValue::Status { status } => Ok(status.as_ref().map(|s| s.name.clone())),
            other => Err(self.mismatch(name, "status", other)),
        }
    }

    /// Label of a select property, `None` when unset.
    ///
    pub fn select(&self, name: &str) -> Result<Option<String>, DecodeError> {
        match self.property(name)? {
            PropertyValue::Select { select } => Ok(select.as_ref().map(|s| s.name.clone())),
            other => Err(self.mismatch(name, "select", other)),
        }
    }

    pub fn number(&self, name: &str) -> Result<Option<f64>, DecodeError> {
        match self.property(name)? {
            PropertyValue::Number { number } => Ok(*number),
            other => Err(self.mismatch(name, "number", other)),
        }
    }

    /// People in server order.
    ///
    pub fn people(&self, name: &str) -> Result<&[Person], DecodeError> {
        match self.property(name)? {
            PropertyValue::People { people } => Ok(people),
            other => Err(self.mismatch(name, "people", other)),
        }
    }

    /// Display names of a people property, falling back to the user ID when
    /// the integration cannot see the name.
    ///
    pub fn people_names(&self, name: &str) -> Result<Vec<String>, DecodeError> {
        Ok(self
            .people(name)?
            .iter()
            .map(|p| p.name.clone().unwrap_or_else(|| p.id.clone()))
            .collect())
    }

    /// Related page IDs in server order.
    ///
    pub fn relation(&self, name: &str) -> Result<Vec<String>, DecodeError> {
        match self.property(name)? {
            PropertyValue::Relation { relation } => {
                Ok(relation.iter().map(|r| r.id.clone()).collect())
            }
            other => Err(self.mismatch(name, "relation", other)),
        }
    }

    /// Date range of a date property, `None` when the date is unset.
    ///
    pub fn date(&self, name: &str) -> Result<Option<DateRange>, DecodeError> {
        match self.property(name)? {
            PropertyValue::Date { date } => date
                .as_ref()
                .map(|raw| self.date_range(name, raw))
                .transpose(),
            other => Err(self.mismatch(name, "date", other)),
        }
    }

    pub fn unique_id(&self, name: &str) -> Result<u64, DecodeError> {
        match self.property(name)? {
            PropertyValue::UniqueId { unique_id } => {
                unique_id.number.ok_or_else(|| DecodeError::EmptyValue {
                    page: self.id.clone(),
                    property: name.to_owned(),
                })
            }
            other => Err(self.mismatch(name, "unique_id", other)),
        }
    }

    /// Numeric rollup; array rollups are summed over their number items.
    ///
    pub fn rollup_number(&self, name: &str) -> Result<Option<f64>, DecodeError> {
        match self.property(name)? {
            PropertyValue::Rollup {
                rollup: Rollup::Number { number },
            } => Ok(*number),
            PropertyValue::Rollup {
                rollup: Rollup::Array { array },
            } => Ok(array
                .iter()
                .map(|item| match item {
                    PropertyValue::Number { number } => *number,
                    _ => None,
                })
                .reduce(|acc, n| match (acc, n) {
                    (Some(a), Some(b)) => Some(a + b),
                    (a, b) => a.or(b),
                })
                .flatten()),
            other => Err(self.mismatch(name, "numeric rollup", other)),
        }
    }

    // Each bound is parsed on its own: a bad end never borrows the start.
    fn date_range(&self, name: &str, raw: &RawDate) -> Result<DateRange, DecodeError> {
        let bound = |value: &str| {
            parse_date(value).ok_or_else(|| DecodeError::InvalidDate {
                page: self.id.clone(),
                property: name.to_owned(),
                value: value.to_owned(),
            })
        };
        Ok(DateRange {
            start: bound(&raw.start)?,
            end: raw.end.as_deref().map(bound).transpose()?,
        })
    }
}

fn plain_text(parts: &[RichText]) -> String {
    parts.iter().map(|t| t.plain_text.as_str()).collect()
}

/// Parse a Notion date: either RFC 3339 or a bare `YYYY-MM-DD` (midnight UTC).
///
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// First value of a multi-valued property, or the given default.
///
pub fn first_or(values: &[String], default: &str) -> String {
    values
        .first()
        .cloned()
        .unwrap_or_else(|| default.to_owned())
}
