//! Wire types for the Notion REST API.
//!
//! Only the parts of the payloads this crate reads are modelled; every other
//! field is ignored during deserialization.

use super::filter::Filter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One record returned by a database query.
///
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RemotePage {
    pub id: String,
    pub created_time: DateTime<Utc>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

/// Typed value of a single page property.
///
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title { title: Vec<RichText> },
    RichText { rich_text: Vec<RichText> },
    Status { status: Option<SelectOption> },
    Select { select: Option<SelectOption> },
    People { people: Vec<Person> },
    Relation { relation: Vec<RelationRef> },
    Number { number: Option<f64> },
    Date { date: Option<RawDate> },
    UniqueId { unique_id: UniqueId },
    Rollup { rollup: Rollup },
    #[serde(other)]
    Unsupported,
}

impl PropertyValue {
    /// Name of the underlying property kind, as Notion spells it.
    ///
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Title { .. } => "title",
            PropertyValue::RichText { .. } => "rich_text",
            PropertyValue::Status { .. } => "status",
            PropertyValue::Select { .. } => "select",
            PropertyValue::People { .. } => "people",
            PropertyValue::Relation { .. } => "relation",
            PropertyValue::Number { .. } => "number",
            PropertyValue::Date { .. } => "date",
            PropertyValue::UniqueId { .. } => "unique_id",
            PropertyValue::Rollup { .. } => "rollup",
            PropertyValue::Unsupported => "unsupported",
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RelationRef {
    pub id: String,
}

/// Date property as sent by Notion: ISO date or date-time strings.
///
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawDate {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UniqueId {
    #[serde(default)]
    pub prefix: Option<String>,
    pub number: Option<u64>,
}

/// Backend-computed aggregate over related records.
///
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rollup {
    Number { number: Option<f64> },
    Array { array: Vec<PropertyValue> },
    #[serde(other)]
    Unsupported,
}

/// A workspace member as returned by the users endpoint.
///
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl RawUser {
    pub fn is_bot(&self) -> bool {
        self.kind.as_deref() == Some("bot")
    }
}

/// Paginated list envelope shared by every list endpoint.
///
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl<T> ListResponse<T> {
    /// Continuation cursor, present only when the server reports more results.
    ///
    pub fn continuation(&self) -> Option<String> {
        if self.has_more {
            self.next_cursor.clone()
        } else {
            None
        }
    }
}

/// Body of a database query request.
///
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'a Filter>,
    pub page_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<&'a str>,
}

/// Body of an error response.
///
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
