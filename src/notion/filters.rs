//! Per-entity filter specifications.
//!
//! Each specification is plain data that compiles deterministically into a
//! [`Filter`]: populated fields are combined with `and`, values within one
//! field with `or`, and an empty specification compiles to `None` (match
//! everything).

use super::error::NotionError;
use super::filter::Filter;
use super::schema;
use chrono::{Duration, Local, NaiveDate};

pub const STATUS_NOT_STARTED: &str = "Not Started";
pub const STATUS_IN_PROGRESS: &str = "In Progress";
pub const STATUS_TO_BE_TESTED: &str = "To Be Tested";
pub const STATUS_IN_TESTING: &str = "In Testing";
pub const STATUS_DONE: &str = "Done";
pub const STATUS_NOT_DONE: &str = "Not Done";

/// Translate a short status code (`NS`, `P`, `TBT`, `T`, `D`, `ND`) into the
/// task status label.
///
pub fn status_from_code(code: &str) -> Result<&'static str, NotionError> {
    match code.to_uppercase().as_str() {
        "NS" => Ok(STATUS_NOT_STARTED),
        "P" => Ok(STATUS_IN_PROGRESS),
        "TBT" => Ok(STATUS_TO_BE_TESTED),
        "T" => Ok(STATUS_IN_TESTING),
        "D" => Ok(STATUS_DONE),
        "ND" => Ok(STATUS_NOT_DONE),
        _ => Err(NotionError::Validation(format!(
            "unknown status '{}', valid values are [NS, P, TBT, T, D, ND]",
            code
        ))),
    }
}

/// Anything that compiles into a query filter.
///
pub trait FilterSpec {
    fn compile(&self) -> Option<Filter>;
}

/// Sprint membership of a task. `None` in [`TaskFilter::sprint`] leaves the
/// sprint unconstrained.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SprintMembership {
    /// Tasks planned in any sprint
    NoBacklog,
    /// Tasks without a sprint
    OnlyBacklog,
    ById(String),
    ByIds(Vec<String>),
}

impl SprintMembership {
    pub fn compile(&self) -> Option<Filter> {
        match self {
            SprintMembership::NoBacklog => Some(Filter::relation_is_not_empty(schema::task::SPRINT)),
            SprintMembership::OnlyBacklog => Some(Filter::relation_is_empty(schema::task::SPRINT)),
            SprintMembership::ById(id) => Some(Filter::relation_contains(schema::task::SPRINT, id)),
            SprintMembership::ByIds(ids) => Filter::any(
                ids.iter()
                    .map(|id| Filter::relation_contains(schema::task::SPRINT, id)),
            ),
        }
    }
}

/// Task query specification.
///
/// When `users` is populated it matches tasks where any of them is assignee
/// or reviewer, and `assignees` / `reviewers` are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub projects: Vec<String>,
    pub users: Vec<String>,
    pub assignees: Vec<String>,
    pub reviewers: Vec<String>,
    pub statuses: Vec<String>,
    pub sprint: Option<SprintMembership>,
}

impl FilterSpec for TaskFilter {
    fn compile(&self) -> Option<Filter> {
        let people = |property: &'static str, ids: &[String]| {
            Filter::any(ids.iter().map(|id| Filter::people_contains(property, id)))
        };

        let (users, assignees, reviewers) = if self.users.is_empty() {
            (
                None,
                people(schema::task::ASSIGNEE, &self.assignees),
                people(schema::task::REVIEWER, &self.reviewers),
            )
        } else {
            let either = self.users.iter().flat_map(|id| {
                [
                    Filter::people_contains(schema::task::ASSIGNEE, id),
                    Filter::people_contains(schema::task::REVIEWER, id),
                ]
            });
            (Filter::any(either), None, None)
        };

        Filter::all([
            Filter::any(
                self.projects
                    .iter()
                    .map(|id| Filter::relation_contains(schema::task::PROJECT, id)),
            ),
            users,
            assignees,
            reviewers,
            Filter::any(
                self.statuses
                    .iter()
                    .map(|label| Filter::status_equals(schema::task::STATUS, label)),
            ),
            self.sprint.as_ref().and_then(SprintMembership::compile),
        ])
    }
}

/// Sprint query specification.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SprintFilter {
    pub id: Option<u64>,
    pub status: Option<String>,
}

impl SprintFilter {
    pub fn with_status(status: &str) -> Self {
        SprintFilter {
            status: Some(status.to_owned()),
            ..SprintFilter::default()
        }
    }
}

impl FilterSpec for SprintFilter {
    fn compile(&self) -> Option<Filter> {
        Filter::all([
            self.status
                .as_deref()
                .map(|status| Filter::status_equals(schema::sprint::STATUS, status)),
            self.id
                .map(|id| Filter::unique_id_equals(schema::sprint::ID, id)),
        ])
    }
}

/// Day constraint of an hours query.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoursDate {
    Today,
    Yesterday,
    On(NaiveDate),
}

impl HoursDate {
    /// Resolve to a calendar day relative to `today`.
    ///
    pub fn day(&self, today: NaiveDate) -> NaiveDate {
        match self {
            HoursDate::Today => today,
            HoursDate::Yesterday => today - Duration::days(1),
            HoursDate::On(day) => *day,
        }
    }
}

/// Hours entry query specification.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoursFilter {
    pub projects: Vec<String>,
    pub users: Vec<String>,
    pub date: Option<HoursDate>,
}

impl HoursFilter {
    /// Compile with an explicit reference day for relative dates.
    ///
    pub fn compile_on(&self, today: NaiveDate) -> Option<Filter> {
        Filter::all([
            Filter::any(
                self.projects
                    .iter()
                    .map(|id| Filter::relation_contains(schema::hours::PROJECT, id)),
            ),
            Filter::any(
                self.users
                    .iter()
                    .map(|id| Filter::people_contains(schema::hours::USER, id)),
            ),
            self.date
                .map(|date| Filter::date_equals(schema::hours::DATE, date.day(today))),
        ])
    }
}

impl FilterSpec for HoursFilter {
    fn compile(&self) -> Option<Filter> {
        self.compile_on(Local::now().date_naive())
    }
}

/// Unfiltered listing.
///
impl FilterSpec for () {
    fn compile(&self) -> Option<Filter> {
        None
    }
}
