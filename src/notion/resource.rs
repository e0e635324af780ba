use super::decode::{DecodeError, FromPage};
use super::models::RemotePage;
use super::schema;
use chrono::{DateTime, Utc};
use fake::Dummy;

/// Defines user data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// Defines project data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// Defines sprint data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct Sprint {
    pub id: String,
    pub name: String,
    pub status: String,
}

/// Defines task data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq)]
pub struct Task {
    pub id: String,
    pub story_id: u64,
    pub name: String,
    pub assignees: Vec<String>, // display names
    pub reviewers: Vec<String>, // display names
    pub status: String,
    pub priority: Option<String>,
    pub project_ids: Vec<String>,
    pub sprint_ids: Vec<String>, // empty for backlog tasks
    pub estimate: f64,           // hours
    pub created: DateTime<Utc>,
    pub url: String,
}

impl Task {
    /// Primary project, when the task has one.
    ///
    pub fn project_id(&self) -> Option<&str> {
        self.project_ids.first().map(String::as_str)
    }

    pub fn is_backlog(&self) -> bool {
        self.sprint_ids.is_empty()
    }
}

/// Defines hours entry data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq)]
pub struct HoursEntry {
    pub id: String,
    pub created: DateTime<Utc>,
    pub users: Vec<String>, // display names
    pub project_ids: Vec<String>,
    pub task_id: Option<String>,
    pub commission_ids: Vec<String>,
    pub date: DateTime<Utc>,
    pub hours: f64,
}

impl HoursEntry {
    pub fn project_id(&self) -> Option<&str> {
        self.project_ids.first().map(String::as_str)
    }

    /// Users joined for display, `-` when nobody is set.
    ///
    pub fn user_label(&self) -> String {
        if self.users.is_empty() {
            String::from("-")
        } else {
            self.users.join(", ")
        }
    }
}

impl FromPage for Project {
    fn from_page(page: &RemotePage) -> Result<Self, DecodeError> {
        Ok(Project {
            id: page.id.clone(),
            name: page.title(schema::project::NAME)?,
        })
    }
}

impl FromPage for Sprint {
    fn from_page(page: &RemotePage) -> Result<Self, DecodeError> {
        Ok(Sprint {
            id: page.id.clone(),
            name: page.title(schema::sprint::NAME)?,
            status: page.status(schema::sprint::STATUS)?.unwrap_or_default(),
        })
    }
}

impl FromPage for Task {
    fn from_page(page: &RemotePage) -> Result<Self, DecodeError> {
        Ok(Task {
            id: page.id.clone(),
            story_id: page.unique_id(schema::task::STORY_ID)?,
            name: page.title(schema::task::NAME)?,
            assignees: page.people_names(schema::task::ASSIGNEE)?,
            reviewers: page.people_names(schema::task::REVIEWER)?,
            status: page.status(schema::task::STATUS)?.unwrap_or_default(),
            priority: page.select(schema::task::PRIORITY)?,
            project_ids: page.relation(schema::task::PROJECT)?,
            sprint_ids: page.relation(schema::task::SPRINT)?,
            estimate: page.number(schema::task::ESTIMATE)?.unwrap_or(0.0),
            created: page.created_time,
            url: page.url.clone(),
        })
    }
}

impl FromPage for HoursEntry {
    fn from_page(page: &RemotePage) -> Result<Self, DecodeError> {
        // An entry logged without a day counts for today; an unparseable day
        // is still an error.
        let date = page
            .date(schema::hours::DATE)?
            .map(|range| range.start)
            .unwrap_or_else(Utc::now);

        Ok(HoursEntry {
            id: page.id.clone(),
            created: page.created_time,
            users: page.people_names(schema::hours::USER)?,
            project_ids: page.relation(schema::hours::PROJECT)?,
            task_id: page.relation(schema::hours::TASK)?.into_iter().next(),
            commission_ids: page.relation(schema::hours::COMMISSION)?,
            date,
            hours: page.number(schema::hours::HOURS)?.unwrap_or(0.0),
        })
    }
}
