//! Name to ID resolution against the users and projects cached by
//! `configure`.

use crate::notion::NotionError;
use crate::utils::text_processing::fuzzy_contains;
use serde::{Deserialize, Serialize};

/// A cached workspace record.
///
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub name: String,
}

impl From<crate::notion::User> for Entry {
    fn from(user: crate::notion::User) -> Self {
        Entry {
            id: user.id,
            name: user.name,
        }
    }
}

impl From<crate::notion::Project> for Entry {
    fn from(project: crate::notion::Project) -> Self {
        Entry {
            id: project.id,
            name: project.name,
        }
    }
}

/// Read-only view over the cached users and projects.
///
pub struct Directory<'a> {
    users: &'a [Entry],
    projects: &'a [Entry],
}

impl<'a> Directory<'a> {
    pub fn new(users: &'a [Entry], projects: &'a [Entry]) -> Self {
        Directory { users, projects }
    }

    /// First user whose name contains `query`, ignoring case.
    ///
    pub fn resolve_user(&self, query: &str) -> Result<&'a Entry, NotionError> {
        self.users
            .iter()
            .find(|user| fuzzy_contains(&user.name, query))
            .ok_or_else(|| NotionError::Validation(format!("no user found for '{}'", query)))
    }

    /// Resolve every query to one user ID, failing on the first miss.
    ///
    pub fn resolve_users<S: AsRef<str>>(&self, queries: &[S]) -> Result<Vec<String>, NotionError> {
        queries
            .iter()
            .map(|query| self.resolve_user(query.as_ref()).map(|user| user.id.clone()))
            .collect()
    }

    /// Resolve every query to all projects whose name contains it. A query
    /// matching nothing is an error.
    ///
    pub fn resolve_projects<S: AsRef<str>>(
        &self,
        queries: &[S],
    ) -> Result<Vec<String>, NotionError> {
        let mut ids = Vec::new();
        for query in queries {
            let query = query.as_ref();
            let before = ids.len();
            ids.extend(
                self.projects
                    .iter()
                    .filter(|project| fuzzy_contains(&project.name, query))
                    .map(|project| project.id.clone()),
            );
            if ids.len() == before {
                return Err(NotionError::Validation(format!(
                    "no project found for '{}'",
                    query
                )));
            }
        }
        Ok(ids)
    }

    pub fn project_name(&self, id: &str) -> Option<&'a str> {
        self.projects
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str) -> Entry {
        Entry {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn fixtures() -> (Vec<Entry>, Vec<Entry>) {
        (
            vec![entry("u1", "Ada Lovelace"), entry("u2", "Alan Turing")],
            vec![
                entry("p1", "Apollo Web"),
                entry("p2", "Apollo Mobile"),
                entry("p3", "Gemini"),
            ],
        )
    }

    #[test]
    fn test_resolve_user_case_insensitive() {
        let (users, projects) = fixtures();
        let directory = Directory::new(&users, &projects);
        assert_eq!(directory.resolve_user("turing").unwrap().id, "u2");
        assert_eq!(directory.resolve_user("A").unwrap().id, "u1");
    }

    #[test]
    fn test_resolve_users_fails_on_unknown() {
        let (users, projects) = fixtures();
        let directory = Directory::new(&users, &projects);
        assert_eq!(directory.resolve_users(&["ada", "alan"]).unwrap(), vec!["u1", "u2"]);
        match directory.resolve_users(&["ada", "grace"]) {
            Err(NotionError::Validation(message)) => assert!(message.contains("grace")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_resolve_projects_expands_all_matches() {
        let (users, projects) = fixtures();
        let directory = Directory::new(&users, &projects);
        assert_eq!(
            directory.resolve_projects(&["apollo", "GEM"]).unwrap(),
            vec!["p1", "p2", "p3"]
        );
        assert!(directory.resolve_projects(&["mercury"]).is_err());
    }

    #[test]
    fn test_project_name_by_id() {
        let (users, projects) = fixtures();
        let directory = Directory::new(&users, &projects);
        assert_eq!(directory.project_name("p3"), Some("Gemini"));
        assert_eq!(directory.project_name("missing"), None);
    }
}
