use super::{export, fetched_summary, format_hours, format_local};
use crate::config::{Config, Directory};
use crate::notion::{status_from_code, Notion, NotionError, SprintMembership, Task, TaskFilter};
use crate::ui::{self, Alignment, Column, Row, Table, TableStyle};
use anyhow::Result;
use crossterm::style::Color;
use log::*;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

/// Which sprints to search tasks in.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SprintScope {
    /// Any sprint, backlog excluded
    #[default]
    Default,
    All,
    Backlog,
    Current,
}

impl SprintScope {
    pub const NAMES: [&'static str; 4] = ["default", "all", "backlog", "current"];

    pub fn from_name(name: &str) -> Option<SprintScope> {
        match name {
            "default" => Some(SprintScope::Default),
            "all" => Some(SprintScope::All),
            "backlog" => Some(SprintScope::Backlog),
            "current" => Some(SprintScope::Current),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskArgs {
    pub user: Option<String>,
    pub assignee: Option<String>,
    pub reviewer: Option<String>,
    pub projects: Vec<String>,
    pub statuses: Vec<String>,
    pub sprint: SprintScope,
    pub limit: Option<usize>,
    pub outfile: Option<PathBuf>,
}

/// Build the task filter from the arguments, resolving names against the
/// directory. The current sprint is left unresolved since that needs a
/// query.
///
pub fn build_filter(args: &TaskArgs, directory: &Directory) -> Result<TaskFilter, NotionError> {
    let resolve = |name: &Option<String>| -> Result<Vec<String>, NotionError> {
        match name {
            Some(name) => Ok(vec![directory.resolve_user(name)?.id.clone()]),
            None => Ok(vec![]),
        }
    };

    let statuses = args
        .statuses
        .iter()
        .map(|code| status_from_code(code).map(String::from))
        .collect::<Result<Vec<_>, _>>()?;

    let sprint = match args.sprint {
        SprintScope::Default => Some(SprintMembership::NoBacklog),
        SprintScope::Backlog => Some(SprintMembership::OnlyBacklog),
        SprintScope::All | SprintScope::Current => None,
    };

    Ok(TaskFilter {
        projects: directory.resolve_projects(&args.projects)?,
        users: resolve(&args.user)?,
        assignees: resolve(&args.assignee)?,
        reviewers: resolve(&args.reviewer)?,
        statuses,
        sprint,
    })
}

pub fn columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID")
            .with_alignment(Alignment::Right)
            .with_active(false),
        Column::new("story_id", "Story ID"),
        Column::new("project", "Project"),
        Column::new("name", "Name").with_max_width(60),
        Column::new("assignee", "Assignee"),
        Column::new("reviewer", "Reviewer"),
        Column::new("status", "Status"),
        Column::new("estimate", "Estimate").with_alignment(Alignment::Right),
        Column::new("priority", "Priority").with_cell_color(priority_color),
        Column::new("created", "Created"),
    ]
}

pub fn priority_color(priority: &str) -> Option<Color> {
    match priority {
        "High" => Some(Color::Red),
        "Medium" => Some(Color::Yellow),
        "Low" => Some(Color::Green),
        _ => None,
    }
}

pub fn task_row(task: &Task, config: &Config) -> Row {
    let directory = config.directory();
    let status = match config.status_emote(&task.status) {
        Some(emote) => format!("{} {}", emote, task.status),
        None => task.status.clone(),
    };

    [
        ("id", task.id.clone()),
        ("story_id", task.story_id.to_string()),
        (
            "project",
            task.project_id()
                .and_then(|id| directory.project_name(id))
                .unwrap_or_default()
                .to_string(),
        ),
        ("name", task.name.clone()),
        ("assignee", task.assignees.join(", ")),
        ("reviewer", task.reviewers.join(", ")),
        ("status", status),
        ("estimate", format_hours(task.estimate)),
        ("priority", task.priority.clone().unwrap_or_default()),
        ("created", format_local(&task.created, &config.datetime_format)),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect()
}

/// Fetch the tasks matching `args` and return them with the has-more flag.
///
pub async fn fetch(notion: &Notion, config: &Config, args: &TaskArgs) -> Result<(Vec<Task>, bool)> {
    let mut filter = build_filter(args, &config.directory())?;
    if args.sprint == SprintScope::Current {
        let sprint = notion.current_sprint(config.sprints_database()?).await?;
        debug!("Current sprint is {} ({})", sprint.name, sprint.id);
        filter.sprint = Some(SprintMembership::ById(sprint.id));
    }

    let mut fetcher = notion.tasks(config.tasks_database()?, &filter);
    if let Some(limit) = args.limit {
        fetcher = fetcher.with_limit(limit)?;
    }
    let tasks = fetcher.all().await?;
    Ok((tasks, fetcher.has_more()))
}

pub async fn run(notion: &Notion, config: &Config, args: &TaskArgs, style: TableStyle) -> Result<()> {
    let (tasks, has_more) = fetch(notion, config, args).await?;

    let rows = tasks.iter().map(|task| task_row(task, config)).collect();
    let table = Table::new(columns())
        .with_style(style)
        .with_colors(io::stdout().is_terminal())
        .with_rows(rows);
    if table.is_empty() {
        ui::info("No tasks found");
        return Ok(());
    }
    println!("{}", table.render());
    println!();
    ui::info(fetched_summary(table.len(), "tasks", has_more));

    if let Some(outfile) = &args.outfile {
        export(&table, outfile);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Entry;
    use crate::notion::fixtures::*;
    use crate::notion::STATUS_DONE;
    use httpmock::MockServer;
    use serde_json::json;

    fn config() -> Config {
        let entry = |id: &str, name: &str| Entry {
            id: id.to_string(),
            name: name.to_string(),
        };
        let mut config = Config::default();
        config.tasks_database_id = "tasks".to_string();
        config.sprints_database_id = "sprints".to_string();
        config.users = vec![entry("u1", "Ada Lovelace"), entry("u2", "Alan Turing")];
        config.projects = vec![entry("p1", "Apollo"), entry("p2", "Gemini")];
        config
    }

    #[test]
    fn test_build_filter_defaults_to_planned_tasks() {
        let config = config();
        let filter = build_filter(&TaskArgs::default(), &config.directory()).unwrap();
        assert_eq!(
            filter,
            TaskFilter {
                sprint: Some(SprintMembership::NoBacklog),
                ..TaskFilter::default()
            }
        );
    }

    #[test]
    fn test_build_filter_resolves_names() {
        let config = config();
        let args = TaskArgs {
            assignee: Some("ada".to_string()),
            reviewer: Some("turing".to_string()),
            projects: vec!["gem".to_string()],
            statuses: vec!["d".to_string()],
            sprint: SprintScope::All,
            ..TaskArgs::default()
        };
        let filter = build_filter(&args, &config.directory()).unwrap();
        assert_eq!(filter.assignees, vec!["u1"]);
        assert_eq!(filter.reviewers, vec!["u2"]);
        assert_eq!(filter.projects, vec!["p2"]);
        assert_eq!(filter.statuses, vec![STATUS_DONE]);
        assert_eq!(filter.sprint, None);
    }

    #[test]
    fn test_build_filter_rejects_unknown_values() {
        let config = config();
        let unknown_user = TaskArgs {
            user: Some("grace".to_string()),
            ..TaskArgs::default()
        };
        assert!(matches!(
            build_filter(&unknown_user, &config.directory()),
            Err(NotionError::Validation(_))
        ));

        let unknown_status = TaskArgs {
            statuses: vec!["X".to_string()],
            ..TaskArgs::default()
        };
        assert!(build_filter(&unknown_status, &config.directory()).is_err());
    }

    #[test]
    fn test_priority_color() {
        assert_eq!(priority_color("High"), Some(Color::Red));
        assert_eq!(priority_color("Medium"), Some(Color::Yellow));
        assert_eq!(priority_color("Low"), Some(Color::Green));
        assert_eq!(priority_color(""), None);

        let priority = columns().into_iter().find(|c| c.key == "priority").unwrap();
        assert!(priority.cell_color.is_some());
    }

    #[test]
    fn test_task_row() {
        let config = config();
        let page = serde_json::from_value(task_page("t1", 42, "Done", &["s1"])).unwrap();
        let task = <Task as crate::notion::FromPage>::from_page(&page).unwrap();
        let row = task_row(&task, &config);
        assert_eq!(row["story_id"], "42");
        assert_eq!(row["project"], "Apollo");
        assert_eq!(row["status"], "✅ Done");
        assert_eq!(row["estimate"], "3.5 h");
        assert_eq!(row["reviewer"], "");
    }

    #[tokio::test]
    async fn test_fetch_current_sprint_tasks() {
        let server = MockServer::start();
        let sprints = server
            .mock_async(|when, then| {
                when.method("POST").path("/databases/sprints/query");
                then.status(200).json_body(json!({
                    "object": "list",
                    "results": [sprint_page("s70", "Sprint 70", "Current")],
                    "has_more": false,
                    "next_cursor": null
                }));
            })
            .await;
        let in_sprint = json!({ "property": "Sprint", "relation": { "contains": "s70" } });
        let first_page = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/databases/tasks/query")
                    .json_body(json!({ "page_size": 5, "filter": in_sprint.clone() }));
                then.status(200).json_body(json!({
                    "object": "list",
                    "results": (1..=3)
                        .map(|n| task_page(&format!("t{}", n), n, "Done", &["s70"]))
                        .collect::<Vec<_>>(),
                    "has_more": true,
                    "next_cursor": "c1"
                }));
            })
            .await;
        let second_page = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/databases/tasks/query")
                    .json_body(json!({ "page_size": 2, "filter": in_sprint.clone(), "start_cursor": "c1" }));
                then.status(200).json_body(json!({
                    "object": "list",
                    "results": (4..=5)
                        .map(|n| task_page(&format!("t{}", n), n, "Done", &["s70"]))
                        .collect::<Vec<_>>(),
                    "has_more": true,
                    "next_cursor": "c2"
                }));
            })
            .await;

        let notion = Notion::with_base_url("token", &server.base_url()).unwrap();
        let args = TaskArgs {
            sprint: SprintScope::Current,
            limit: Some(5),
            ..TaskArgs::default()
        };
        let (found, has_more) = fetch(&notion, &config(), &args).await.unwrap();
        assert_eq!(found.len(), 5);
        assert_eq!(found[4].id, "t5");
        assert!(has_more);
        sprints.assert_async().await;
        first_page.assert_async().await;
        second_page.assert_async().await;
    }
}
