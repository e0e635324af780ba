use crate::config::{Config, Entry};
use crate::error::AppError;
use crate::notion::Notion;
use crate::ui;
use anyhow::Result;
use log::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigureArgs {
    pub tasks_db: Option<String>,
    pub projects_db: Option<String>,
    pub sprints_db: Option<String>,
    pub hours_db: Option<String>,
    pub sync: bool,
}

/// Overwrite the database IDs given on the command line.
///
pub fn apply(config: &mut Config, args: &ConfigureArgs) {
    let targets = [
        (&args.tasks_db, &mut config.tasks_database_id),
        (&args.projects_db, &mut config.projects_database_id),
        (&args.sprints_db, &mut config.sprints_database_id),
        (&args.hours_db, &mut config.hours_database_id),
    ];
    for (value, target) in targets {
        if let Some(value) = value {
            *target = value.trim().to_string();
        }
    }
}

/// Refresh the cached users (bots excluded) and projects.
///
pub async fn sync(notion: &Notion, config: &mut Config) -> Result<(), AppError> {
    let users = ui::spin("Loading users", notion.users(true).all()).await?;
    let projects = ui::spin(
        "Loading projects",
        notion.projects(config.projects_database()?).all(),
    )
    .await?;
    info!("Synced {} users and {} projects", users.len(), projects.len());

    config.users = users.into_iter().map(Entry::from).collect();
    config.projects = projects.into_iter().map(Entry::from).collect();
    Ok(())
}

pub async fn run(config_path: Option<&str>, args: &ConfigureArgs) -> Result<()> {
    let mut config = Config::new();
    if !config.load(config_path)? {
        debug!("No configuration found, starting from defaults");
    }
    apply(&mut config, args);

    if args.sync {
        let notion = Notion::new(&Config::access_token()?)?;
        sync(&notion, &mut config).await?;
    }

    let path = config.save()?;
    ui::success(format!("Configuration saved to {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notion::fixtures::*;
    use httpmock::MockServer;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_apply_keeps_unset_ids() {
        let mut config = Config::new();
        config.hours_database_id = "old-hours".to_string();
        apply(
            &mut config,
            &ConfigureArgs {
                tasks_db: Some(" new-tasks ".to_string()),
                ..ConfigureArgs::default()
            },
        );
        assert_eq!(config.tasks_database_id, "new-tasks");
        assert_eq!(config.hours_database_id, "old-hours");
    }

    #[tokio::test]
    async fn test_run_without_sync_writes_file() {
        let dir = tempdir().unwrap();
        let args = ConfigureArgs {
            tasks_db: Some("tasks".to_string()),
            ..ConfigureArgs::default()
        };
        run(dir.path().to_str(), &args).await.unwrap();

        let mut config = Config::new();
        assert!(config.load(dir.path().to_str()).unwrap());
        assert_eq!(config.tasks_database_id, "tasks");
    }

    #[tokio::test]
    async fn test_sync_fills_directory() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/users");
                then.status(200).json_body(json!({
                    "object": "list",
                    "results": [
                        { "object": "user", "id": "u1", "type": "person", "name": "Ada" },
                        { "object": "user", "id": "b1", "type": "bot", "name": "Importer" }
                    ],
                    "has_more": false,
                    "next_cursor": null
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method("POST").path("/databases/projects/query");
                then.status(200).json_body(json!({
                    "object": "list",
                    "results": [project_page("p1", "Apollo")],
                    "has_more": false,
                    "next_cursor": null
                }));
            })
            .await;

        let notion = Notion::with_base_url("token", &server.base_url()).unwrap();
        let mut config = Config::new();
        config.projects_database_id = "projects".to_string();
        sync(&notion, &mut config).await.unwrap();

        assert_eq!(config.users.len(), 1);
        assert_eq!(config.directory().resolve_user("ada").unwrap().id, "u1");
        assert_eq!(config.directory().project_name("p1"), Some("Apollo"));
    }

    #[tokio::test]
    async fn test_sync_requires_projects_database() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/users");
                then.status(200).json_body(json!({
                    "object": "list",
                    "results": [],
                    "has_more": false,
                    "next_cursor": null
                }));
            })
            .await;

        let notion = Notion::with_base_url("token", &server.base_url()).unwrap();
        let mut config = Config::new();
        assert!(matches!(
            sync(&notion, &mut config).await,
            Err(AppError::Config(_))
        ));
    }
}
