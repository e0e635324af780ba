use crate::config::Config;
use crate::notion::{Notion, NotionError, Sprint, SprintFilter, SprintMembership, Task, TaskFilter};
use crate::ui::{self, BarChart};
use crate::utils::text_processing::sprint_number;
use anyhow::Result;
use crossterm::terminal;
use log::*;

const DEFAULT_COLUMNS: usize = 80;
const LINE_PADDING: usize = 5;
const AMOUNT_WIDTH: usize = 10;
const MIN_BAR_WIDTH: usize = 10;
const MAX_BAR_WIDTH: usize = 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SprintChartArgs {
    pub users: Vec<String>,
    pub from: u32,
    pub to: u32,
}

impl SprintChartArgs {
    pub fn validate(&self) -> Result<(), NotionError> {
        if self.from >= self.to {
            return Err(NotionError::Validation(format!(
                "starting sprint '{}' must be lower than end sprint '{}'",
                self.from, self.to
            )));
        }
        Ok(())
    }

    pub fn categories(&self) -> Vec<String> {
        (self.from..=self.to).map(|n| format!("Sprint {}", n)).collect()
    }
}

/// Sprint whose name carries the given number.
///
pub fn find_sprint(sprints: &[Sprint], number: u32) -> Option<&Sprint> {
    sprints
        .iter()
        .find(|sprint| sprint_number(&sprint.name) == Some(number))
}

pub fn total_estimate(tasks: &[Task]) -> f64 {
    tasks.iter().map(|task| task.estimate).sum()
}

fn terminal_columns() -> usize {
    terminal::size()
        .map(|(columns, _)| columns as usize)
        .unwrap_or(DEFAULT_COLUMNS)
}

/// Widest bar that keeps a chart line, label and amount included, inside
/// `columns`.
///
pub fn bar_width(columns: usize, label_width: usize) -> usize {
    columns
        .saturating_sub(label_width + LINE_PADDING + AMOUNT_WIDTH)
        .clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH)
}

/// Estimated hours of one user for each sprint in the range.
///
async fn user_series(
    notion: &Notion,
    tasks_database: &str,
    sprints: &[Sprint],
    user_id: &str,
    args: &SprintChartArgs,
) -> Result<Vec<f64>, NotionError> {
    let mut values = Vec::new();
    for number in args.from..=args.to {
        let sprint = find_sprint(sprints, number)
            .ok_or_else(|| NotionError::NotFound(format!("could not find sprint {}", number)))?;
        let filter = TaskFilter {
            users: vec![user_id.to_string()],
            sprint: Some(SprintMembership::ById(sprint.id.clone())),
            ..TaskFilter::default()
        };
        let tasks = notion.tasks(tasks_database, &filter).all().await?;
        trace!("{} tasks for {} in {}", tasks.len(), user_id, sprint.name);
        values.push(total_estimate(&tasks));
    }
    Ok(values)
}

pub async fn build(notion: &Notion, config: &Config, args: &SprintChartArgs) -> Result<BarChart> {
    args.validate()?;
    let directory = config.directory();
    let users = args
        .users
        .iter()
        .map(|name| directory.resolve_user(name))
        .collect::<Result<Vec<_>, _>>()?;
    let tasks_database = config.tasks_database()?;

    let sprints = ui::spin(
        "Loading sprints",
        notion
            .sprints(config.sprints_database()?, &SprintFilter::default())
            .all(),
    )
    .await?;
    debug!("Loaded {} sprints", sprints.len());

    let label_width = users
        .iter()
        .map(|user| user.name.chars().count())
        .max()
        .unwrap_or(0);
    let mut chart = BarChart::new("Sprint hours", args.categories())
        .with_width(bar_width(terminal_columns(), label_width))
        .with_unit("h");
    for user in users {
        let label = format!("Loading and aggregating tasks for user {}", user.name);
        let values = ui::spin(
            &label,
            user_series(notion, tasks_database, &sprints, &user.id, args),
        )
        .await?;
        chart.add_series(&user.name, values);
    }
    Ok(chart)
}

pub async fn run(notion: &Notion, config: &Config, args: &SprintChartArgs) -> Result<()> {
    let chart = build(notion, config, args).await?;
    println!("{}", chart.render());
    Ok(())
}
