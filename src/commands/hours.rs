use super::{export, fetched_summary, format_hours, format_local};
use crate::config::{Config, Directory};
use crate::notion::{HoursDate, HoursEntry, HoursFilter, Notion, NotionError};
use crate::ui::{self, Alignment, Column, Row, Table, TableStyle};
use anyhow::Result;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const COLUMN_KEYS: [&str; 6] = ["id", "date", "user", "project", "hours", "created"];
pub const DEFAULT_COLUMNS: [&str; 4] = ["date", "user", "project", "hours"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupBy {
    User,
    Project,
}

impl GroupBy {
    pub fn from_name(name: &str) -> Option<GroupBy> {
        match name {
            "user" => Some(GroupBy::User),
            "project" => Some(GroupBy::Project),
            _ => None,
        }
    }

    fn column(&self) -> Column {
        match self {
            GroupBy::User => Column::new("user", "User"),
            GroupBy::Project => Column::new("project", "Project"),
        }
    }
}

/// Parse the `--date` value: `all`, `today`, `yesterday` or a `YYYY-MM-DD`
/// day. `all` means no date constraint.
///
pub fn parse_date_arg(value: &str) -> Result<Option<HoursDate>, NotionError> {
    match value {
        "all" => Ok(None),
        "today" => Ok(Some(HoursDate::Today)),
        "yesterday" => Ok(Some(HoursDate::Yesterday)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map(|day| Some(HoursDate::On(day)))
            .map_err(|_| {
                NotionError::Validation(format!(
                    "invalid date '{}', expected all, today, yesterday or YYYY-MM-DD",
                    other
                ))
            }),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoursArgs {
    pub users: Vec<String>,
    pub projects: Vec<String>,
    pub date: Option<HoursDate>,
    pub group_by: Option<GroupBy>,
    pub columns: Vec<String>,
    pub limit: Option<usize>,
    pub outfile: Option<PathBuf>,
}

impl Default for HoursArgs {
    fn default() -> Self {
        HoursArgs {
            users: vec![],
            projects: vec![],
            date: None,
            group_by: None,
            columns: DEFAULT_COLUMNS.iter().map(|key| key.to_string()).collect(),
            limit: Some(50),
            outfile: None,
        }
    }
}

pub fn build_filter(args: &HoursArgs, directory: &Directory) -> Result<HoursFilter, NotionError> {
    Ok(HoursFilter {
        projects: directory.resolve_projects(&args.projects)?,
        users: directory.resolve_users(&args.users)?,
        date: args.date,
    })
}

pub fn column(key: &str) -> Option<Column> {
    let column = match key {
        "id" => Column::new("id", "ID"),
        "date" => Column::new("date", "Date"),
        "user" => Column::new("user", "User"),
        "project" => Column::new("project", "Project"),
        "hours" => Column::new("hours", "Hours").with_alignment(Alignment::Right),
        "created" => Column::new("created", "Created"),
        _ => return None,
    };
    Some(column)
}

/// Columns for the given keys, in order.
///
pub fn columns<S: AsRef<str>>(keys: &[S]) -> Result<Vec<Column>, NotionError> {
    keys.iter()
        .map(|key| {
            let key = key.as_ref();
            column(key).ok_or_else(|| {
                NotionError::Validation(format!(
                    "unknown column '{}', valid values are {:?}",
                    key, COLUMN_KEYS
                ))
            })
        })
        .collect()
}

fn project_label(entry: &HoursEntry, directory: &Directory) -> String {
    entry
        .project_id()
        .and_then(|id| directory.project_name(id))
        .unwrap_or_default()
        .to_string()
}

pub fn entry_row(entry: &HoursEntry, config: &Config) -> Row {
    let directory = config.directory();
    [
        ("id", entry.id.clone()),
        ("date", entry.date.format(&config.date_format).to_string()),
        ("user", entry.user_label()),
        ("project", project_label(entry, &directory)),
        ("hours", format_hours(entry.hours)),
        ("created", format_local(&entry.created, &config.datetime_format)),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroupTotals {
    pub entries: usize,
    pub hours: f64,
}

/// Entry count and hours sum per group, ordered by group name.
///
pub fn group(
    entries: &[HoursEntry],
    by: GroupBy,
    directory: &Directory,
) -> BTreeMap<String, GroupTotals> {
    let mut groups: BTreeMap<String, GroupTotals> = BTreeMap::new();
    for entry in entries {
        let key = match by {
            GroupBy::User => entry.user_label(),
            GroupBy::Project => project_label(entry, directory),
        };
        let totals = groups.entry(key).or_default();
        totals.entries += 1;
        totals.hours += entry.hours;
    }
    groups
}

pub fn group_table(groups: &BTreeMap<String, GroupTotals>, by: GroupBy, style: TableStyle) -> Table {
    let key_column = by.column();
    let rows = groups
        .iter()
        .map(|(name, totals)| {
            let mut row = Row::new();
            row.insert(key_column.key.clone(), name.clone());
            row.insert("entries".to_string(), totals.entries.to_string());
            row.insert("hours".to_string(), format_hours(totals.hours));
            row
        })
        .collect();

    Table::new(vec![
        key_column,
        Column::new("entries", "Entries").with_alignment(Alignment::Right),
        Column::new("hours", "Hours").with_alignment(Alignment::Right),
    ])
    .with_style(style)
    .with_rows(rows)
}

pub async fn fetch(
    notion: &Notion,
    config: &Config,
    args: &HoursArgs,
) -> Result<(Vec<HoursEntry>, bool)> {
    let filter = build_filter(args, &config.directory())?;
    let mut fetcher = notion.hours(config.hours_database()?, &filter);
    if let Some(limit) = args.limit {
        fetcher = fetcher.with_limit(limit)?;
    }
    let entries = fetcher.all().await?;
    Ok((entries, fetcher.has_more()))
}

pub async fn run(notion: &Notion, config: &Config, args: &HoursArgs, style: TableStyle) -> Result<()> {
    let columns = columns(&args.columns)?;
    let (entries, has_more) = fetch(notion, config, args).await?;

    let rows = entries.iter().map(|entry| entry_row(entry, config)).collect();
    let table = Table::new(columns).with_style(style).with_rows(rows);
    if table.is_empty() {
        ui::info("No hours entries found");
        return Ok(());
    }
    println!("{}", table.render());
    println!();
    ui::info(fetched_summary(table.len(), "entries", has_more));

    if let Some(outfile) = &args.outfile {
        export(&table, outfile);
    }

    if let Some(by) = args.group_by {
        let groups = group(&entries, by, &config.directory());
        println!();
        println!("{}", group_table(&groups, by, style).render());
    }
    Ok(())
}
