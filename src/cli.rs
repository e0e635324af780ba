//! Command-line definition and conversion of matches into command
//! arguments.

use crate::commands::chart::SprintChartArgs;
use crate::commands::configure::ConfigureArgs;
use crate::commands::hours::{self, GroupBy, HoursArgs};
use crate::commands::task::{SprintScope, TaskArgs};
use crate::commands::fetch_limit;
use crate::notion::NotionError;
use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use std::path::PathBuf;

const DEFAULT_LIMIT: usize = 50;

fn is_number(value: String) -> Result<(), String> {
    value
        .parse::<usize>()
        .map(|_| ())
        .map_err(|_| format!("'{}' is not a positive number", value))
}

fn limit_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
    vec![
        Arg::with_name("all")
            .long("all")
            .help("Fetch every matching record")
            .conflicts_with("limit"),
        Arg::with_name("limit")
            .short("l")
            .long("limit")
            .takes_value(true)
            .validator(is_number)
            .help("Limit the number of records to fetch [default: 50]"),
        Arg::with_name("outfile")
            .short("o")
            .long("outfile")
            .takes_value(true)
            .help("Export the result as CSV"),
    ]
}

fn list_arg<'a, 'b>(name: &'a str, short: &'a str, help: &'a str) -> Arg<'a, 'b> {
    Arg::with_name(name)
        .short(short)
        .long(name)
        .takes_value(true)
        .multiple(true)
        .number_of_values(1)
        .use_delimiter(true)
        .help(help)
}

/// Build the command-line application.
///
pub fn build<'a, 'b>() -> App<'a, 'b> {
    App::new("noty")
        .version(crate_version!())
        .about("A utility to query Notion tasks, sprints and working hours")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .setting(AppSettings::VersionlessSubcommands)
        .arg(
            Arg::with_name("config")
                .long("config")
                .takes_value(true)
                .global(true)
                .help("Directory holding config.yml"),
        )
        .arg(
            Arg::with_name("style")
                .long("style")
                .takes_value(true)
                .possible_values(&["default", "md"])
                .global(true)
                .help("Output table style"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Increase log verbosity"),
        )
        .subcommand(
            SubCommand::with_name("configure")
                .about("Set the database IDs and sync users and projects")
                .arg(Arg::with_name("tasks-db").long("tasks-db").takes_value(true))
                .arg(Arg::with_name("projects-db").long("projects-db").takes_value(true))
                .arg(Arg::with_name("sprints-db").long("sprints-db").takes_value(true))
                .arg(Arg::with_name("hours-db").long("hours-db").takes_value(true))
                .arg(
                    Arg::with_name("no-sync")
                        .long("no-sync")
                        .help("Do not refresh the cached users and projects"),
                ),
        )
        .subcommand(
            SubCommand::with_name("task")
                .about("List tasks")
                .arg(
                    Arg::with_name("user")
                        .short("u")
                        .long("user")
                        .takes_value(true)
                        .conflicts_with_all(&["assignee", "reviewer"])
                        .help("Filter tasks by user (assignee or reviewer)"),
                )
                .arg(
                    Arg::with_name("assignee")
                        .short("a")
                        .long("assignee")
                        .takes_value(true)
                        .help("Filter tasks by assignee"),
                )
                .arg(
                    Arg::with_name("reviewer")
                        .short("r")
                        .long("reviewer")
                        .takes_value(true)
                        .help("Filter tasks by reviewer"),
                )
                .arg(list_arg("project", "p", "Filter by project(s)"))
                .arg(list_arg(
                    "status",
                    "s",
                    "Filter by status(es) [NS, P, TBT, T, D, ND]",
                ))
                .arg(
                    Arg::with_name("sprint")
                        .long("sprint")
                        .takes_value(true)
                        .possible_values(&SprintScope::NAMES)
                        .help("Sprints to search tasks in [default: default]"),
                )
                .args(&limit_args()),
        )
        .subcommand(
            SubCommand::with_name("hours")
                .about("Fetch and analyze working hours")
                .arg(list_arg("users", "u", "Filter entries by user(s)"))
                .arg(list_arg("project", "p", "Filter by project(s)"))
                .arg(
                    Arg::with_name("date")
                        .short("d")
                        .long("date")
                        .takes_value(true)
                        .help("Filter entries by date: all, today, yesterday or YYYY-MM-DD [default: all]"),
                )
                .arg(
                    Arg::with_name("group-by")
                        .short("g")
                        .long("group-by")
                        .takes_value(true)
                        .possible_values(&["user", "project"])
                        .help("Add a summary grouped by user or project"),
                )
                .arg(
                    Arg::with_name("columns")
                        .long("columns")
                        .takes_value(true)
                        .use_delimiter(true)
                        .multiple(true)
                        .possible_values(&hours::COLUMN_KEYS)
                        .conflicts_with("add-columns")
                        .help("Columns to show [default: date,user,project,hours]"),
                )
                .arg(
                    Arg::with_name("add-columns")
                        .long("add-columns")
                        .takes_value(true)
                        .use_delimiter(true)
                        .multiple(true)
                        .possible_values(&hours::COLUMN_KEYS)
                        .help("Columns to add to the default ones"),
                )
                .args(&limit_args()),
        )
        .subcommand(
            SubCommand::with_name("chart")
                .about("Draw charts")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommand(
                    SubCommand::with_name("sprints")
                        .about("Estimated hours per user for a range of sprints")
                        .arg(list_arg("users", "u", "Users to add to the chart").required(true))
                        .arg(
                            Arg::with_name("from")
                                .long("from")
                                .takes_value(true)
                                .required(true)
                                .validator(is_number)
                                .help("First sprint number"),
                        )
                        .arg(
                            Arg::with_name("to")
                                .long("to")
                                .takes_value(true)
                                .required(true)
                                .validator(is_number)
                                .help("Last sprint number"),
                        ),
                ),
        )
}

/// Innermost subcommand matches, where global arguments end up.
///
pub fn leaf<'a>(matches: &'a ArgMatches<'a>) -> &'a ArgMatches<'a> {
    match matches.subcommand() {
        (_, Some(sub)) => leaf(sub),
        _ => matches,
    }
}

fn values(matches: &ArgMatches, name: &str) -> Vec<String> {
    matches
        .values_of(name)
        .map(|values| values.map(String::from).collect())
        .unwrap_or_default()
}

fn number<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, NotionError> {
    matches
        .value_of(name)
        .map(|value| {
            value
                .parse()
                .map_err(|_| NotionError::Validation(format!("invalid {} '{}'", name, value)))
        })
        .transpose()
}

fn limit(matches: &ArgMatches) -> Result<Option<usize>, NotionError> {
    let limit = number(matches, "limit")?.unwrap_or(DEFAULT_LIMIT);
    Ok(fetch_limit(matches.is_present("all"), limit))
}

fn outfile(matches: &ArgMatches) -> Option<PathBuf> {
    matches.value_of("outfile").map(PathBuf::from)
}

pub fn configure_args(matches: &ArgMatches) -> ConfigureArgs {
    ConfigureArgs {
        tasks_db: matches.value_of("tasks-db").map(String::from),
        projects_db: matches.value_of("projects-db").map(String::from),
        sprints_db: matches.value_of("sprints-db").map(String::from),
        hours_db: matches.value_of("hours-db").map(String::from),
        sync: !matches.is_present("no-sync"),
    }
}

pub fn task_args(matches: &ArgMatches) -> Result<TaskArgs, NotionError> {
    let sprint = matches.value_of("sprint").unwrap_or("default");
    Ok(TaskArgs {
        user: matches.value_of("user").map(String::from),
        assignee: matches.value_of("assignee").map(String::from),
        reviewer: matches.value_of("reviewer").map(String::from),
        projects: values(matches, "project"),
        statuses: values(matches, "status"),
        sprint: SprintScope::from_name(sprint)
            .ok_or_else(|| NotionError::Validation(format!("unknown sprint scope '{}'", sprint)))?,
        limit: limit(matches)?,
        outfile: outfile(matches),
    })
}

pub fn hours_args(matches: &ArgMatches) -> Result<HoursArgs, NotionError> {
    let mut columns = if matches.is_present("columns") {
        values(matches, "columns")
    } else {
        hours::DEFAULT_COLUMNS.iter().map(|key| key.to_string()).collect()
    };
    columns.extend(values(matches, "add-columns"));

    Ok(HoursArgs {
        users: values(matches, "users"),
        projects: values(matches, "project"),
        date: hours::parse_date_arg(matches.value_of("date").unwrap_or("all"))?,
        group_by: matches.value_of("group-by").and_then(GroupBy::from_name),
        columns,
        limit: limit(matches)?,
        outfile: outfile(matches),
    })
}

pub fn sprint_chart_args(matches: &ArgMatches) -> Result<SprintChartArgs, NotionError> {
    let required = |name: &str| {
        number::<u32>(matches, name)?
            .ok_or_else(|| NotionError::Validation(format!("missing --{}", name)))
    };
    Ok(SprintChartArgs {
        users: values(matches, "users"),
        from: required("from")?,
        to: required("to")?,
    })
}
