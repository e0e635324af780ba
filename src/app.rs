use crate::cli;
use crate::commands::{chart, configure, hours, task};
use crate::config::{Config, ConfigError};
use crate::error::AppError;
use crate::logger::CliLogger;
use crate::notion::Notion;
use crate::ui::TableStyle;
use anyhow::{anyhow, Result};
use clap::ArgMatches;
use log::*;

/// Oversees configuration loading and command dispatch.
///
pub struct App {
    config: Config,
    notion: Notion,
    style: TableStyle,
}

impl App {
    /// Run the command selected by `matches`. Ctrl-C drops the running
    /// command, abandoning any request in flight.
    ///
    pub async fn start(matches: &ArgMatches<'_>) -> Result<()> {
        let leaf = cli::leaf(matches);
        CliLogger::init(leaf.occurrences_of("verbose"))?;
        info!("Starting noty {}...", env!("CARGO_PKG_VERSION"));

        let config_path = leaf.value_of("config");
        let style = TableStyle::from_name(leaf.value_of("style").unwrap_or("default"));

        let work = async {
            match matches.subcommand() {
                ("configure", Some(sub)) => {
                    configure::run(config_path, &cli::configure_args(sub)).await
                }
                (name, Some(sub)) => {
                    let app = App::load(config_path, style)?;
                    app.dispatch(name, sub).await
                }
                _ => Err(anyhow!("No command given, see --help")),
            }
        };

        let result = tokio::select! {
            result = work => result,
            _ = tokio::signal::ctrl_c() => Err(AppError::Interrupted.into()),
        };
        info!("Exiting noty...");
        result
    }

    /// Load the configuration and connect. Every command but `configure`
    /// needs an existing configuration file.
    ///
    fn load(config_path: Option<&str>, style: TableStyle) -> Result<App, AppError> {
        let mut config = Config::new();
        if !config.load(config_path)? {
            return Err(ConfigError::NotConfigured.into());
        }
        let notion = Notion::new(&Config::access_token()?)?;
        Ok(App {
            config,
            notion,
            style,
        })
    }

    async fn dispatch(&self, name: &str, matches: &ArgMatches<'_>) -> Result<()> {
        debug!("Running command {}...", name);
        match (name, matches.subcommand()) {
            ("task", _) => {
                let args = cli::task_args(matches)?;
                task::run(&self.notion, &self.config, &args, self.style).await
            }
            ("hours", _) => {
                let args = cli::hours_args(matches)?;
                hours::run(&self.notion, &self.config, &args, self.style).await
            }
            ("chart", ("sprints", Some(sub))) => {
                let args = cli::sprint_chart_args(sub)?;
                chart::run(&self.notion, &self.config, &args).await
            }
            (other, _) => Err(anyhow!("Unknown command '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_requires_configuration() {
        let dir = tempdir().unwrap();
        let result = App::load(dir.path().to_str(), TableStyle::Default);
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::NotConfigured))
        ));
    }
}
