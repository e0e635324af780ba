mod client;
mod decode;
mod error;
mod fetcher;
mod filter;
mod filters;
mod models;
mod query;
mod resource;
pub mod schema;

pub use client::Client;
pub use decode::{first_or, parse_date, DateRange, DecodeError, FromPage};
pub use error::NotionError;
pub use fetcher::{FetchStatus, Fetcher, FetcherClient, Page, Partial};
pub use filter::*;
pub use filters::*;
pub use models::{PropertyValue, RemotePage};
pub use query::{DatabaseQuery, UserQuery, MAX_PAGE_SIZE};
pub use resource::*;

#[cfg(test)]
pub(crate) use resource::fixtures;

use log::*;

pub const API_BASE_URL: &str = "https://api.notion.com/v1";

pub type TaskFetcher = Fetcher<DatabaseQuery<Task>>;
pub type SprintFetcher = Fetcher<DatabaseQuery<Sprint>>;
pub type HoursFetcher = Fetcher<DatabaseQuery<HoursEntry>>;
pub type ProjectFetcher = Fetcher<DatabaseQuery<Project>>;
pub type UserFetcher = Fetcher<UserQuery>;

/// Entry point to the workspace databases: binds the generic [`Fetcher`] to
/// concrete queries, one fresh fetch session per call.
///
pub struct Notion {
    client: Client,
}

impl Notion {
    /// Returns a new instance for the given integration token.
    ///
    pub fn new(access_token: &str) -> Result<Notion, NotionError> {
        Notion::with_base_url(access_token, API_BASE_URL)
    }

    pub fn with_base_url(access_token: &str, base_url: &str) -> Result<Notion, NotionError> {
        debug!("Initializing Notion client for {}...", base_url);
        Ok(Notion {
            client: Client::new(access_token, base_url)?,
        })
    }

    fn database<T: FromPage, F: FilterSpec>(
        &self,
        database_id: &str,
        filter: &F,
    ) -> Fetcher<DatabaseQuery<T>> {
        let query = DatabaseQuery::new(self.client.clone(), database_id, filter.compile());
        Fetcher::new(query, MAX_PAGE_SIZE)
    }

    pub fn tasks(&self, database_id: &str, filter: &TaskFilter) -> TaskFetcher {
        self.database(database_id, filter)
    }

    pub fn sprints(&self, database_id: &str, filter: &SprintFilter) -> SprintFetcher {
        self.database(database_id, filter)
    }

    pub fn hours(&self, database_id: &str, filter: &HoursFilter) -> HoursFetcher {
        self.database(database_id, filter)
    }

    pub fn projects(&self, database_id: &str) -> ProjectFetcher {
        self.database(database_id, &())
    }

    pub fn users(&self, exclude_bots: bool) -> UserFetcher {
        Fetcher::new(UserQuery::new(self.client.clone(), exclude_bots), MAX_PAGE_SIZE)
    }

    /// Returns the sprint currently in progress.
    ///
    pub async fn current_sprint(&self, database_id: &str) -> Result<Sprint, NotionError> {
        debug!("Requesting current sprint...");
        let filter = SprintFilter::with_status(schema::sprint::CURRENT);
        self.sprints(database_id, &filter)
            .next_one()
            .await
            .map_err(|e| match e {
                NotionError::NotFound(_) => NotionError::NotFound(format!(
                    "no sprint with status '{}'",
                    schema::sprint::CURRENT
                )),
                other => other,
            })
    }
}
