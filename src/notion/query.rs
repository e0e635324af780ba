//! Resource fetchers: concrete [`FetcherClient`] implementations bound to a
//! Notion endpoint.

use super::client::Client;
use super::decode::FromPage;
use super::error::NotionError;
use super::fetcher::{FetcherClient, Page};
use super::filter::Filter;
use super::models::QueryRequest;
use super::resource::User;
use std::marker::PhantomData;

/// Largest page size the API accepts.
pub const MAX_PAGE_SIZE: usize = 100;

/// Accept a page size only when the API would.
fn valid_page_size(limit: usize) -> Option<usize> {
    (1..=MAX_PAGE_SIZE).contains(&limit).then_some(limit)
}

/// Filtered query over one database, decoding every result into `T`.
///
pub struct DatabaseQuery<T> {
    client: Client,
    database_id: String,
    filter: Option<Filter>,
    page_size: usize,
    cursor: Option<String>,
    record: PhantomData<fn() -> T>,
}

impl<T> DatabaseQuery<T> {
    pub fn new(client: Client, database_id: &str, filter: Option<Filter>) -> Self {
        DatabaseQuery {
            client,
            database_id: database_id.to_owned(),
            filter,
            page_size: MAX_PAGE_SIZE,
            cursor: None,
            record: PhantomData,
        }
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }
}

impl<T: FromPage> FetcherClient for DatabaseQuery<T> {
    type Item = T;

    async fn fetch(&mut self) -> Result<Page<T>, NotionError> {
        let request = QueryRequest {
            filter: self.filter.as_ref(),
            page_size: self.page_size,
            start_cursor: self.cursor.as_deref(),
        };
        let response = self
            .client
            .query_database(&self.database_id, &request)
            .await?;

        // One bad record fails the whole page.
        let items = response
            .results
            .iter()
            .map(T::from_page)
            .collect::<Result<Vec<T>, _>>()?;

        Ok(Page {
            items,
            next_cursor: response.continuation(),
        })
    }

    fn request_limit(&self) -> usize {
        self.page_size
    }

    fn set_request_limit(&mut self, limit: usize) {
        if let Some(limit) = valid_page_size(limit) {
            self.page_size = limit;
        }
    }

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor;
    }
}

/// Listing of workspace members.
///
pub struct UserQuery {
    client: Client,
    exclude_bots: bool,
    page_size: usize,
    cursor: Option<String>,
}

impl UserQuery {
    pub fn new(client: Client, exclude_bots: bool) -> Self {
        UserQuery {
            client,
            exclude_bots,
            page_size: MAX_PAGE_SIZE,
            cursor: None,
        }
    }
}

impl FetcherClient for UserQuery {
    type Item = User;

    async fn fetch(&mut self) -> Result<Page<User>, NotionError> {
        let response = self
            .client
            .list_users(self.page_size, self.cursor.as_deref())
            .await?;
        let next_cursor = response.continuation();

        let items = response
            .results
            .into_iter()
            .filter(|user| !(self.exclude_bots && user.is_bot()))
            .map(|user| User {
                name: user.name.unwrap_or_else(|| user.id.clone()),
                id: user.id,
            })
            .collect();

        Ok(Page { items, next_cursor })
    }

    fn request_limit(&self) -> usize {
        self.page_size
    }

    fn set_request_limit(&mut self, limit: usize) {
        if let Some(limit) = valid_page_size(limit) {
            self.page_size = limit;
        }
    }

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notion::decode::DecodeError;
    use crate::notion::fetcher::Fetcher;
    use crate::notion::resource::fixtures::*;
    use crate::notion::resource::{Project, Task};
    use httpmock::MockServer;
    use serde_json::json;

    #[test]
    fn test_page_size_is_bounded() {
        let client = Client::new("token", "http://localhost").unwrap();
        let mut query: DatabaseQuery<Project> = DatabaseQuery::new(client, "db", None);

        query.set_request_limit(0);
        assert_eq!(query.request_limit(), MAX_PAGE_SIZE);
        query.set_request_limit(250);
        assert_eq!(query.request_limit(), MAX_PAGE_SIZE);
        query.set_request_limit(25);
        assert_eq!(query.request_limit(), 25);
    }

    #[tokio::test]
    async fn test_decode_failure_fails_the_page() {
        let server = MockServer::start();
        let mut broken = task_page("t2", 2, "Done", &[]);
        broken["properties"].as_object_mut().unwrap().remove("Status");
        server
            .mock_async(|when, then| {
                when.method("POST").path("/databases/tasks/query");
                then.status(200).json_body(json!({
                    "object": "list",
                    "results": [task_page("t1", 1, "Done", &[]), broken],
                    "has_more": false,
                    "next_cursor": null
                }));
            })
            .await;

        let client = Client::new("token", &server.base_url()).unwrap();
        let mut fetcher = Fetcher::new(DatabaseQuery::<Task>::new(client, "tasks", None), 100);

        assert!(matches!(
            fetcher.all().await,
            Err(NotionError::Decode(DecodeError::MissingProperty { .. }))
        ));
    }

    #[tokio::test]
    async fn test_database_query_follows_cursor_within_limit() -> Result<(), NotionError> {
        let server = MockServer::start();
        let first = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/databases/projects/query")
                    .json_body(json!({ "page_size": 3 }));
                then.status(200).json_body(json!({
                    "object": "list",
                    "results": [project_page("p1", "Apollo"), project_page("p2", "Gemini")],
                    "has_more": true,
                    "next_cursor": "c1"
                }));
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/databases/projects/query")
                    .json_body(json!({ "page_size": 1, "start_cursor": "c1" }));
                then.status(200).json_body(json!({
                    "object": "list",
                    "results": [project_page("p3", "Mercury")],
                    "has_more": true,
                    "next_cursor": "c2"
                }));
            })
            .await;

        let client = Client::new("token", &server.base_url())?;
        let mut fetcher =
            Fetcher::new(DatabaseQuery::<Project>::new(client, "projects", None), 100)
                .with_limit(3)?;
        let projects = fetcher.all().await?;

        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Apollo", "Gemini", "Mercury"]);
        assert!(fetcher.has_more());
        first.assert_async().await;
        second.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_user_query_excludes_bots() -> Result<(), NotionError> {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/users");
                then.status(200).json_body(json!({
                    "object": "list",
                    "results": [
                        { "object": "user", "id": "u1", "type": "person", "name": "Ada" },
                        { "object": "user", "id": "b1", "type": "bot", "name": "Importer" },
                        { "object": "user", "id": "u2", "type": "person" }
                    ],
                    "has_more": false,
                    "next_cursor": null
                }));
            })
            .await;

        let client = Client::new("token", &server.base_url())?;
        let users = Fetcher::new(UserQuery::new(client.clone(), true), 100)
            .all()
            .await?;
        assert_eq!(
            users,
            vec![
                User { id: "u1".to_string(), name: "Ada".to_string() },
                User { id: "u2".to_string(), name: "u2".to_string() },
            ]
        );

        let everyone = Fetcher::new(UserQuery::new(client, false), 100).all().await?;
        assert_eq!(everyone.len(), 3);
        Ok(())
    }
}
