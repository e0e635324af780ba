//! HTTP client for Notion API requests.
//!
//! This module provides a low-level HTTP client wrapper for making requests
//! to the Notion API, handling authentication, API versioning, and response
//! parsing. Pagination is driven one page at a time by the fetchers.

use super::error::NotionError;
use super::models::*;
use log::*;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

const NOTION_VERSION: &str = "2022-06-28";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Makes requests to Notion and tries to conform response data to given model.
///
#[derive(Clone)]
pub struct Client {
    access_token: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given access token and base URL.
    ///
    pub fn new(access_token: &str, base_url: &str) -> Result<Self, NotionError> {
        Ok(Client {
            access_token: access_token.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            http_client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()?,
        })
    }

    /// Query one page of a database.
    ///
    pub async fn query_database(
        &self,
        database_id: &str,
        request: &QueryRequest<'_>,
    ) -> Result<ListResponse<RemotePage>, NotionError> {
        debug!(
            "Querying database {} (page size {}, cursor {:?})...",
            database_id, request.page_size, request.start_cursor
        );
        let path = format!("databases/{}/query", database_id);
        self.send(self.request(Method::POST, &path).json(request))
            .await
    }

    /// List one page of workspace users.
    ///
    pub async fn list_users(
        &self,
        page_size: usize,
        start_cursor: Option<&str>,
    ) -> Result<ListResponse<RawUser>, NotionError> {
        debug!(
            "Listing users (page size {}, cursor {:?})...",
            page_size, start_cursor
        );
        let mut params = vec![("page_size", page_size.to_string())];
        if let Some(cursor) = start_cursor {
            params.push(("start_cursor", cursor.to_owned()));
        }
        self.send(self.request(Method::GET, "users").query(&params))
            .await
    }

    /// Prepare an authenticated request for the endpoint path.
    ///
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.http_client
            .request(method, url)
            .bearer_auth(&self.access_token)
            .header("Notion-Version", NOTION_VERSION)
    }

    /// Send the request and decode the body, mapping error statuses to
    /// [`NotionError::Api`].
    ///
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, NotionError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let error = match serde_json::from_slice::<ErrorBody>(&body) {
                Ok(error) => NotionError::Api {
                    status: status.as_u16(),
                    code: error.code,
                    message: error.message,
                },
                Err(_) => NotionError::Api {
                    status: status.as_u16(),
                    code: String::from("unknown"),
                    message: String::from_utf8_lossy(&body).into_owned(),
                },
            };
            return Err(error);
        }

        trace!("Received {} bytes with status {}", body.len(), status);
        Ok(serde_json::from_slice(&body)?)
    }
}
