//! Cursor-driven pagination engine.
//!
//! A [`Fetcher`] owns the paging state of one fetch session (cursor, items
//! fetched so far, optional cap) and drives any backend that implements
//! [`FetcherClient`]. Each call to [`Fetcher::next_page`] performs exactly one
//! remote request. When a cap is set, the last request is shrunk so that the
//! session never fetches more than the cap.

use super::error::NotionError;

/// One page of results and the cursor to the next one, if any.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

/// Capability a backend query must expose to be paged by a [`Fetcher`].
///
#[allow(async_fn_in_trait)]
pub trait FetcherClient {
    type Item;

    /// Fetch one page using the current cursor and request size.
    async fn fetch(&mut self) -> Result<Page<Self::Item>, NotionError>;

    /// Page size that the next request will ask for.
    fn request_limit(&self) -> usize;

    /// Change the page size of the next request. Implementations enforce the
    /// backend's own maximum.
    fn set_request_limit(&mut self, limit: usize);

    fn set_cursor(&mut self, cursor: Option<String>);
}

/// Where a fetch session stands.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchStatus {
    /// No page fetched yet
    Fresh,
    /// More pages are available
    Paging,
    /// The last page carried no cursor
    Exhausted,
    /// The cap has been reached
    LimitReached,
}

/// Results of a fetch session that may have stopped early.
///
/// `error` is set when a page failed; `items` then holds everything fetched
/// before the failure, in server order.
#[derive(Debug)]
pub struct Partial<T> {
    pub items: Vec<T>,
    pub error: Option<NotionError>,
}

impl<T> Partial<T> {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Discard partial results if the session failed.
    ///
    pub fn into_result(self) -> Result<Vec<T>, NotionError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.items),
        }
    }
}

/// Paging state machine over a [`FetcherClient`].
///
pub struct Fetcher<C> {
    client: C,
    limit: Option<usize>,
    fetched: usize,
    first_page: bool,
    cursor: Option<String>,
}

impl<C: FetcherClient> Fetcher<C> {
    /// Start a fresh, uncapped session.
    ///
    pub fn new(mut client: C, default_request_limit: usize) -> Self {
        client.set_request_limit(default_request_limit);
        Fetcher {
            client,
            limit: None,
            fetched: 0,
            first_page: true,
            cursor: None,
        }
    }

    /// Cap the session at `limit` items. The cap also becomes the page size
    /// of the first request, within the backend's maximum.
    ///
    /// Fails with [`NotionError::PagingStarted`] once a page has been fetched.
    pub fn with_limit(mut self, limit: usize) -> Result<Self, NotionError> {
        if !self.first_page {
            return Err(NotionError::PagingStarted);
        }
        self.limit = Some(limit);
        self.client.set_request_limit(limit);
        Ok(self)
    }

    pub fn status(&self) -> FetchStatus {
        if self.limit.map_or(false, |limit| self.fetched >= limit) {
            FetchStatus::LimitReached
        } else if self.first_page {
            FetchStatus::Fresh
        } else if self.cursor.is_some() {
            FetchStatus::Paging
        } else {
            FetchStatus::Exhausted
        }
    }

    /// Whether the session has reached a terminal state.
    ///
    pub fn is_done(&self) -> bool {
        matches!(
            self.status(),
            FetchStatus::Exhausted | FetchStatus::LimitReached
        )
    }

    /// Whether the server is expected to hold another page, regardless of
    /// the cap.
    ///
    pub fn has_more(&self) -> bool {
        self.first_page || self.cursor.is_some()
    }

    pub fn fetched(&self) -> usize {
        self.fetched
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Fetch the next page.
    ///
    pub async fn next_page(&mut self) -> Result<Vec<C::Item>, NotionError> {
        if self.is_done() {
            return Err(NotionError::NoNextPage);
        }
        self.client.set_cursor(self.cursor.clone());

        if let Some(limit) = self.limit {
            let remaining = limit - self.fetched;
            let request_limit = remaining.min(self.client.request_limit());
            self.client.set_request_limit(request_limit);
        }

        let page = self.client.fetch().await?;

        self.first_page = false;
        self.fetched += page.items.len();
        self.cursor = page.next_cursor;
        Ok(page.items)
    }

    /// Fetch every remaining page, concatenated in server order.
    ///
    /// Any failing page fails the whole call.
    pub async fn all(&mut self) -> Result<Vec<C::Item>, NotionError> {
        self.all_partial().await.into_result()
    }

    /// Fetch every remaining page, keeping what was fetched if a page fails.
    ///
    pub async fn all_partial(&mut self) -> Partial<C::Item> {
        let mut items = Vec::new();
        while !self.is_done() {
            match self.next_page().await {
                Ok(page) => items.extend(page),
                Err(error) => {
                    return Partial {
                        items,
                        error: Some(error),
                    }
                }
            }
        }
        Partial { items, error: None }
    }

    /// Fetch one page and return its first item.
    ///
    pub async fn next_one(&mut self) -> Result<C::Item, NotionError> {
        self.next_page()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| NotionError::NotFound("no record matches the query".to_string()))
    }
}
