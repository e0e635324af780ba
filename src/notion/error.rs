//! Notion API-specific error types.

use super::decode::DecodeError;

/// Errors that can occur while querying Notion and decoding its pages.
#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    /// A page property did not have the expected shape
    #[error("Failed to decode page: {0}")]
    Decode(#[from] DecodeError),

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (status {status}, {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Failed to deserialize API response
    #[error("Failed to deserialize API response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// A page was requested from a fetcher that has nothing left to fetch
    #[error("No next page")]
    NoNextPage,

    /// The fetch limit was changed after paging had started
    #[error("Fetch limit can only be set before the first page is fetched")]
    PagingStarted,

    /// A single-record lookup matched nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// A filter references a name that could not be resolved
    #[error("Invalid filter: {0}")]
    Validation(String),
}

impl NotionError {
    /// Whether the error came from the network or the remote service.
    ///
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            NotionError::Request(_) | NotionError::Api { .. } | NotionError::Deserialization(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notion_error_display() {
        let error = NotionError::NotFound("sprint with status 'Current'".to_string());
        assert!(error.to_string().contains("Not found"));
        assert!(error.to_string().contains("Current"));

        let error = NotionError::Validation("no user found for 'bob'".to_string());
        assert!(error.to_string().contains("Invalid filter"));
        assert!(error.to_string().contains("bob"));

        assert_eq!(NotionError::NoNextPage.to_string(), "No next page");
    }

    #[test]
    fn test_notion_error_api_error() {
        let error = NotionError::Api {
            status: 400,
            code: "validation_error".to_string(),
            message: "Could not find property with name or id: Sprint".to_string(),
        };
        let error_str = error.to_string();
        assert!(error_str.contains("400"));
        assert!(error_str.contains("validation_error"));
        assert!(error_str.contains("Sprint"));
        assert!(error.is_remote());
    }

    #[test]
    fn test_notion_error_decode_is_not_remote() {
        let error: NotionError = DecodeError::MissingProperty {
            page: "p1".to_string(),
            property: "Status".to_string(),
        }
        .into();
        assert!(!error.is_remote());
        assert!(error.to_string().contains("Status"));
    }
}
