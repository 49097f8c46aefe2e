//! The in-memory post list and its cursor-following append semantics

use url::Url;

use crate::cms::{self, CmsClient, QueryResponse};

use super::PostSummary;

/// An ordered list of post summaries plus the cursor to the next page.
///
/// Loading more never reorders or removes existing items, and does not
/// deduplicate; the cursor is replaced by each consumed response and
/// its absence terminates further loads.
#[derive(Debug, Clone, Default)]
pub struct PostList {
    pub results: Vec<PostSummary>,
    pub next_page: Option<Url>,
}

impl PostList {
    /// Build the initial list from the first response page
    pub fn from_response(response: &QueryResponse) -> Self {
        let mut list = Self::default();
        list.extend_from(response);
        list
    }

    /// Append a page of results after the existing items and take over
    /// the response's cursor
    pub fn extend_from(&mut self, response: &QueryResponse) {
        self.results
            .extend(response.results.iter().map(PostSummary::from_document));
        self.next_page = response.next_page.clone();
    }

    /// Whether a further page exists
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Fetch the page at the current cursor and append it.
    ///
    /// Returns `Ok(false)` when no cursor remains. On a failed fetch the
    /// error is surfaced and the list and cursor are left untouched, so
    /// the caller may retry or report it.
    pub async fn load_more(&mut self, client: &CmsClient) -> cms::Result<bool> {
        let Some(next) = self.next_page.clone() else {
            return Ok(false);
        };
        let response = client.fetch_page(&next).await?;
        self.extend_from(&response);
        Ok(true)
    }
}
