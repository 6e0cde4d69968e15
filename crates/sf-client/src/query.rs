//! Query results and cursor-following pagination.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, ErrorKind, Result};

/// Result of a SOQL query (one page, or several pages merged).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QueryResult<T> {
    /// Total number of records matching the query.
    #[serde(rename = "totalSize", alias = "size")]
    pub total_size: u64,

    /// Whether all records are returned (no more pages).
    pub done: bool,

    /// Continuation cursor: `nextRecordsUrl` for REST, the query locator for SOAP.
    #[serde(
        rename = "nextRecordsUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_records_url: Option<String>,

    /// The records.
    pub records: Vec<T>,
}

impl<T> QueryResult<T> {
    /// The continuation cursor, if the server sent one.
    pub fn cursor(&self) -> Option<&str> {
        self.next_records_url.as_deref()
    }

    /// Merge the next page into this one.
    ///
    /// `done` and the cursor come from `next`, sizes are summed and records
    /// appended in arrival order.
    pub fn absorb(&mut self, next: QueryResult<T>) {
        self.done = next.done;
        self.total_size += next.total_size;
        self.records.extend(next.records);
        self.next_records_url = next.next_records_url;
    }
}

/// Follow continuation cursors until a page reports `done`.
///
/// Pages are fetched one at a time with `fetch(cursor)`. With a
/// `page_limit` of `Some(n)`, at most `n` pages (the first one included)
/// are read before failing with [`ErrorKind::PageLimitExceeded`].
pub async fn follow_cursor<T, F, Fut>(
    first: QueryResult<T>,
    page_limit: Option<usize>,
    mut fetch: F,
) -> Result<QueryResult<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<QueryResult<T>>>,
{
    let mut result = first;
    let mut pages = 1usize;

    while !result.done {
        let cursor = result.next_records_url.clone().ok_or_else(|| {
            Error::new(ErrorKind::InvalidResponse(
                "page is not done but carries no continuation cursor".to_string(),
            ))
        })?;

        if let Some(limit) = page_limit {
            if pages >= limit {
                return Err(Error::new(ErrorKind::PageLimitExceeded { limit }));
            }
        }

        debug!(pages, records = result.records.len(), "Fetching next query page");
        let next = fetch(cursor).await?;
        result.absorb(next);
        pages += 1;
    }

    Ok(result)
}
