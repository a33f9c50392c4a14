//! Lazy traversal of paginated GitHub collections.
//!
//! A [`Paginator`] walks one collection endpoint page by page through the
//! rate-limited client, fetching the next page only once the buffered items
//! of the current page have been consumed. The sequence is finite and
//! non-restartable: once the server stops advertising a next page, or a
//! fetch fails, the paginator stays exhausted.

use std::collections::VecDeque;

use serde::de::DeserializeOwned;

use super::client::{RateLimitedClient, decode_body};
use super::error::TriageError;
use super::gateway::{ApiRequest, Transport};

/// Largest page size GitHub accepts.
pub const MAX_PER_PAGE: u8 = 100;

/// Page size used unless configured otherwise.
pub const DEFAULT_PER_PAGE: u8 = MAX_PER_PAGE;

/// Lazy, finite sequence of items from one collection endpoint.
///
/// # Example
///
/// ```ignore
/// let mut files = Paginator::<_, ApiChangedFile>::new(&client, request, 100)?;
/// while let Some(file) = files.next().await? {
///     println!("{}", file.filename);
/// }
/// ```
pub struct Paginator<'client, T, Item>
where
    T: Transport,
{
    client: &'client RateLimitedClient<T>,
    request: ApiRequest,
    per_page: u8,
    next_page: Option<u32>,
    buffer: VecDeque<Item>,
}

impl<'client, T, Item> Paginator<'client, T, Item>
where
    T: Transport,
    Item: DeserializeOwned,
{
    /// Creates a paginator starting at page 1.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::InvalidPagination`] unless `per_page` is
    /// within `1..=100`.
    pub fn new(
        client: &'client RateLimitedClient<T>,
        request: ApiRequest,
        per_page: u8,
    ) -> Result<Self, TriageError> {
        if per_page == 0 {
            return Err(TriageError::InvalidPagination {
                message: "per_page must be at least 1".to_owned(),
            });
        }

        if per_page > MAX_PER_PAGE {
            return Err(TriageError::InvalidPagination {
                message: format!("per_page must not exceed {MAX_PER_PAGE}"),
            });
        }

        Ok(Self {
            client,
            request,
            per_page,
            next_page: Some(1),
            buffer: VecDeque::new(),
        })
    }

    /// Returns the next item, fetching another page when the buffer is empty.
    ///
    /// # Errors
    ///
    /// Returns the client's error for a failed page fetch, or
    /// [`TriageError::Api`] when a page body is not a JSON array of items.
    /// The paginator is exhausted afterwards.
    pub async fn next(&mut self) -> Result<Option<Item>, TriageError> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }

            let Some(page) = self.next_page.take() else {
                return Ok(None);
            };

            let request = self.request.for_page(self.per_page, page);
            let response = self.client.execute(&request).await?;
            let items: Vec<Item> = decode_body(&request, &response.body)?;

            if response.has_next_page && !items.is_empty() {
                self.next_page = page.checked_add(1);
            }
            self.buffer.extend(items);
        }
    }

    /// Drains the remaining items into a vector.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`Self::next`].
    pub async fn try_collect(mut self) -> Result<Vec<Item>, TriageError> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }
}
