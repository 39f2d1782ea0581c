//! List envelope and cursor pagination
//!
//! A list endpoint returns one page at a time. [`ListPaginator`] turns that
//! into a lazy stream: each page is fetched only once the previous one has
//! been consumed, and the cursor for the next request is the id of the
//! boundary record of the page just read.

use super::object::ApiResource;
use crate::api::{Client, Error, FormParams, RequestOptions, Result};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

const STARTING_AFTER: &str = "starting_after";
const ENDING_BEFORE: &str = "ending_before";

/// One page of records, in server order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List<T> {
    pub object: String,
    pub data: Vec<T>,
    pub has_more: bool,
    #[serde(default)]
    pub url: String,
}

impl<T> List<T> {
    pub const OBJECT: &'static str = "list";

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Which cursor advances the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `starting_after` = last id of the previous page
    Forward,
    /// `ending_before` = first id of the previous page
    Backward,
}

/// Lazy, forward-only sequence over every page of a list
///
/// Nothing is fetched until the stream is polled. Each call to
/// [`stream`](Self::stream) starts over from the cursor the paginator was
/// built with.
pub struct ListPaginator<T> {
    client: Client,
    path: String,
    params: FormParams,
    options: RequestOptions,
    direction: Direction,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> Clone for ListPaginator<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path.clone(),
            params: self.params.clone(),
            options: self.options.clone(),
            direction: self.direction,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: ApiResource> ListPaginator<T> {
    pub fn new(
        client: Client,
        path: impl Into<String>,
        params: FormParams,
        options: RequestOptions,
    ) -> Self {
        // Paging backward only when the caller started from `ending_before`
        let backward =
            params.contains_key(ENDING_BEFORE) && !params.contains_key(STARTING_AFTER);
        let direction = if backward {
            Direction::Backward
        } else {
            Direction::Forward
        };

        Self {
            client,
            path: path.into(),
            params,
            options,
            direction,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Fetch the first page only
    pub async fn first_page(&self) -> Result<List<T>> {
        self.client
            .request_list(&self.path, self.params.clone(), &self.options)
            .await
    }

    /// Stream every record across pages; ends after the first error
    pub fn stream(&self) -> BoxStream<'static, Result<T>> {
        let state = PageState {
            paginator: self.clone(),
            buffer: VecDeque::new(),
            cursor: None,
            exhausted: false,
        };

        stream::try_unfold(state, |mut state| async move {
            loop {
                if let Some(item) = state.buffer.pop_front() {
                    return Ok::<_, Error>(Some((item, state)));
                }
                if state.exhausted {
                    return Ok(None);
                }
                state.fetch_next_page().await?;
            }
        })
        .boxed()
    }

    /// Drain at most `max` records
    pub async fn collect_up_to(&self, max: usize) -> Result<Vec<T>> {
        self.stream().take(max).try_collect().await
    }
}

struct PageState<T> {
    paginator: ListPaginator<T>,
    buffer: VecDeque<T>,
    cursor: Option<String>,
    exhausted: bool,
}

impl<T: ApiResource> PageState<T> {
    async fn fetch_next_page(&mut self) -> Result<()> {
        let paginator = &self.paginator;
        let mut params = paginator.params.clone();

        if let Some(cursor) = &self.cursor {
            match paginator.direction {
                Direction::Forward => params.set(STARTING_AFTER, cursor),
                Direction::Backward => params.set(ENDING_BEFORE, cursor),
            }
        }

        tracing::debug!(
            "Fetching page of {} (cursor: {:?})",
            T::OBJECT,
            self.cursor
        );

        let page: List<T> = paginator
            .client
            .request_list(&paginator.path, params, &paginator.options)
            .await?;

        let boundary = match paginator.direction {
            Direction::Forward => page.data.last(),
            Direction::Backward => page.data.first(),
        };
        self.cursor = boundary.map(|record| record.id().to_string());
        self.exhausted = !page.has_more || self.cursor.is_none();
        self.buffer.extend(page.data);

        Ok(())
    }
}
