// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::{debug, error, info, warn};
use url::Url;

use crate::fasta::{FastaDownload, SequenceTarget};
use crate::query::{query_sequence_url, SequenceQuery};
use crate::view::{HitRow, HitsView, FAILURE_MESSAGE};
use http_client::{BaseApiClient, HttpError};
use shared_types::search::{QueryResult, SearchResult};

/// Lifecycle of the page: `Idle -> Requesting -> {Rendered | Failed}`.
///
/// `Rendered` is re-entered by dispatching another search. `Failed` is
/// terminal, since the table it would render into no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Idle,
    Requesting,
    Rendered,
    Failed,
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("the hits table was replaced after an earlier failure")]
    TableGone,
    #[error("a search is already in flight")]
    AlreadyRequesting,
    #[error("no search is in flight")]
    NotRequesting,
    #[error("search request failed: {0}")]
    Request(#[from] HttpError),
    #[error("search response contained no results")]
    NoResults,
}

/// A dispatched search, between [`HitsPage::begin_request`] and
/// [`HitsPage::finish_request`].
///
/// Sending is kept apart from the page so callers sharing the page through a
/// `RefCell` need not hold a borrow across the network call.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    url: Url,
    query: SequenceQuery,
}

impl PendingRequest {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn query(&self) -> &SequenceQuery {
        &self.query
    }

    pub async fn send(&self, client: &BaseApiClient) -> Result<SearchResult, HttpError> {
        client
            .form_json_post(self.url.as_str(), &self.query.form_fields())
            .await
    }
}

/// Page controller. Owns the view and the last successful search result.
#[derive(Debug)]
pub struct HitsPage<V> {
    search_url: Url,
    view: V,
    state: PageState,
    pending_search: Option<QueryResult>,
}

impl<V: HitsView> HitsPage<V> {
    pub fn new(api_base: &Url, view: V) -> Result<Self, url::ParseError> {
        Ok(Self {
            search_url: query_sequence_url(api_base)?,
            view,
            state: PageState::Idle,
            pending_search: None,
        })
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// The first query result of the last successful search.
    pub fn pending_search(&self) -> Option<&QueryResult> {
        self.pending_search.as_ref()
    }

    /// Downloads become available with the first successful render.
    pub fn downloads_available(&self) -> bool {
        self.pending_search.is_some()
    }

    /// Clears rendered hits and moves to `Requesting`.
    pub fn begin_request(&mut self, query: SequenceQuery) -> Result<PendingRequest, PageError> {
        match self.state {
            PageState::Failed => return Err(PageError::TableGone),
            PageState::Requesting => return Err(PageError::AlreadyRequesting),
            PageState::Idle | PageState::Rendered => {}
        }

        self.view.clear_rows();
        self.state = PageState::Requesting;
        info!("searching {}", self.search_url);

        Ok(PendingRequest {
            url: self.search_url.clone(),
            query,
        })
    }

    /// Renders the outcome of the request started by [`Self::begin_request`].
    /// Returns the number of rendered rows.
    ///
    /// Any failure (including a response with no results) replaces the table
    /// with [`FAILURE_MESSAGE`] and leaves the page `Failed`.
    pub fn finish_request(
        &mut self,
        outcome: Result<SearchResult, HttpError>,
    ) -> Result<usize, PageError> {
        if self.state != PageState::Requesting {
            return Err(PageError::NotRequesting);
        }

        let first = outcome
            .map_err(PageError::from)
            .and_then(|response| response.into_first().ok_or(PageError::NoResults));
        match first {
            Ok(result) => Ok(self.render(result)),
            Err(err) => {
                error!("failed to load hits: {err}");
                self.view.replace_table(FAILURE_MESSAGE);
                self.state = PageState::Failed;
                Err(err)
            }
        }
    }

    /// Dispatches `query`, waits for the response and renders it.
    pub async fn search(
        &mut self,
        client: &BaseApiClient,
        query: SequenceQuery,
    ) -> Result<usize, PageError> {
        let request = self.begin_request(query)?;
        let outcome = request.send(client).await;
        self.finish_request(outcome)
    }

    fn render(&mut self, result: QueryResult) -> usize {
        debug!("search result: {result:?}");
        let rows = HitRow::from_hits(&result.hits);
        self.pending_search = Some(result);

        self.view.clear_rows();
        self.view.append_rows(&rows);
        self.view.enable_downloads();
        self.state = PageState::Rendered;

        info!("rendered {} hits", rows.len());
        rows.len()
    }

    /// Builds the FASTA download for `target` from the pending search.
    ///
    /// Before any successful search there is nothing to download: this is a
    /// no-op returning `None`.
    pub fn download(&self, target: SequenceTarget) -> Option<FastaDownload> {
        match &self.pending_search {
            Some(result) => Some(FastaDownload::new(&result.hits, target)),
            None => {
                warn!("ignoring {target} download: no search has completed yet");
                None
            }
        }
    }
}
