//! The list query controller.
//!
//! Owns the [`QueryState`] of one admin list view, builds requests from it,
//! hands them to a [`DataSource`] and turns responses into [`ResolvedPage`]s.
//!
//! A fetch is split in three so that overlapping requests can be modelled
//! without holding the controller across an await point:
//!
//! 1. [`ListQueryController::begin_fetch`] tags a request with a new sequence
//!    token and returns a detached [`PendingFetch`].
//! 2. [`PendingFetch::run`] performs the request.
//! 3. [`ListQueryController::apply`] installs the outcome, unless a newer
//!    request was issued in the meantime or the controller was torn down.
//!
//! [`ListQueryController::fetch_page`] runs all three back to back.

use std::collections::BTreeSet;
use std::sync::Arc;

use campusadmin_api::types::probe::{first_path, scalar_text};
use campusadmin_api::types::ListBody;
use campusadmin_api::{ListQuery, Query};

use crate::error::{ListError, StatusMessage};
use crate::page::{Pager, ResolvedPage};
use crate::pipeline::resolve;
use crate::profile::CollectionProfile;
use crate::source::{DataSource, ListRequest, SourceError};
use crate::state::{ItemsPerPage, ListView, QueryState};

/// Whether [`ListQueryController::apply`] installed an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Updated,
    /// A newer request was issued, or the controller was torn down.
    Discarded,
}

/// A request that has been issued but not yet performed.
pub struct PendingFetch<S> {
    token: u64,
    view: ListView,
    state: QueryState,
    request: ListRequest,
    source: Arc<S>,
}

impl<S: DataSource> PendingFetch<S> {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn request(&self) -> &ListRequest {
        &self.request
    }

    /// Performs the request. Does not touch the controller.
    pub async fn run(self) -> FetchOutcome {
        let result = self.source.fetch(&self.request).await;
        FetchOutcome {
            token: self.token,
            view: self.view,
            state: self.state,
            result,
        }
    }
}

/// A finished request, waiting to be applied.
pub struct FetchOutcome {
    token: u64,
    view: ListView,
    state: QueryState,
    result: Result<ListBody, SourceError>,
}

impl FetchOutcome {
    pub fn token(&self) -> u64 {
        self.token
    }
}

/// Filter / sort / pagination controller for one collection.
pub struct ListQueryController<S> {
    source: Arc<S>,
    profile: CollectionProfile,
    state: QueryState,
    view: ListView,
    selection: BTreeSet<String>,
    current: Option<ResolvedPage>,
    /// Collection size reported by the last applied response.
    last_known_total: Option<u64>,
    /// Token of the most recently issued request.
    issued: u64,
    torn_down: bool,
    status: Option<StatusMessage>,
}

impl<S: DataSource> ListQueryController<S> {
    pub fn new(source: S, profile: CollectionProfile) -> Self {
        Self::with_shared_source(Arc::new(source), profile)
    }

    /// Builds a controller on a source shared with other views.
    pub fn with_shared_source(source: Arc<S>, profile: CollectionProfile) -> Self {
        let state = profile.initial_state();
        Self {
            source,
            profile,
            state,
            view: ListView::Active,
            selection: BTreeSet::new(),
            current: None,
            last_known_total: None,
            issued: 0,
            torn_down: false,
            status: None,
        }
    }

    pub fn profile(&self) -> &CollectionProfile {
        &self.profile
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn view(&self) -> ListView {
        self.view
    }

    /// The page to render, if any fetch has completed for this view.
    pub fn current_page(&self) -> Option<&ResolvedPage> {
        self.current.as_ref()
    }

    /// Status line for the UI: a warning, an error or a blocking message.
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn last_known_total(&self) -> Option<u64> {
        self.last_known_total
    }

    pub fn pager(&self) -> Pager {
        match &self.current {
            Some(page) => Pager::new(self.state.page(), page.total_pages),
            None => Pager::disabled(),
        }
    }

    #[doc(alias = "on_filter_change")]
    pub fn set_filter(&mut self, key: &str, value: &str) {
        self.state.set_filter(key, value);
    }

    #[doc(alias = "on_search_change")]
    pub fn set_search(&mut self, value: &str) {
        self.state.set_search(value);
    }

    #[doc(alias = "on_sort_change")]
    pub fn set_sort(&mut self, key: &str) {
        self.state.set_sort(key);
    }

    #[doc(alias = "on_items_per_page_change")]
    pub fn set_items_per_page(&mut self, value: ItemsPerPage) {
        self.state.set_items_per_page(value);
    }

    /// Moves to page `n`. Out-of-range pages are ignored: page 0 always,
    /// and anything past the resolved page count once a page is showing.
    #[doc(alias = "on_page_change")]
    pub fn set_page(&mut self, n: u64) -> bool {
        if n == 0 {
            return false;
        }
        if let Some(page) = &self.current {
            if n > page.total_pages {
                return false;
            }
        }
        self.state.set_page(n);
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.pager().can_previous {
            return false;
        }
        self.set_page(self.state.page() - 1)
    }

    pub fn next_page(&mut self) -> bool {
        if !self.pager().can_next {
            return false;
        }
        self.set_page(self.state.page() + 1)
    }

    /// Switches between the active and deleted item sets. Always returns to
    /// page 1, drops the selection and the shown page, and invalidates any
    /// request still in flight. Filters, search and sort carry over.
    pub fn switch_view(&mut self, view: ListView) {
        self.view = view;
        self.state.reset_page();
        self.selection.clear();
        self.current = None;
        self.status = None;
        self.issued += 1;
    }

    pub fn toggle_selection(&mut self, id: &str) {
        if !self.selection.remove(id) {
            self.selection.insert(id.to_string());
        }
    }

    /// Selects every item on the shown page that has an id.
    pub fn select_page(&mut self) {
        let ids: Vec<String> = match &self.current {
            Some(page) => page
                .items
                .iter()
                .filter_map(|item| first_path(item, &self.profile.id_fields))
                .map(scalar_text)
                .collect(),
            None => Vec::new(),
        };
        self.selection.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selection
    }

    /// Stops accepting results. Anything still in flight is dropped on arrival.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.issued += 1;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// The request the current state maps to.
    ///
    /// With "all" selected the limit is the collection size reported by the
    /// previous response, so the first "all" request can fall one round trip
    /// short. Before any total is known the profile's page size is used.
    pub fn build_request(&self) -> ListRequest {
        let (path, view_params) = self.profile.view_target(self.view);
        let limit = match self.state.items_per_page() {
            ItemsPerPage::Count(n) => n,
            ItemsPerPage::All => self
                .last_known_total
                .filter(|total| *total > 0)
                .unwrap_or(self.profile.items_per_page),
        };

        let mut query = ListQuery::default()
            .with_page(self.state.page())
            .with_limit(limit);
        let search = self.state.search_term().trim();
        if !search.is_empty() {
            query = query.with_search(search);
        }
        for (key, value) in self.state.active_filters() {
            query = query.with_filter(key, value);
        }
        query = query.with_filters(&view_params);

        ListRequest { path, query }
    }

    /// Issues a request for the current state and returns it detached.
    pub fn begin_fetch(&mut self) -> PendingFetch<S> {
        self.issued += 1;
        let request = self.build_request();
        tracing::debug!(
            "{} fetch #{} page={} limit={:?}",
            self.profile.name,
            self.issued,
            request.query.common.page,
            request.query.common.limit
        );
        PendingFetch {
            token: self.issued,
            view: self.view,
            state: self.state.clone(),
            request,
            source: Arc::clone(&self.source),
        }
    }

    /// Installs a finished request.
    ///
    /// Stale outcomes are discarded without touching anything. A failed
    /// fetch keeps the previous page, records the status and returns the
    /// error. A body without a recognizable collection installs an empty
    /// page and records a warning.
    pub fn apply(&mut self, outcome: FetchOutcome) -> Result<Applied, ListError> {
        if self.torn_down || outcome.token != self.issued || outcome.view != self.view {
            tracing::debug!(
                "{} discarding stale fetch #{} (latest #{})",
                self.profile.name,
                outcome.token,
                self.issued
            );
            return Ok(Applied::Discarded);
        }

        let body = match outcome.result {
            Ok(body) => body,
            Err(err) => {
                let err = list_error(err);
                self.status = Some(err.status());
                return Err(err);
            }
        };

        let resolution = resolve(&body, &outcome.state, &self.profile);
        let page = resolution.page;

        if let Some(message) = resolution.malformed {
            tracing::warn!("{}: {}", self.profile.name, message);
            self.status = Some(ListError::MalformedResponse { message }.status());
        } else {
            self.status = None;
            self.last_known_total = Some(resolution.known_total);
        }

        if page.using_server_pagination {
            tracing::debug!(
                "{} server pagination: page {}/{} of {}",
                self.profile.name,
                page.page,
                page.total_pages,
                page.display_total
            );
            if let (Some(server_page), Some(limit)) = (resolution.meta.page, resolution.meta.limit)
            {
                self.state.snap_to_server(server_page, limit);
            }
        }

        self.current = Some(page);
        Ok(Applied::Updated)
    }

    /// Issues, performs and applies a request for the current state.
    pub async fn fetch_page(&mut self) -> Result<Option<&ResolvedPage>, ListError> {
        let pending = self.begin_fetch();
        let outcome = pending.run().await;
        match self.apply(outcome)? {
            Applied::Updated => Ok(self.current.as_ref()),
            Applied::Discarded => Ok(None),
        }
    }
}

fn list_error(err: SourceError) -> ListError {
    match err {
        SourceError::AuthRequired(message) => ListError::AuthRequired { message },
        SourceError::Api(campusadmin_api::Error::Unauthorized { status }) => {
            ListError::AuthRequired {
                message: format!("credential rejected (HTTP {})", status),
            }
        }
        SourceError::Api(e) => ListError::FetchFailed {
            message: e.to_string(),
        },
    }
}
