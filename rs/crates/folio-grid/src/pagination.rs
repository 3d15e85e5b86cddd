//! Sequential page accumulation.
//!
//! The accumulator is a plain state machine; the async driver claims a
//! request with [`PaginatedAccumulator::begin_load`], performs the fetch
//! without holding any lock, and hands the result back through
//! [`PaginatedAccumulator::finish_load`]. At most one request is in flight.

use std::sync::Arc;

use tracing::debug;

use crate::model::{Item, Page};

pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// A claimed page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

/// Anything that hands out page claims and absorbs their results.
///
/// Implemented by the bare accumulator and by stores that own one, so an
/// async driver can page either.
pub trait Paginate {
    /// What applying a page yields to the caller.
    type Applied;

    fn begin_load(&mut self) -> Option<PageRequest>;
    fn finish_load(&mut self, request: PageRequest, result: Result<Page, String>) -> Self::Applied;
}

#[derive(Debug, Clone)]
pub struct PaginatedAccumulator {
    items: Arc<[Item]>,
    next_page: u32,
    page_size: u32,
    in_flight: Option<PageRequest>,
    has_more: bool,
    error: Option<String>,
}

impl Default for PaginatedAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginatedAccumulator {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Arc::from(Vec::new()),
            next_page: 1,
            page_size: page_size.max(1),
            in_flight: None,
            has_more: true,
            error: None,
        }
    }

    /// Claim the next page. `None` while a fetch is in flight or when the
    /// listing is exhausted or has failed.
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() || !self.has_more {
            debug!(
                target: "folio::feed",
                in_flight = self.in_flight.is_some(),
                has_more = self.has_more,
                "load_more ignored"
            );
            return None;
        }
        let request = PageRequest { page: self.next_page, page_size: self.page_size };
        self.in_flight = Some(request);
        Some(request)
    }

    /// Apply the outcome of a claimed fetch. Returns false when `request` is
    /// not the one in flight.
    pub fn finish_load(&mut self, request: PageRequest, result: Result<Page, String>) -> bool {
        if self.in_flight != Some(request) {
            debug!(target: "folio::feed", page = request.page, "stale page result dropped");
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                if !page.items.is_empty() {
                    self.items = self.items.iter().cloned().chain(page.items).collect();
                }
                self.next_page = request.page + 1;
                self.has_more = page.page_count > request.page;
                self.error = None;
            }
            Err(e) => {
                self.error = Some(e);
                self.has_more = false;
            }
        }
        true
    }

    pub fn items(&self) -> &Arc<[Item]> {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

impl Paginate for PaginatedAccumulator {
    type Applied = bool;

    fn begin_load(&mut self) -> Option<PageRequest> {
        PaginatedAccumulator::begin_load(self)
    }

    fn finish_load(&mut self, request: PageRequest, result: Result<Page, String>) -> bool {
        PaginatedAccumulator::finish_load(self, request, result)
    }
}
