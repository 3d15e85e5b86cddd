//! Async paging driver.
//!
//! Claims a page under the store lock, fetches with the lock released, then
//! applies the result under the lock again. A call made while another fetch
//! is in flight returns immediately without touching the network.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use folio_grid::pagination::Paginate;
use tracing::{debug, warn};

use crate::source::ContentSource;

pub struct Feed<S, T> {
    source: Arc<S>,
    store: Arc<Mutex<T>>,
}

impl<S, T> Clone for Feed<S, T> {
    fn clone(&self) -> Self {
        Self { source: Arc::clone(&self.source), store: Arc::clone(&self.store) }
    }
}

impl<S: ContentSource, T: Paginate> Feed<S, T> {
    pub fn new(source: Arc<S>, store: Arc<Mutex<T>>) -> Self {
        Self { source, store }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn store(&self) -> &Arc<Mutex<T>> {
        &self.store
    }

    /// Lock the store. A panic elsewhere must not wedge paging for good.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the next page. `None` when nothing was claimed.
    pub async fn load_more(&self) -> Option<T::Applied> {
        let request = self.lock().begin_load()?;
        debug!(target: "folio::feed", page = request.page, "load_more");

        let result = self.source.fetch_page(request).await.map_err(|err| {
            warn!(target: "folio::feed", page = request.page, error = %err, "page fetch failed");
            err.to_string()
        });

        Some(self.lock().finish_load(request, result))
    }
}
