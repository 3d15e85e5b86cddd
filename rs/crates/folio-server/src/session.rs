//! Per-page-view grid state.
//!
//! Every homepage render opens a session with its own [`Portfolio`]: filter,
//! expansion, engine lifecycle, hero animation and fade. The catalog of
//! loaded projects is shared and pushed into sessions with
//! [`Session::sync`].

use std::collections::HashMap;
use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use folio_dom::Snapshot;
use folio_grid::{reduce, render, Action, CommandFactory, CommandOutbox, Effect, EngineCommand};
use folio_grid::{PaginatedAccumulator, Portfolio, PortfolioConfig};
use rand::Rng;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub type Store = Portfolio<CommandFactory>;

pub const SESSION_HEADER: &str = "x-folio-session";
pub const DEFAULT_IDLE: Duration = Duration::from_secs(30 * 60);

/// Updates buffered per SSE client before it starts lagging.
const UPDATE_BUFFER: usize = 64;
const ID_LEN: usize = 24;

/// Generate a session id: 24 lowercase alphanumerics.
pub fn generate_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

fn is_valid_id(id: &str) -> bool {
    (8..=64).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// What a view needs after something changed: the new tree, engine commands
/// to run and effects to carry out.
#[derive(Debug, Serialize)]
pub struct Update {
    pub snapshot: Snapshot,
    pub commands: Vec<EngineCommand>,
    pub effects: Vec<Effect>,
}

pub struct Session {
    store: Store,
    outbox: CommandOutbox,
    updates: broadcast::Sender<String>,
    pending: Vec<Effect>,
    last_seen: Instant,
}

impl Session {
    fn new(config: PortfolioConfig, catalog: &PaginatedAccumulator) -> Self {
        let (factory, outbox) = CommandFactory::channel();
        let mut store = Portfolio::new(factory, config);
        store.sync_catalog(catalog);
        let (updates, _) = broadcast::channel(UPDATE_BUFFER);
        Self { store, outbox, updates, pending: Vec::new(), last_seen: Instant::now() }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { root: render(&self.store) }
    }

    pub fn reduce(&mut self, action: Action) -> Vec<Effect> {
        reduce(&mut self.store, action)
    }

    pub fn sync(&mut self, catalog: &PaginatedAccumulator) -> Vec<Effect> {
        Effect::mount(self.store.sync_catalog(catalog)).into_iter().collect()
    }

    pub fn drain_commands(&self) -> Vec<EngineCommand> {
        self.outbox.drain()
    }

    /// Collect everything the view has not seen yet, `effects` last.
    pub fn update(&mut self, effects: Vec<Effect>) -> Update {
        let mut all = mem::take(&mut self.pending);
        all.extend(effects);
        Update { snapshot: self.snapshot(), commands: self.drain_commands(), effects: all }
    }

    /// Send an update to the view's SSE stream. Without a listener the
    /// effects wait for the next update instead.
    pub fn push(&mut self, effects: Vec<Effect>) {
        if self.updates.receiver_count() == 0 {
            self.pending.extend(effects);
            return;
        }
        let update = self.update(effects);
        match serde_json::to_string(&update) {
            Ok(json) => {
                let _ = self.updates.send(json);
            }
            Err(e) => warn!(target: "folio::server", error = %e, "update serialization failed"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.updates.subscribe()
    }

    fn is_idle(&self, idle: Duration) -> bool {
        self.last_seen.elapsed() >= idle && self.updates.receiver_count() == 0
    }
}

pub struct Sessions {
    config: PortfolioConfig,
    idle: Duration,
    map: Mutex<HashMap<String, Session>>,
}

impl Sessions {
    pub fn new(config: PortfolioConfig, idle: Duration) -> Self {
        Self { config, idle, map: Mutex::new(HashMap::new()) }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.map.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Start a fresh view and return its id.
    pub fn open(&self, catalog: &PaginatedAccumulator) -> String {
        let id = generate_id();
        self.insert(id.clone(), catalog);
        id
    }

    /// Resolve a client-supplied id. Unknown but well-formed ids (say, after
    /// eviction or a restart) get a fresh session under the same id; anything
    /// else gets a new id.
    pub fn resolve(&self, requested: Option<&str>, catalog: &PaginatedAccumulator) -> String {
        match requested {
            Some(id) if is_valid_id(id) => {
                if !self.lock().contains_key(id) {
                    debug!(target: "folio::server", session = id, "recreating session");
                    self.insert(id.to_string(), catalog);
                }
                id.to_string()
            }
            _ => self.open(catalog),
        }
    }

    fn insert(&self, id: String, catalog: &PaginatedAccumulator) {
        let mut map = self.lock();
        let before = map.len();
        map.retain(|_, s| !s.is_idle(self.idle));
        if map.len() < before {
            info!(target: "folio::server", evicted = before - map.len(), "idle sessions dropped");
        }
        map.insert(id, Session::new(self.config.clone(), catalog));
    }

    /// Run `f` on a session, creating it first if needed. The session is
    /// synced to `catalog` before `f` sees it.
    pub fn with<R>(
        &self,
        id: &str,
        catalog: &PaginatedAccumulator,
        f: impl FnOnce(&mut Session) -> R,
    ) -> R {
        let mut map = self.lock();
        let session = map
            .entry(id.to_string())
            .or_insert_with(|| Session::new(self.config.clone(), catalog));
        session.last_seen = Instant::now();
        let synced = session.sync(catalog);
        session.pending.extend(synced);
        f(session)
    }

    /// Push a changed catalog to every session except `origin`, which gets
    /// its update in the response.
    pub fn broadcast_catalog(&self, catalog: &PaginatedAccumulator, origin: &str) {
        let mut map = self.lock();
        for (id, session) in map.iter_mut().filter(|(id, _)| id.as_str() != origin) {
            let effects = session.sync(catalog);
            debug!(target: "folio::server", session = %id, "catalog update");
            session.push(effects);
        }
    }
}
