use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use folio_cms::{ContentSource, Feed};
use folio_dom::Snapshot;
use folio_grid::{Action, EngineCommand, PaginatedAccumulator, PortfolioConfig};
use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::pages;
use crate::session::{Sessions, SESSION_HEADER};

/// Paging is not a reducer action; it goes through the feed.
const LOAD_MORE: &str = "load_more";

/// Browser shell, embedded at compile time.
const CLIENT_JS: &str = include_str!("../assets/folio.js");

// ── Shared state ────────────────────────────────────────────────────

/// The project catalog is shared by every view; the rest of the grid state
/// is per view, in [`Sessions`].
pub struct AppState<S> {
    pub feed: Feed<S, PaginatedAccumulator>,
    pub sessions: Sessions,
}

impl<S: ContentSource> AppState<S> {
    pub fn new(source: Arc<S>, config: PortfolioConfig, idle: Duration) -> Self {
        let catalog = Arc::new(Mutex::new(PaginatedAccumulator::new(config.page_size)));
        Self {
            feed: Feed::new(source, catalog),
            sessions: Sessions::new(config, idle),
        }
    }

    /// Copy of the catalog. Items are behind an `Arc`, so this is cheap.
    pub fn catalog(&self) -> PaginatedAccumulator {
        self.feed.lock().clone()
    }

    fn session(&self, headers: &HeaderMap, query: &SessionQuery) -> String {
        let requested = headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .or(query.session.as_deref());
        self.sessions.resolve(requested, &self.catalog())
    }
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router<S: ContentSource + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(homepage::<S>))
        .route("/health", get(health))
        .route(pages::CLIENT_JS_PATH, get(client_js))
        .route("/api/snapshot", get(snapshot::<S>))
        .route(pages::SSE_PATH, get(sse::<S>))
        .route("/actions/:name", post(action::<S>))
        .route("/project/:document_id", get(project::<S>))
        .with_state(state)
}

// ── Request and response types ──────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct SessionQuery {
    session: Option<String>,
}

#[derive(Serialize)]
struct SnapshotResponse {
    #[serde(flatten)]
    snapshot: Snapshot,
    commands: Vec<EngineCommand>,
}

// ── Handlers ────────────────────────────────────────────────────────

async fn health() -> &'static str {
    "ok"
}

async fn client_js() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        CLIENT_JS,
    )
}

async fn homepage<S: ContentSource>(State(state): State<Arc<AppState<S>>>) -> Html<String> {
    let about = match state.feed.source().fetch_about().await {
        Ok(blocks) => blocks,
        Err(e) => {
            warn!(target: "folio::server", error = %e, "about section unavailable");
            Vec::new()
        }
    };
    let catalog = state.catalog();
    let id = state.sessions.open(&catalog);
    let grid = state.sessions.with(&id, &catalog, |s| s.snapshot()).root;
    debug!(target: "folio::server", session = %id, "page view");
    Html(pages::home(&about, grid, &id))
}

async fn snapshot<S: ContentSource>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<SessionQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let id = state.session(&headers, &query);
    let body = state.sessions.with(&id, &state.catalog(), |s| SnapshotResponse {
        snapshot: s.snapshot(),
        commands: s.drain_commands(),
    });
    ([(SESSION_HEADER, id)], Json(body))
}

async fn sse<S: ContentSource>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<SessionQuery>,
    headers: HeaderMap,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let id = state.session(&headers, &query);
    let (rx, first) = state.sessions.with(&id, &state.catalog(), |s| {
        let rx = s.subscribe();
        let first = serde_json::to_string(&s.update(Vec::new())).unwrap_or_default();
        (rx, first)
    });
    info!(
        target: "folio::server",
        session = %id,
        views = state.sessions.len(),
        "SSE client connected"
    );

    let initial = stream::once(async move { Ok(Event::default().event("message").data(first)) });
    let updates = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(json) => return Some((Ok(Event::default().event("message").data(json)), rx)),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(target: "folio::server", skipped, "SSE client lagging");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(initial.chain(updates)).keep_alive(KeepAlive::default())
}

async fn action<S: ContentSource>(
    State(state): State<Arc<AppState<S>>>,
    Path(name): Path<String>,
    Query(query): Query<SessionQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let payload = parse_payload(&body)?;
    let id = state.session(&headers, &query);
    debug!(target: "folio::server", action = %name, session = %id, "action");

    let update = if name == LOAD_MORE {
        let applied = state.feed.load_more().await.is_some();
        let catalog = state.catalog();
        if applied {
            state.sessions.broadcast_catalog(&catalog, &id);
        }
        // the requesting view picks up the new catalog while being synced
        state.sessions.with(&id, &catalog, |s| s.update(Vec::new()))
    } else {
        let action = Action::from_parts(&name, payload)
            .map_err(|e| AppError::BadRequest(format!("{}: {}", name, e)))?;
        state.sessions.with(&id, &state.catalog(), |s| {
            let effects = s.reduce(action);
            s.update(effects)
        })
    };

    Ok(([(SESSION_HEADER, id)], Json(update)).into_response())
}

async fn project<S: ContentSource>(
    State(state): State<Arc<AppState<S>>>,
    Path(document_id): Path<String>,
) -> Result<Response, AppError> {
    match state.feed.source().fetch_detail(&document_id).await? {
        Some(detail) => Ok(Html(pages::detail(&detail)).into_response()),
        None => {
            info!(target: "folio::server", document_id, "project not found");
            Ok((StatusCode::NOT_FOUND, Html(pages::not_found())).into_response())
        }
    }
}

/// Action bodies may be the bare payload or a full `{"action","payload"}`
/// envelope. An empty body means no payload.
fn parse_payload(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {}", e)))?;
    Ok(match value {
        Value::Object(mut map) if map.contains_key("payload") => {
            map.remove("payload").unwrap_or(Value::Null)
        }
        other => other,
    })
}
