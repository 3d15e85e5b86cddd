//! folio-grid — portfolio grid core
//!
//! Pure, synchronous state for a filterable masonry gallery: deterministic
//! layout hints, category filtering, page accumulation, the masonry engine
//! lifecycle and the click-to-expand controller, all owned by a single
//! [`Portfolio`] store and driven through [`reduce`].
//!
//! Paging is not an [`Action`]: fetching is async, so the driver claims a
//! page with [`Paginate::begin_load`] and hands the result back with
//! [`Paginate::finish_load`].

pub mod dom;
pub mod expand;
pub mod filter;
pub mod glyph;
pub mod layout;
pub mod masonry;
pub mod model;
pub mod morph;
pub mod pagination;
pub mod pointer;
pub mod selector;
pub mod state;
pub mod transition;

use std::time::Duration;

use folio_dom::DomNode;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use expand::{ClickOutcome, ExpandSide, ExpansionState, Rect};
pub use layout::{generate_layout, LayoutHint};
pub use masonry::{CommandFactory, CommandOutbox, EngineCommand, EngineFactory, MountTicket};
pub use model::{Category, Item, ItemId, Page};
pub use pagination::{Paginate, PageRequest, PaginatedAccumulator};
pub use pointer::{MouseFollow, Pointer};
pub use selector::sanitize;
pub use state::{Deferred, Portfolio, PortfolioConfig};

/// Supported actions.
///
/// Wire format: `{"action":"name","payload":{...}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum Action {
    /// Grid container mounted.
    Attach,
    /// Grid container unmounted.
    Detach,
    #[serde(rename = "filter")]
    SetFilter { category: Category },
    #[serde(rename = "click")]
    ItemClicked { id: ItemId, element: Rect, grid: Rect },
    #[serde(rename = "engine_ready")]
    EngineLoaded { ticket: MountTicket },
    ImagesLoaded { ticket: MountTicket },
    /// Pointer moved; client coordinates plus viewport size.
    Pointer { x: f64, y: f64, width: f64, height: f64 },
    /// Animation frame; `dt_ms` since the previous one.
    Tick { dt_ms: u64 },
}

impl Action {
    /// Build an action from an endpoint name and its JSON body.
    ///
    /// An empty body (`null` or `{}`) is treated as "no payload", which is
    /// what unit actions like `attach` expect.
    pub fn from_parts(name: &str, payload: serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut envelope = serde_json::Map::new();
        envelope.insert("action".into(), serde_json::Value::String(name.to_string()));
        let empty = match &payload {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if !empty {
            envelope.insert("payload".into(), payload);
        }
        serde_json::from_value(serde_json::Value::Object(envelope))
    }
}

/// Work the caller has to carry out after a reduce.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Go to a detail page (after the fade-out has run).
    Navigate { url: String },
    /// Open a link in a new browsing context.
    OpenExternal { url: String },
    /// Load the masonry engine, then report back with `engine_ready`.
    MountEngine { ticket: MountTicket },
}

impl Effect {
    pub fn mount(ticket: Option<MountTicket>) -> Option<Effect> {
        ticket.map(|ticket| Effect::MountEngine { ticket })
    }
}

pub fn detail_url(key: &str) -> String {
    format!("/project/{}", key)
}

/// Reducer: apply one action to the store.
pub fn reduce<F: EngineFactory>(state: &mut Portfolio<F>, action: Action) -> Vec<Effect> {
    match action {
        Action::Attach => Effect::mount(state.attach()).into_iter().collect(),
        Action::Detach => {
            state.detach();
            Vec::new()
        }
        Action::SetFilter { category } => {
            Effect::mount(state.set_active_category(category)).into_iter().collect()
        }
        Action::ItemClicked { id, element, grid } => match state.click(&id, element, grid) {
            Some(ClickOutcome::OpenExternal(url)) => vec![Effect::OpenExternal { url }],
            Some(_) => Vec::new(),
            None => {
                debug!(target: "folio::grid", id = %id, "click on unknown item");
                Vec::new()
            }
        },
        Action::EngineLoaded { ticket } => {
            state.engine_loaded(ticket);
            Vec::new()
        }
        Action::ImagesLoaded { ticket } => {
            state.images_loaded(ticket);
            Vec::new()
        }
        Action::Pointer { x, y, width, height } => {
            state.point_at(Pointer { x, y, width, height });
            Vec::new()
        }
        Action::Tick { dt_ms } => state
            .tick(Duration::from_millis(dt_ms))
            .into_iter()
            .map(|deferred| match deferred {
                Deferred::Navigate(key) => Effect::Navigate { url: detail_url(&key) },
            })
            .collect(),
    }
}

/// Render the current state as a DOM tree.
pub fn render<F: EngineFactory>(state: &Portfolio<F>) -> DomNode {
    dom::render_view(state)
}

/// Parse an action envelope and reduce it.
/// Input format: `{"action":"name","payload":{...}}`
pub fn process<F: EngineFactory>(
    state: &mut Portfolio<F>,
    input: &str,
) -> Result<Vec<Effect>, serde_json::Error> {
    let action: Action = serde_json::from_str(input)?;
    Ok(reduce(state, action))
}
