//! Masonry engine lifecycle.
//!
//! The packing engine itself is external. [`MasonryArranger`] decides when
//! to construct it, when to re-arrange it in place, and when to tear it down,
//! following the grid's inputs (item collection + filter selector).
//!
//! Engine construction is asynchronous on the client: the arranger hands out
//! a [`MountTicket`] and only builds the engine if the ticket is still
//! current when the load completes.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Item;
use crate::selector::MATCH_ALL;

/// Transition used for both hide/show and reflow, as the engine takes it.
pub const TRANSITION_DURATION: &str = "0.8s";

/// Transition for arranging a freshly built engine.
pub const NO_TRANSITION: &str = "0s";

// ── Engine configuration ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpacityStyle {
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasonryLayout {
    pub column_width: String,
    pub gutter: u32,
    pub horizontal_order: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasonryOptions {
    pub item_selector: String,
    pub layout_mode: &'static str,
    pub masonry: MasonryLayout,
    pub transition_duration: String,
    /// Delay between successive item transitions, in milliseconds.
    pub stagger: u32,
    pub hidden_style: OpacityStyle,
    pub visible_style: OpacityStyle,
}

impl MasonryOptions {
    /// Options for a grid whose items match `item_selector` and whose column
    /// width is taken from `sizer_selector`.
    pub fn new(item_selector: &str, sizer_selector: &str, gutter: u32) -> Self {
        Self {
            item_selector: item_selector.to_string(),
            layout_mode: "masonry",
            masonry: MasonryLayout {
                column_width: sizer_selector.to_string(),
                gutter,
                horizontal_order: false,
            },
            transition_duration: TRANSITION_DURATION.to_string(),
            stagger: 0,
            hidden_style: OpacityStyle { opacity: 0.0 },
            visible_style: OpacityStyle { opacity: 1.0 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrangeOptions {
    pub filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_duration: Option<String>,
}

// ── Engine seam ─────────────────────────────────────────────────────

pub trait MasonryEngine {
    fn layout(&mut self);
    fn arrange(&mut self, options: &ArrangeOptions);
    fn destroy(&mut self);
}

pub trait EngineFactory {
    type Engine: MasonryEngine;

    fn create(&mut self, container: &str, options: &MasonryOptions) -> Self::Engine;
}

// ── Arranger ────────────────────────────────────────────────────────

/// Identifies one pending engine construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MountTicket(pub u64);

/// What the grid currently shows.
#[derive(Debug, Clone)]
pub struct GridInputs {
    pub items: Arc<[Item]>,
    pub selector: String,
}

pub struct MasonryArranger<F: EngineFactory> {
    factory: F,
    container: String,
    options: MasonryOptions,
    engine: Option<F::Engine>,
    inputs: Option<GridInputs>,
    generation: u64,
    pending: Option<MountTicket>,
    attached: bool,
}

impl<F: EngineFactory> MasonryArranger<F> {
    pub fn new(factory: F, container: &str, options: MasonryOptions) -> Self {
        Self {
            factory,
            container: container.to_string(),
            options,
            engine: None,
            inputs: None,
            generation: 0,
            pending: None,
            attached: false,
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    pub fn pending_ticket(&self) -> Option<MountTicket> {
        self.pending
    }

    /// Container mounted. Starts an engine load when there is something to lay out.
    pub fn on_attach(&mut self, inputs: GridInputs) -> Option<MountTicket> {
        if self.attached {
            return self.on_inputs_changed(inputs);
        }
        self.attached = true;
        self.inputs = Some(inputs);
        self.start_mount()
    }

    /// Async engine load finished. Returns false when the ticket went stale.
    pub fn on_engine_loaded(&mut self, ticket: MountTicket) -> bool {
        if !self.attached || self.pending != Some(ticket) {
            debug!(target: "folio::masonry", ticket = ticket.0, "engine load abandoned");
            return false;
        }
        self.pending = None;

        let mut engine = self.factory.create(&self.container, &self.options);
        if let Some(inputs) = &self.inputs {
            if inputs.selector != MATCH_ALL {
                engine.arrange(&ArrangeOptions {
                    filter: inputs.selector.clone(),
                    transition_duration: Some(NO_TRANSITION.to_string()),
                });
            }
        }
        self.engine = Some(engine);
        true
    }

    /// All images in the container settled. One corrective relayout.
    pub fn on_images_loaded(&mut self, ticket: MountTicket) -> bool {
        if !self.attached || ticket.0 != self.generation {
            return false;
        }
        match self.engine.as_mut() {
            Some(engine) => {
                engine.layout();
                true
            }
            None => false,
        }
    }

    /// New inputs. A different item collection rebuilds the engine; a
    /// different selector re-arranges the live one in place.
    pub fn on_inputs_changed(&mut self, next: GridInputs) -> Option<MountTicket> {
        let prev = self.inputs.replace(next);
        if !self.attached {
            return None;
        }
        let Some(next) = self.inputs.as_ref() else {
            return None;
        };

        let items_changed = prev
            .as_ref()
            .map(|p| !Arc::ptr_eq(&p.items, &next.items))
            .unwrap_or(true);

        if items_changed {
            self.destroy_engine();
            return self.start_mount();
        }

        let selector_changed = prev.map(|p| p.selector != next.selector).unwrap_or(true);
        if selector_changed {
            if let Some(engine) = self.engine.as_mut() {
                engine.arrange(&ArrangeOptions {
                    filter: next.selector.clone(),
                    transition_duration: Some(TRANSITION_DURATION.to_string()),
                });
            }
        }
        None
    }

    /// Container unmounted. Outstanding tickets become stale.
    pub fn on_detach(&mut self) {
        self.destroy_engine();
        self.attached = false;
        self.pending = None;
        self.generation += 1;
    }

    fn start_mount(&mut self) -> Option<MountTicket> {
        let has_items = self.inputs.as_ref().map(|i| !i.items.is_empty()).unwrap_or(false);
        if !has_items {
            self.pending = None;
            return None;
        }
        self.generation += 1;
        let ticket = MountTicket(self.generation);
        self.pending = Some(ticket);
        Some(ticket)
    }

    fn destroy_engine(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.destroy();
        }
    }
}

// ── Command engine ──────────────────────────────────────────────────

/// Engine operations shipped to the browser, which owns the real engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EngineCommand {
    Init { container: String, options: MasonryOptions },
    Layout { container: String },
    Arrange { container: String, options: ArrangeOptions },
    Destroy { container: String },
}

/// Engine that records its operations as [`EngineCommand`]s.
pub struct CommandEngine {
    container: String,
    tx: Sender<EngineCommand>,
}

impl MasonryEngine for CommandEngine {
    fn layout(&mut self) {
        self.send(EngineCommand::Layout { container: self.container.clone() });
    }

    fn arrange(&mut self, options: &ArrangeOptions) {
        self.send(EngineCommand::Arrange {
            container: self.container.clone(),
            options: options.clone(),
        });
    }

    fn destroy(&mut self) {
        self.send(EngineCommand::Destroy { container: self.container.clone() });
    }
}

impl CommandEngine {
    fn send(&self, command: EngineCommand) {
        // The outbox lives as long as the store; a closed channel means shutdown.
        let _ = self.tx.send(command);
    }
}

pub struct CommandFactory {
    tx: Sender<EngineCommand>,
}

/// Receiving side of the command channel.
pub struct CommandOutbox {
    rx: Receiver<EngineCommand>,
}

impl CommandOutbox {
    /// Take every command recorded since the last drain.
    pub fn drain(&self) -> Vec<EngineCommand> {
        self.rx.try_iter().collect()
    }
}

impl CommandFactory {
    pub fn channel() -> (Self, CommandOutbox) {
        let (tx, rx) = channel();
        (Self { tx }, CommandOutbox { rx })
    }
}

impl EngineFactory for CommandFactory {
    type Engine = CommandEngine;

    fn create(&mut self, container: &str, options: &MasonryOptions) -> CommandEngine {
        let _ = self.tx.send(EngineCommand::Init {
            container: container.to_string(),
            options: options.clone(),
        });
        CommandEngine { container: container.to_string(), tx: self.tx.clone() }
    }
}
