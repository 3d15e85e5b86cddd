//! Portfolio store.
//!
//! One [`Portfolio`] is the state of one page view: active filter, expanded
//! item, engine lifecycle, hero animation and page fade. The project
//! catalog it shows can be owned elsewhere and shared between views; see
//! [`Portfolio::sync_catalog`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::expand::{ClickOutcome, ExpandableItemController, Rect};
use crate::filter::FilterState;
use crate::glyph::GlyphType;
use crate::masonry::{EngineFactory, GridInputs, MasonryArranger, MasonryOptions, MountTicket};
use crate::model::{Category, Item, ItemId, Page};
use crate::morph::{MorphText, TextMorph};
use crate::pointer::{MouseFollow, Pointer};
use crate::pagination::{Paginate, PageRequest, PaginatedAccumulator, DEFAULT_PAGE_SIZE};
use crate::transition::FadeTransition;

pub const GRID_CONTAINER: &str = "#project-grid";
pub const GRID_ITEM_SELECTOR: &str = ".grid-item";
pub const GRID_SIZER_SELECTOR: &str = ".grid-sizer";

/// Something the store wants done outside itself once a fade has run.
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    Navigate(String),
}

#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    pub page_size: u32,
    pub gutter: u32,
    pub hero: Vec<MorphText>,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            gutter: 0,
            hero: vec![
                MorphText::new("JIHEE", "BagelFatOne, serif", GlyphType::L),
                MorphText::new("지희", "BagelFatOne, serif", GlyphType::K),
                MorphText::new("ジヒ", "PottaOne, serif", GlyphType::J),
                MorphText::new("智熙", "PottaOne, serif", GlyphType::C),
            ],
        }
    }
}

pub struct Portfolio<F: EngineFactory> {
    filter: FilterState,
    feed: PaginatedAccumulator,
    expansion: ExpandableItemController,
    arranger: MasonryArranger<F>,
    morph: TextMorph,
    pointer: MouseFollow,
    fade: FadeTransition<Deferred>,
    clock: Duration,
}

impl<F: EngineFactory> Portfolio<F> {
    pub fn new(factory: F, config: PortfolioConfig) -> Self {
        let options = MasonryOptions::new(GRID_ITEM_SELECTOR, GRID_SIZER_SELECTOR, config.gutter);
        let mut fade = FadeTransition::new();
        fade.enter(Duration::ZERO);
        Self {
            filter: FilterState::new(),
            feed: PaginatedAccumulator::new(config.page_size),
            expansion: ExpandableItemController::new(),
            arranger: MasonryArranger::new(factory, GRID_CONTAINER, options),
            morph: TextMorph::new(config.hero),
            pointer: MouseFollow::hero(),
            fade,
            clock: Duration::ZERO,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn feed(&self) -> &PaginatedAccumulator {
        &self.feed
    }

    pub fn expansion(&self) -> &ExpandableItemController {
        &self.expansion
    }

    pub fn arranger(&self) -> &MasonryArranger<F> {
        &self.arranger
    }

    pub fn morph(&self) -> &TextMorph {
        &self.morph
    }

    pub fn pointer(&self) -> &MouseFollow {
        &self.pointer
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn fade(&self) -> &FadeTransition<Deferred> {
        &self.fade
    }

    pub fn items(&self) -> &Arc<[Item]> {
        self.filter.items()
    }

    /// Look up a loaded item. Ids coming back from the browser are strings,
    /// so `"12"` finds the item with integer id 12.
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        let wanted = id.to_string();
        self.items().iter().find(|item| item.id == *id || item.id.to_string() == wanted)
    }

    fn inputs(&self) -> GridInputs {
        GridInputs {
            items: Arc::clone(self.filter.items()),
            selector: self.filter.filter_selector(),
        }
    }

    // ── Filter ──────────────────────────────────────────────────────

    /// Switch category. Always collapses the expanded item, even when the
    /// category is unchanged.
    pub fn set_active_category(&mut self, category: Category) -> Option<MountTicket> {
        debug!(target: "folio::feed", category = %category, "filter");
        self.expansion.collapse();
        self.filter.set_active_category(category);
        let inputs = self.inputs();
        self.arranger.on_inputs_changed(inputs)
    }

    // ── Pagination ──────────────────────────────────────────────────

    pub fn begin_load(&mut self) -> Option<PageRequest> {
        self.feed.begin_load()
    }

    /// Apply a fetched page. Returns a mount ticket when the grid has to
    /// (re)build its engine for the new collection.
    pub fn finish_load(
        &mut self,
        request: PageRequest,
        result: Result<Page, String>,
    ) -> Option<MountTicket> {
        let before = Arc::clone(self.feed.items());
        if !self.feed.finish_load(request, result) {
            return None;
        }
        if let Some(err) = self.feed.error() {
            info!(target: "folio::feed", page = request.page, error = %err, "page load failed");
        }
        if Arc::ptr_eq(&before, self.feed.items()) {
            return None;
        }
        self.items_changed()
    }

    /// Adopt a catalog paged by someone else. Returns a mount ticket when
    /// the item collection is not the one already shown.
    pub fn sync_catalog(&mut self, catalog: &PaginatedAccumulator) -> Option<MountTicket> {
        let same = Arc::ptr_eq(self.feed.items(), catalog.items());
        self.feed = catalog.clone();
        if same {
            return None;
        }
        self.items_changed()
    }

    fn items_changed(&mut self) -> Option<MountTicket> {
        self.filter.set_items(Arc::clone(self.feed.items()));
        let inputs = self.inputs();
        self.arranger.on_inputs_changed(inputs)
    }

    // ── Grid lifecycle ──────────────────────────────────────────────

    /// Grid mounted. Also fades the page back in, which matters when the
    /// view comes back after a detail navigation faded it out.
    pub fn attach(&mut self) -> Option<MountTicket> {
        if !self.fade.is_visible() {
            self.fade.enter(self.clock);
        }
        let inputs = self.inputs();
        self.arranger.on_attach(inputs)
    }

    pub fn detach(&mut self) {
        self.arranger.on_detach();
        self.fade.teardown();
    }

    pub fn engine_loaded(&mut self, ticket: MountTicket) -> bool {
        self.arranger.on_engine_loaded(ticket)
    }

    pub fn images_loaded(&mut self, ticket: MountTicket) -> bool {
        self.arranger.on_images_loaded(ticket)
    }

    // ── Items ───────────────────────────────────────────────────────

    /// Click on a grid item. Detail navigation is deferred until the page
    /// has faded out; it comes back out of [`tick`](Self::tick).
    pub fn click(&mut self, id: &ItemId, element: Rect, grid: Rect) -> Option<ClickOutcome> {
        let item = self.item(id)?.clone();
        let outcome = self.expansion.handle_item_click(&item, element, grid);
        if let ClickOutcome::NavigateToDetail(key) = &outcome {
            self.fade.exit(self.clock, Deferred::Navigate(key.clone()));
        }
        Some(outcome)
    }

    // ── Time ────────────────────────────────────────────────────────

    pub fn point_at(&mut self, pointer: Pointer) {
        self.pointer.point_at(pointer);
    }

    /// Advance animation time by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Vec<Deferred> {
        self.clock += dt;
        let secs = dt.as_secs_f64();
        self.morph.step(secs);
        self.pointer.step(secs);
        self.fade.poll(self.clock)
    }
}

impl<F: EngineFactory> Paginate for Portfolio<F> {
    type Applied = Option<MountTicket>;

    fn begin_load(&mut self) -> Option<PageRequest> {
        Portfolio::begin_load(self)
    }

    fn finish_load(&mut self, request: PageRequest, result: Result<Page, String>) -> Option<MountTicket> {
        Portfolio::finish_load(self, request, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masonry::{CommandFactory, EngineCommand};

    fn page(ids: &[i64], number: u32, count: u32) -> Page {
        Page {
            items: ids
                .iter()
                .map(|id| Item::new(*id, &format!("p{}", id)).with_category(Category::Static))
                .collect(),
            page_number: number,
            page_count: count,
        }
    }

    fn loaded() -> (Portfolio<CommandFactory>, crate::masonry::CommandOutbox) {
        let (factory, outbox) = CommandFactory::channel();
        let mut portfolio = Portfolio::new(factory, PortfolioConfig::default());
        portfolio.attach();
        let req = portfolio.begin_load().unwrap();
        let ticket = portfolio.finish_load(req, Ok(page(&[1, 2], 1, 2))).unwrap();
        assert!(portfolio.engine_loaded(ticket));
        (portfolio, outbox)
    }

    #[test]
    fn test_category_change_collapses() {
        let (mut portfolio, _outbox) = loaded();
        let grid = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        let outcome = portfolio.click(&ItemId::Int(1), Rect::new(0.0, 0.0, 100.0, 100.0), grid);
        assert!(matches!(outcome, Some(ClickOutcome::Expanded { .. })));

        portfolio.set_active_category(Category::Music);
        assert_eq!(portfolio.expansion().state().expanded_item_id, None);
        assert_eq!(portfolio.expansion().state().expanded_side, None);
    }

    #[test]
    fn test_filter_rearranges_live_engine() {
        let (mut portfolio, outbox) = loaded();
        outbox.drain();
        assert_eq!(portfolio.set_active_category(Category::Rnd), None);
        let cmds = outbox.drain();
        assert_eq!(cmds.len(), 1);
        match &cmds[0] {
            EngineCommand::Arrange { options, .. } => {
                assert_eq!(options.filter, ".rand");
                assert_eq!(options.transition_duration.as_deref(), Some("0.8s"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_new_page_remounts() {
        let (mut portfolio, outbox) = loaded();
        outbox.drain();
        let req = portfolio.begin_load().unwrap();
        assert_eq!(req.page, 2);
        let ticket = portfolio.finish_load(req, Ok(page(&[3], 2, 2)));
        assert!(ticket.is_some());
        assert!(matches!(outbox.drain().as_slice(), [EngineCommand::Destroy { .. }]));
        assert_eq!(portfolio.items().len(), 3);
    }

    #[test]
    fn test_detail_click_navigates_after_fade() {
        let (factory, _outbox) = CommandFactory::channel();
        let mut portfolio = Portfolio::new(factory, PortfolioConfig::default());
        let req = portfolio.begin_load().unwrap();
        let mut p = page(&[], 1, 1);
        p.items.push(Item::new(7, "Orbit").with_detail("doc-7"));
        portfolio.finish_load(req, Ok(p));

        let grid = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        let outcome = portfolio.click(&ItemId::Int(7), Rect::default(), grid);
        assert_eq!(outcome, Some(ClickOutcome::NavigateToDetail("doc-7".into())));
        assert!(portfolio.tick(Duration::from_millis(200)).is_empty());
        assert_eq!(
            portfolio.tick(Duration::from_millis(200)),
            vec![Deferred::Navigate("doc-7".into())]
        );
    }

    #[test]
    fn test_page_fades_back_in_after_detail_navigation() {
        let (factory, _outbox) = CommandFactory::channel();
        let mut portfolio = Portfolio::new(factory, PortfolioConfig::default());
        let req = portfolio.begin_load().unwrap();
        let mut p = page(&[], 1, 1);
        p.items.push(Item::new(7, "Orbit").with_detail("doc-7"));
        portfolio.finish_load(req, Ok(p));
        portfolio.tick(Duration::from_millis(20));
        assert!(portfolio.fade().is_visible());

        let grid = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        portfolio.click(&ItemId::Int(7), Rect::default(), grid);
        assert_eq!(
            portfolio.tick(Duration::from_millis(450)),
            vec![Deferred::Navigate("doc-7".into())]
        );
        assert!(!portfolio.fade().is_visible());

        portfolio.detach();
        portfolio.attach();
        portfolio.tick(Duration::from_millis(50));
        assert!(portfolio.fade().is_visible());
        assert!(portfolio.fade().style().starts_with("opacity:1"));
    }

    #[test]
    fn test_sync_catalog_shares_items_and_remounts_once() {
        let (factory, _outbox) = CommandFactory::channel();
        let mut portfolio = Portfolio::new(factory, PortfolioConfig::default());
        portfolio.attach();

        let mut catalog = PaginatedAccumulator::new(2);
        let req = catalog.begin_load().unwrap();
        catalog.finish_load(req, Ok(page(&[1, 2], 1, 2)));

        assert!(portfolio.sync_catalog(&catalog).is_some());
        assert!(Arc::ptr_eq(portfolio.items(), catalog.items()));
        assert!(portfolio.feed().has_more());
        assert_eq!(portfolio.sync_catalog(&catalog), None);
    }

    #[test]
    fn test_pointer_follow_advances_with_ticks() {
        let (mut portfolio, _outbox) = loaded();
        portfolio.point_at(Pointer { x: 0.0, y: 0.0, width: 1000.0, height: 800.0 });
        let start = portfolio.pointer().position();
        portfolio.tick(Duration::from_millis(800));
        assert_ne!(portfolio.pointer().position(), start);
        assert_eq!(portfolio.pointer().position(), (0.0, 0.0));
    }

    #[test]
    fn test_string_id_finds_integer_item() {
        let (portfolio, _outbox) = loaded();
        assert!(portfolio.item(&ItemId::from("2")).is_some());
    }

    #[test]
    fn test_unknown_item_click_is_ignored() {
        let (mut portfolio, _outbox) = loaded();
        let grid = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        assert_eq!(portfolio.click(&ItemId::Int(99), Rect::default(), grid), None);
    }
}
