//! Grid view: portfolio state → DomNode tree.
//!
//! Every loaded item is emitted, filtered or not; the masonry engine hides
//! the ones its selector rejects, so a category switch never changes the
//! node set the browser reconciles against.

use folio_dom::DomNode;

use crate::masonry::EngineFactory;
use crate::model::{Category, Item};
use crate::morph::LayerStyle;
use crate::state::Portfolio;

pub fn render_view<F: EngineFactory>(state: &Portfolio<F>) -> DomNode {
    DomNode::element("main")
        .with_key("portfolio")
        .with_class("portfolio")
        .with_attr("style", state.fade().style())
        .with_child(render_hero(state))
        .with_child(render_filters(state.filter().active()))
        .with_children(render_grid(state))
}

// ---------------------------------------------------------------------------
// Hero
// ---------------------------------------------------------------------------

fn render_hero<F: EngineFactory>(state: &Portfolio<F>) -> DomNode {
    let morph = state.morph();
    let texts = morph.texts();
    let hero = DomNode::element("header")
        .with_key("hero")
        .with_class("hero")
        .with_attr("style", state.pointer().style().css());
    if texts.is_empty() {
        return hero;
    }

    let frame = morph.frame();
    let layer = |key: &str, index: usize, style: &LayerStyle| {
        let text = &texts[index % texts.len()];
        DomNode::text("span", &text.text)
            .with_key(key)
            .with_class("morph-text")
            .with_class(text.class())
            .with_attr("style", format!("font-family:{};{}", text.font, style.css()))
    };

    hero.with_child(
        DomNode::element("div")
            .with_class("morph")
            .with_child(layer("morph-0", frame.current, &frame.outgoing))
            .with_child(layer("morph-1", frame.next, &frame.incoming)),
    )
}

// ---------------------------------------------------------------------------
// Filter bar
// ---------------------------------------------------------------------------

fn render_filters(active: &Category) -> DomNode {
    let buttons = Category::FILTERS.iter().map(|category| {
        let mut button = DomNode::text("button", category.label())
            .with_key(format!("filter-{}", category.class_token()))
            .with_class("filter-button")
            .with_attr("data-category", category.label())
            .with_event("click", "filter");
        if category == active {
            button = button.with_class("active");
        }
        button
    });

    DomNode::element("nav")
        .with_key("filters")
        .with_class("filters")
        .with_children(buttons)
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

fn render_grid<F: EngineFactory>(state: &Portfolio<F>) -> Vec<DomNode> {
    let feed = state.feed();
    let items = state.items();
    let mut out = Vec::new();

    if feed.is_loading() && items.is_empty() {
        out.push(DomNode::text("div", "Loading projects...").with_key("loading").with_class("loading"));
    }

    let show_category = *state.filter().active() == Category::All;
    let cards = items.iter().map(|item| render_item(state, item, show_category));
    out.push(
        DomNode::element("div")
            .with_key("grid")
            .with_attr("id", "project-grid")
            .with_class("grid")
            .with_child(DomNode::element("div").with_key("grid-sizer").with_class("grid-sizer"))
            .with_children(cards),
    );

    if feed.has_more() {
        let mut sentinel = DomNode::element("div")
            .with_key("load-more")
            .with_class("load-more")
            .with_event("intersect", "load_more");
        if feed.is_loading() && !items.is_empty() {
            sentinel = sentinel.with_text("Loading...");
        }
        out.push(sentinel);
    }

    if let Some(err) = feed.error() {
        out.push(
            DomNode::text("p", &format!("Failed to load projects: {}", err))
                .with_key("feed-error")
                .with_class("error"),
        );
    }
    out
}

fn render_item<F: EngineFactory>(state: &Portfolio<F>, item: &Item, show_category: bool) -> DomNode {
    let expansion = state.expansion();
    let expanded = expansion.is_expanded(&item.id);

    let mut button = DomNode::element("button")
        .with_key(format!("item-{}", item.id))
        .with_class("grid-item")
        .with_class(&item.class_token())
        .with_class(if item.is_landscape() { "landscape" } else { "portrait" })
        .with_attr("style", item.layout_hint().style())
        .with_attr("data-id", item.id.to_string())
        .with_event("click", "click");

    if expanded {
        button = button.with_class("expanded");
        if let Some(side) = expansion.state().expanded_side {
            button = button.with_class(side.class());
        }
    }

    let media = match &item.thumbnail {
        Some(thumb) => DomNode::element("img")
            .with_attr("src", thumb.url.as_str())
            .with_attr("alt", item.title.as_str())
            .with_attr("width", thumb.width.to_string())
            .with_attr("height", thumb.height.to_string())
            .with_attr("loading", "lazy"),
        None => DomNode::text("div", "No Image").with_class("no-image"),
    };

    let mut info = DomNode::element("div")
        .with_class("text-container")
        .with_child(DomNode::text("h3", &item.title).with_class(crate::glyph::glyph_class(&item.title)));
    if show_category {
        if let Some(category) = &item.category {
            info = info.with_child(DomNode::text("p", category.label()));
        }
    }

    button.with_child(
        DomNode::element("div")
            .with_class("grid-item-inner")
            .with_child(DomNode::element("div").with_class("image-container").with_child(media))
            .with_child(info),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::Rect;
    use crate::masonry::CommandFactory;
    use crate::model::{ItemId, Page};
    use crate::state::PortfolioConfig;

    fn portfolio(items: Vec<Item>, page_count: u32) -> Portfolio<CommandFactory> {
        let (factory, _outbox) = CommandFactory::channel();
        let mut state = Portfolio::new(factory, PortfolioConfig::default());
        let req = state.begin_load().unwrap();
        state.finish_load(req, Ok(Page { items, page_number: 1, page_count }));
        state
    }

    #[test]
    fn test_item_carries_layout_and_classes() {
        let state = portfolio(
            vec![Item::new(12, "Orbit")
                .with_category(Category::Rnd)
                .with_thumbnail("http://cms/a.jpg", 800, 600)],
            1,
        );
        let root = render_view(&state);
        let node = root.find_by_key("item-12").unwrap();
        assert!(node.has_class("grid-item"));
        assert!(node.has_class("rand"));
        assert!(node.has_class("landscape"));
        assert_eq!(node.attr("style"), Some(Item::new(12, "x").with_category(Category::Rnd).layout_hint().style().as_str()));
        assert_eq!(node.event("click"), Some("click"));
        assert!(node.text_content().contains("R&D"));
    }

    #[test]
    fn test_missing_thumbnail_falls_back() {
        let state = portfolio(vec![Item::new(1, "Blank")], 1);
        let root = render_view(&state);
        let node = root.find_by_key("item-1").unwrap();
        assert!(node.text_content().contains("No Image"));
        assert!(node.has_class("portrait"));
    }

    #[test]
    fn test_sentinel_only_while_more_pages() {
        let more = portfolio(vec![Item::new(1, "a")], 3);
        assert!(render_view(&more).find_by_key("load-more").is_some());

        let done = portfolio(vec![Item::new(1, "a")], 1);
        assert!(render_view(&done).find_by_key("load-more").is_none());
    }

    #[test]
    fn test_error_line_rendered() {
        let (factory, _outbox) = CommandFactory::channel();
        let mut state = Portfolio::new(factory, PortfolioConfig::default());
        let req = state.begin_load().unwrap();
        state.finish_load(req, Err("timeout".into()));
        let root = render_view(&state);
        let err = root.find_by_key("feed-error").unwrap();
        assert!(err.text_content().contains("timeout"));
        assert!(root.find_by_key("load-more").is_none());
    }

    #[test]
    fn test_expanded_item_classes() {
        let mut state = portfolio(vec![Item::new(1, "a"), Item::new(2, "b")], 1);
        let grid = Rect::new(0.0, 0.0, 1000.0, 800.0);
        state.click(&ItemId::Int(2), Rect::new(700.0, 0.0, 200.0, 200.0), grid);
        let root = render_view(&state);
        let node = root.find_by_key("item-2").unwrap();
        assert!(node.has_class("expanded"));
        assert!(node.has_class("expanded-right"));
        assert!(!root.find_by_key("item-1").unwrap().has_class("expanded"));
    }

    #[test]
    fn test_hero_follows_pointer() {
        let mut state = portfolio(vec![], 1);
        let resting = render_view(&state).find_by_key("hero").unwrap().attr("style").map(str::to_string);
        state.point_at(crate::pointer::Pointer { x: 0.0, y: 0.0, width: 1000.0, height: 800.0 });
        state.tick(std::time::Duration::from_millis(800));
        let root = render_view(&state);
        let style = root.find_by_key("hero").unwrap().attr("style").unwrap();
        assert!(style.contains("transform:skew(-3.00deg)"));
        assert_ne!(resting.as_deref(), Some(style));
    }

    #[test]
    fn test_active_filter_marked() {
        let mut state = portfolio(vec![], 1);
        state.set_active_category(Category::Music);
        let root = render_view(&state);
        assert!(root.find_by_key("filter-music").unwrap().has_class("active"));
        assert!(!root.find_by_key("filter-all").unwrap().has_class("active"));
    }
}
