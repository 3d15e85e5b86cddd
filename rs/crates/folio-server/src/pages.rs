//! Full HTML documents for the routes that serve pages.

use folio_cms::{render_blocks, render_detail, render_not_found, Block, ProjectDetail};
use folio_dom::DomNode;
use folio_render_html::Document;

pub const SITE_TITLE: &str = "Folio";
pub const SSE_PATH: &str = "/sse";
pub const CLIENT_JS_PATH: &str = "/folio.js";

/// Landing page: the about section followed by the live project grid of
/// view `session`.
pub fn home(about: &[Block], grid: DomNode, session: &str) -> String {
    let mut root = DomNode::element("div").with_key("home").with_class("home");
    if !about.is_empty() {
        root = root.with_child(
            DomNode::element("section")
                .with_key("about")
                .with_attr("id", "about")
                .with_class("about-section")
                .with_children(render_blocks(about)),
        );
    }
    root = root.with_child(
        DomNode::element("section")
            .with_key("projects")
            .with_attr("id", "projects")
            .with_child(grid),
    );

    Document::new(root)
        .with_title(SITE_TITLE)
        .with_script(CLIENT_JS_PATH)
        .with_live_updates(format!("{}?session={}", SSE_PATH, session))
        .render()
}

pub fn detail(project: &ProjectDetail) -> String {
    Document::new(render_detail(project))
        .with_title(format!("{} | {}", project.title, SITE_TITLE))
        .render()
}

pub fn not_found() -> String {
    Document::new(render_not_found()).with_title(SITE_TITLE).render()
}
