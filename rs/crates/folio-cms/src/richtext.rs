//! Strapi "blocks" rich text → DomNode.

use folio_dom::DomNode;
use folio_grid::glyph::glyph_class;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Block {
    Paragraph {
        #[serde(default)]
        children: Vec<Inline>,
    },
    Heading {
        #[serde(default)]
        children: Vec<Inline>,
        #[serde(default = "default_level")]
        level: u8,
    },
    List {
        #[serde(default)]
        format: ListFormat,
        #[serde(default)]
        children: Vec<ListItem>,
    },
    Quote {
        #[serde(default)]
        children: Vec<Inline>,
    },
    #[serde(other)]
    Unsupported,
}

fn default_level() -> u8 {
    2
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListFormat {
    #[default]
    Unordered,
    Ordered,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListItem {
    #[serde(default)]
    pub children: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Inline {
    Text {
        text: String,
        #[serde(default)]
        bold: bool,
        #[serde(default)]
        italic: bool,
    },
    Link {
        url: String,
        #[serde(default)]
        children: Vec<Inline>,
    },
    #[serde(other)]
    Unsupported,
}

impl Inline {
    pub fn plain_text(&self) -> String {
        match self {
            Inline::Text { text, .. } => text.clone(),
            Inline::Link { children, .. } => plain_text(children),
            Inline::Unsupported => String::new(),
        }
    }
}

pub fn plain_text(inlines: &[Inline]) -> String {
    inlines.iter().map(Inline::plain_text).collect()
}

impl Block {
    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading { .. })
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render_blocks(blocks: &[Block]) -> Vec<DomNode> {
    blocks.iter().filter_map(render_block).collect()
}

pub fn render_block(block: &Block) -> Option<DomNode> {
    match block {
        Block::Paragraph { children } => {
            if let [Inline::Text { text, .. }] = children.as_slice() {
                if text == "\n" {
                    return Some(DomNode::element("br"));
                }
            }
            Some(
                DomNode::element("p")
                    .with_class(glyph_class(&plain_text(children)))
                    .with_children(render_inlines(children)),
            )
        }
        Block::Heading { children, level } => {
            let level = (*level).clamp(1, 6);
            let spans = children.iter().map(|child| {
                DomNode::element("span")
                    .with_class("header-text")
                    .with_children(render_inline(child))
            });
            Some(
                DomNode::element(&format!("h{}", level))
                    .with_class(&format!("h{}", level))
                    .with_class(glyph_class(&plain_text(children)))
                    .with_children(spans),
            )
        }
        Block::List { format, children } => {
            let tag = match format {
                ListFormat::Ordered => "ol",
                ListFormat::Unordered => "ul",
            };
            let items = children
                .iter()
                .map(|item| DomNode::element("li").with_children(render_inlines(&item.children)));
            Some(DomNode::element(tag).with_children(items))
        }
        Block::Quote { children } => Some(
            DomNode::element("blockquote")
                .with_class(glyph_class(&plain_text(children)))
                .with_children(render_inlines(children)),
        ),
        Block::Unsupported => None,
    }
}

fn render_inlines(inlines: &[Inline]) -> Vec<DomNode> {
    inlines.iter().flat_map(render_inline).collect()
}

fn render_inline(inline: &Inline) -> Vec<DomNode> {
    match inline {
        Inline::Text { text, bold, italic } => {
            let mut out = Vec::new();
            for (i, line) in text.split('\n').enumerate() {
                if i > 0 {
                    out.push(DomNode::element("br"));
                }
                if line.is_empty() {
                    continue;
                }
                let node = if *bold {
                    DomNode::text("strong", line)
                } else {
                    DomNode::text("span", line)
                };
                out.push(if *italic { DomNode::element("em").with_child(node) } else { node });
            }
            out
        }
        Inline::Link { url, children } => vec![DomNode::element("a")
            .with_attr("href", url.as_str())
            .with_attr("target", "_blank")
            .with_attr("rel", "noopener noreferrer")
            .with_children(render_inlines(children))],
        Inline::Unsupported => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Description split
// ---------------------------------------------------------------------------

/// Split a description into a lead part and an optional remainder.
///
/// Up to three blocks stay together. Otherwise the split falls on the first
/// heading from index 2 on (never the last block), or after roughly a third
/// of the blocks, at most three.
pub fn split_description(blocks: &[Block]) -> (&[Block], Option<&[Block]>) {
    let n = blocks.len();
    if n <= 3 {
        return (blocks, None);
    }

    let at = (2..n - 1)
        .find(|&i| blocks[i].is_heading())
        .unwrap_or_else(|| n.div_ceil(3).min(3));

    let (primary, secondary) = blocks.split_at(at);
    (primary, Some(secondary))
}
