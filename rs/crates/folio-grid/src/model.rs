use serde::{Deserialize, Serialize};
use std::fmt;

use crate::layout::{generate_layout, LayoutHint};
use crate::selector::sanitize;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Stable item identifier. CMS ids are integers; media assets use strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(n) => write!(f, "{}", n),
            ItemId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Int(n)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Str(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::Str(s)
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Filter category. `All` matches every item; `Other` keeps labels the CMS
/// sends that the site does not know about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    #[default]
    All,
    Interactive,
    Static,
    Rnd,
    Music,
    None,
    Other(String),
}

impl Category {
    /// Categories offered in the filter bar, in display order.
    pub const FILTERS: [Category; 5] = [
        Category::All,
        Category::Interactive,
        Category::Static,
        Category::Rnd,
        Category::Music,
    ];

    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "all" | "*" => Category::All,
            "interactive" => Category::Interactive,
            "static" => Category::Static,
            "rnd" | "r&d" | "rand" => Category::Rnd,
            "music" => Category::Music,
            "none" | "" => Category::None,
            _ => Category::Other(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Category::All => "All",
            Category::Interactive => "Interactive",
            Category::Static => "Static",
            Category::Rnd => "R&D",
            Category::Music => "Music",
            Category::None => "None",
            Category::Other(s) => s,
        }
    }

    /// CSS class carried by items of this category; also the filter token.
    pub fn class_token(&self) -> String {
        sanitize(self.label())
    }

    /// Spacing scale used for layout hints. Untyped filler items sit tighter.
    pub fn layout_scale(&self) -> f64 {
        match self {
            Category::None => 0.5,
            _ => 1.0,
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::from_label(&s)
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.label().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    Youtube,
    Vimeo,
    Github,
    Iframe,
}

impl LinkKind {
    /// Order in which outbound links are consulted on click.
    pub const PRIORITY: [LinkKind; 4] = [
        LinkKind::Youtube,
        LinkKind::Vimeo,
        LinkKind::Github,
        LinkKind::Iframe,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalLink {
    pub kind: LinkKind,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// A project (or media asset) shown in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    /// CMS key of the detail document, when it differs from `id`.
    pub document_id: Option<String>,
    pub title: String,
    pub category: Option<Category>,
    pub has_detail_content: bool,
    /// Outbound links, kept in `LinkKind::PRIORITY` order.
    pub external_links: Vec<ExternalLink>,
    pub thumbnail: Option<Thumbnail>,
    pub year: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, title: &str) -> Self {
        Self {
            id: id.into(),
            document_id: None,
            title: title.to_string(),
            category: None,
            has_detail_content: false,
            external_links: Vec::new(),
            thumbnail: None,
            year: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_detail(mut self, document_id: &str) -> Self {
        self.document_id = Some(document_id.to_string());
        self.has_detail_content = true;
        self
    }

    pub fn with_thumbnail(mut self, url: &str, width: u32, height: u32) -> Self {
        self.thumbnail = Some(Thumbnail { url: url.to_string(), width, height });
        self
    }

    /// Insert a link at its priority position.
    pub fn with_link(mut self, kind: LinkKind, url: &str) -> Self {
        let rank = |k: LinkKind| LinkKind::PRIORITY.iter().position(|p| *p == k);
        let at = self
            .external_links
            .iter()
            .position(|l| rank(l.kind) > rank(kind))
            .unwrap_or(self.external_links.len());
        self.external_links.insert(at, ExternalLink { kind, url: url.to_string() });
        self
    }

    /// First outbound link in priority order.
    pub fn primary_link(&self) -> Option<&ExternalLink> {
        self.external_links.first()
    }

    /// Key used to address the detail view.
    pub fn detail_key(&self) -> String {
        self.document_id.clone().unwrap_or_else(|| self.id.to_string())
    }

    /// Filter class, empty when the item has no category.
    pub fn class_token(&self) -> String {
        self.category.as_ref().map(Category::class_token).unwrap_or_default()
    }

    pub fn is_landscape(&self) -> bool {
        match (&self.thumbnail, &self.category) {
            (Some(_), Some(Category::None)) => false,
            (Some(t), _) => t.width > t.height,
            (None, _) => false,
        }
    }

    pub fn layout_hint(&self) -> LayoutHint {
        let scale = self.category.as_ref().map(Category::layout_scale).unwrap_or(1.0);
        generate_layout(&self.id, scale)
    }
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Item>,
    pub page_number: u32,
    pub page_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_round_trip() {
        for c in Category::FILTERS {
            assert_eq!(Category::from_label(c.label()), c);
        }
        assert_eq!(Category::from_label("r&d"), Category::Rnd);
        assert_eq!(Category::from_label("Sculpture"), Category::Other("Sculpture".into()));
    }

    #[test]
    fn test_category_serde_uses_label() {
        let json = serde_json::to_string(&Category::Rnd).unwrap();
        assert_eq!(json, "\"R&D\"");
        let back: Category = serde_json::from_str("\"interactive\"").unwrap();
        assert_eq!(back, Category::Interactive);
    }

    #[test]
    fn test_links_keep_priority_order() {
        let item = Item::new(1, "x")
            .with_link(LinkKind::Github, "https://github.com/y")
            .with_link(LinkKind::Iframe, "https://example.com")
            .with_link(LinkKind::Youtube, "https://youtu.be/x");
        let kinds: Vec<LinkKind> = item.external_links.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LinkKind::Youtube, LinkKind::Github, LinkKind::Iframe]);
        assert_eq!(item.primary_link().unwrap().url, "https://youtu.be/x");
    }

    #[test]
    fn test_landscape_ignores_untyped_items() {
        let wide = Item::new(1, "a").with_thumbnail("/a.png", 1600, 900);
        assert!(wide.is_landscape());
        let untyped = wide.clone().with_category(Category::None);
        assert!(!untyped.is_landscape());
        assert!(!Item::new(2, "b").is_landscape());
    }

    #[test]
    fn test_item_id_display() {
        assert_eq!(ItemId::from(42).to_string(), "42");
        assert_eq!(ItemId::from("abc").to_string(), "abc");
        let parsed: ItemId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, ItemId::Int(7));
    }
}
