//! folio-dom — Shared DomNode types for Folio views
//!
//! This crate defines the JSON DOM snapshot format exchanged between the
//! server-side view code and the browser shell. The grid view, the detail
//! view and the HTML renderer all work on this type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One element of a view. Everything but the tag is optional and left out
/// of the JSON when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomNode {
    pub tag: String,

    /// Identity the browser reconciles on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<BTreeMap<String, String>>,

    /// DOM event → action name posted back to the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DomNode>>,
}

/// What the server sends on every update: `{"root": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub root: DomNode,
}

impl DomNode {
    pub fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            key: None,
            attrs: None,
            events: None,
            text: None,
            children: None,
        }
    }

    /// Element holding only `content`.
    pub fn text(tag: &str, content: &str) -> Self {
        Self::element(tag).with_text(content)
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), value.into());
        self
    }

    /// Append one or more space-separated classes. Empty input is ignored.
    pub fn with_class(mut self, class: &str) -> Self {
        let class = class.trim();
        if class.is_empty() {
            return self;
        }
        let attrs = self.attrs.get_or_insert_with(BTreeMap::new);
        match attrs.get_mut("class") {
            Some(existing) if !existing.is_empty() => {
                existing.push(' ');
                existing.push_str(class);
            }
            _ => {
                attrs.insert("class".to_string(), class.to_string());
            }
        }
        self
    }

    pub fn with_event(mut self, event: &str, action: &str) -> Self {
        self.events
            .get_or_insert_with(BTreeMap::new)
            .insert(event.to_string(), action.to_string());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = DomNode>) -> Self {
        self.children.get_or_insert_with(Vec::new).extend(children);
        self
    }

    pub fn class(&self) -> Option<&str> {
        self.attr("class")
    }

    /// True when the space-separated class list contains `name`
    pub fn has_class(&self, name: &str) -> bool {
        self.class()
            .map(|c| c.split_whitespace().any(|part| part == name))
            .unwrap_or(false)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.as_ref()?.get(name).map(|s| s.as_str())
    }

    pub fn children_iter(&self) -> &[DomNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Action bound to `event`, if any.
    pub fn event(&self, event: &str) -> Option<&str> {
        self.events.as_ref()?.get(event).map(String::as_str)
    }

    /// Depth-first search for the node carrying `key`
    pub fn find_by_key(&self, key: &str) -> Option<&DomNode> {
        if self.key.as_deref() == Some(key) {
            return Some(self);
        }
        self.children_iter().iter().find_map(|c| c.find_by_key(key))
    }

    /// Concatenated text of this node and all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &DomNode, out: &mut String) {
    if let Some(t) = &node.text {
        out.push_str(t);
    }
    for child in node.children_iter() {
        collect_text(child, out);
    }
}

pub fn parse_snapshot(json: &str) -> Result<Snapshot, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_browser_json() {
        let snap = parse_snapshot(
            r#"{"root":{"tag":"nav","key":"filters","children":[
                {"tag":"button","events":{"click":"filter"},"attrs":{"data-category":"Music"},"text":"Music"}
            ]}}"#,
        )
        .unwrap();
        let button = &snap.root.children_iter()[0];
        assert_eq!(snap.root.key.as_deref(), Some("filters"));
        assert_eq!(button.event("click"), Some("filter"));
        assert_eq!(button.attr("data-category"), Some("Music"));
        assert!(button.children_iter().is_empty());
    }

    #[test]
    fn test_builder_appends_classes() {
        let node = DomNode::element("button")
            .with_class("grid-item")
            .with_class("")
            .with_class("interactive portrait");
        assert_eq!(node.class(), Some("grid-item interactive portrait"));
        assert!(node.has_class("portrait"));
        assert!(!node.has_class("landscape"));
    }

    #[test]
    fn test_find_by_key_and_text_content() {
        let tree = DomNode::element("div").with_children([
            DomNode::text("h3", "Title").with_key("title"),
            DomNode::element("p").with_child(DomNode::text("span", "Body")),
        ]);
        assert_eq!(tree.find_by_key("title").map(|n| n.tag.as_str()), Some("h3"));
        assert!(tree.find_by_key("missing").is_none());
        assert_eq!(tree.text_content(), "TitleBody");
    }

    #[test]
    fn test_empty_fields_are_not_serialized() {
        let json = serde_json::to_string(&DomNode::text("p", "hi")).unwrap();
        assert_eq!(json, r#"{"tag":"p","text":"hi"}"#);
    }
}
