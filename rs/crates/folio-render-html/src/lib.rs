//! folio-render-html — DomNode trees to HTML
//!
//! Server-side rendering for the first paint. Keys become `data-key` and
//! event bindings become `data-a_{event}` so the browser shell can hydrate
//! the markup and post actions back.

use std::fmt::Write;

use folio_dom::DomNode;

/// Id of the element the browser shell mounts into.
pub const MOUNT_ID: &str = "app";

fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}

pub fn render_to_html(node: &DomNode) -> String {
    let mut out = String::with_capacity(4096);
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &DomNode) {
    out.push('<');
    out.push_str(&node.tag);

    if let Some(key) = &node.key {
        write_attr(out, "data-key", key);
    }
    for (name, value) in node.attrs.iter().flatten() {
        write_attr(out, name, value);
    }
    for (event, action) in node.events.iter().flatten() {
        write_attr(out, &format!("data-a_{}", event), action);
    }
    out.push('>');

    if is_void(&node.tag) {
        return;
    }
    if let Some(text) = &node.text {
        escape_into(out, text, false);
    }
    for child in node.children_iter() {
        write_node(out, child);
    }
    let _ = write!(out, "</{}>", node.tag);
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {}=\"", name);
    escape_into(out, value, true);
    out.push('"');
}

fn escape_into(out: &mut String, s: &str, quotes: bool) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s, true);
    out
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// A full HTML document around a rendered view.
#[derive(Debug, Clone)]
pub struct Document {
    root: DomNode,
    title: Option<String>,
    description: Option<String>,
    stylesheets: Vec<String>,
    scripts: Vec<String>,
    sse_url: Option<String>,
}

impl Document {
    pub fn new(root: DomNode) -> Self {
        Self {
            root,
            title: None,
            description: None,
            stylesheets: Vec::new(),
            scripts: Vec::new(),
            sse_url: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_stylesheet(mut self, href: impl Into<String>) -> Self {
        self.stylesheets.push(href.into());
        self
    }

    /// Load a script after the body markup, before the bootstrap.
    pub fn with_script(mut self, src: impl Into<String>) -> Self {
        self.scripts.push(src.into());
        self
    }

    /// Have the shell subscribe to live snapshots at `url`.
    pub fn with_live_updates(mut self, url: impl Into<String>) -> Self {
        self.sse_url = Some(url.into());
        self
    }

    pub fn render(&self) -> String {
        let body = render_to_html(&self.root);
        let mut html = String::with_capacity(body.len() + 1024);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\" />\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
        if let Some(title) = &self.title {
            let _ = writeln!(html, "<title>{}</title>", escape(title));
        }
        if let Some(desc) = &self.description {
            let _ = writeln!(html, "<meta name=\"description\" content=\"{}\" />", escape(desc));
        }
        for href in &self.stylesheets {
            let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"{}\" />", escape(href));
        }
        html.push_str("</head>\n<body>\n");

        let _ = writeln!(html, "<div id=\"{}\">{}</div>", MOUNT_ID, body);
        for src in &self.scripts {
            let _ = writeln!(html, "<script src=\"{}\"></script>", escape(src));
        }
        if let Some(url) = &self.sse_url {
            let _ = writeln!(
                html,
                "<script>Folio.connect(\"{}\", \"#{}\");</script>",
                escape(url),
                MOUNT_ID
            );
        }

        html.push_str("</body>\n</html>");
        html
    }
}
