//! Project detail page view.

use folio_dom::DomNode;
use folio_grid::generate_layout;

use crate::config::CmsConfig;
use crate::dto::MediaDto;
use crate::richtext::{render_blocks, split_description, Block};
use crate::video::{render_video, VideoKind};

/// Image count above which media is shown as a masonry grid.
const MEDIA_GRID_THRESHOLD: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeroType {
    Thumbnail,
    Youtube,
    Vimeo,
    HeroMedia,
    Other(String),
}

impl HeroType {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Thumbnail" => HeroType::Thumbnail,
            "Youtube" => HeroType::Youtube,
            "Vimeo" => HeroType::Vimeo,
            "HeroMedia" => HeroType::HeroMedia,
            other => HeroType::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    pub id: i64,
    /// Absolute URL.
    pub url: String,
    pub mime: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub alt: Option<String>,
    pub caption: Option<String>,
}

impl Media {
    pub fn from_dto(dto: &MediaDto, config: &CmsConfig) -> Self {
        Self {
            id: dto.id,
            url: config.media(&dto.url),
            mime: dto.mime.clone(),
            width: dto.width,
            height: dto.height,
            alt: dto.alternative_text.clone(),
            caption: dto.caption.clone(),
        }
    }

    fn mime(&self) -> &str {
        self.mime.as_deref().unwrap_or("")
    }

    pub fn is_image(&self) -> bool {
        self.mime().starts_with("image/")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDetail {
    pub id: i64,
    pub document_id: Option<String>,
    pub title: String,
    pub year: Option<String>,
    pub stack: Option<String>,
    pub collaborators: Option<String>,
    pub hero_type: Option<HeroType>,
    pub thumbnail: Option<Media>,
    pub hero_media: Option<Media>,
    pub media: Vec<Media>,
    pub description: Vec<Block>,
    pub youtube: Option<String>,
    pub vimeo: Option<String>,
    pub github: Option<String>,
    pub iframe: Option<String>,
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

pub fn render_detail(project: &ProjectDetail) -> DomNode {
    let (primary, secondary) = split_description(&project.description);
    let (images, others): (Vec<&Media>, Vec<&Media>) = project.media.iter().partition(|m| m.is_image());

    let mut page = DomNode::element("article")
        .with_key("project")
        .with_class("project-page")
        .with_child(
            DomNode::element("div").with_class("back-button").with_child(
                DomNode::text("a", "Back").with_attr("href", "/#projects").with_key("back"),
            ),
        )
        .with_child(render_header(project));

    if let Some(hero) = render_hero(project) {
        page = page.with_child(DomNode::element("div").with_class("hero-section").with_child(hero));
    }

    if !primary.is_empty() {
        page = page.with_child(description_section("description-primary", primary));
    }

    let embeds = render_embeds(project);
    if !embeds.is_empty() {
        page = page.with_child(DomNode::element("section").with_class("embed").with_children(embeds));
    }

    if let Some(rest) = secondary {
        page = page.with_child(description_section("description-secondary", rest));
    }

    let others: Vec<DomNode> = others.iter().filter_map(|m| render_media(m, &project.title)).collect();
    if !others.is_empty() {
        page = page.with_child(media_section(others));
    }

    if images.len() > MEDIA_GRID_THRESHOLD {
        page = page.with_child(
            DomNode::element("section")
                .with_class("media-section")
                .with_child(render_media_grid(&images, &project.title)),
        );
    } else if !images.is_empty() {
        page = page.with_child(media_section(
            images.iter().filter_map(|m| render_media(m, &project.title)).collect(),
        ));
    }
    page
}

pub fn render_not_found() -> DomNode {
    DomNode::element("article")
        .with_key("project")
        .with_class("project-page")
        .with_child(DomNode::text("div", "Project not found").with_class("not-found"))
}

fn render_header(project: &ProjectDetail) -> DomNode {
    let meta = [&project.year, &project.stack, &project.collaborators]
        .into_iter()
        .flatten()
        .map(|value| DomNode::text("div", value).with_class("meta-info-item"));

    DomNode::element("header")
        .with_class("header")
        .with_child(DomNode::text("h1", &project.title).with_class("title"))
        .with_child(DomNode::element("div").with_class("meta-info").with_children(meta))
}

fn render_hero(project: &ProjectDetail) -> Option<DomNode> {
    match project.hero_type.as_ref()? {
        HeroType::Thumbnail => project.thumbnail.as_ref().and_then(|m| render_media(m, &project.title)),
        HeroType::HeroMedia => project.hero_media.as_ref().and_then(|m| render_media(m, &project.title)),
        HeroType::Youtube => project
            .youtube
            .as_deref()
            .map(|url| render_video(VideoKind::Youtube, url, &project.title)),
        HeroType::Vimeo => project
            .vimeo
            .as_deref()
            .map(|url| render_video(VideoKind::Vimeo, url, &project.title)),
        HeroType::Other(_) => None,
    }
}

fn render_embeds(project: &ProjectDetail) -> Vec<DomNode> {
    let hero = project.hero_type.as_ref();
    let mut out = Vec::new();

    if let Some(url) = project.youtube.as_deref() {
        if hero != Some(&HeroType::Youtube) {
            out.push(render_video(VideoKind::Youtube, url, &project.title));
        }
    }
    if let Some(url) = project.vimeo.as_deref() {
        if hero != Some(&HeroType::Vimeo) {
            out.push(render_video(VideoKind::Vimeo, url, &project.title));
        }
    }
    if let Some(url) = project.iframe.as_deref() {
        out.push(
            DomNode::element("div").with_class("aspect-pdf").with_child(
                DomNode::element("iframe")
                    .with_class("iframe")
                    .with_attr("src", url)
                    .with_attr("title", format!("{} - External content", project.title))
                    .with_attr("frameborder", "0")
                    .with_attr("allowfullscreen", "true"),
            ),
        );
    }
    if let Some(url) = project.github.as_deref() {
        out.push(DomNode::element("div").with_child(external_link(url, "Github").with_class("github-link")));
    }
    out
}

fn description_section(class: &str, blocks: &[Block]) -> DomNode {
    DomNode::element("section").with_class(class).with_child(
        DomNode::element("div")
            .with_class("description-content")
            .with_children(render_blocks(blocks)),
    )
}

fn media_section(children: Vec<DomNode>) -> DomNode {
    DomNode::element("section").with_class("media-section").with_child(
        DomNode::element("div")
            .with_class("section-with-spacing")
            .with_children(children),
    )
}

fn external_link(url: &str, label: &str) -> DomNode {
    DomNode::text("a", label)
        .with_attr("href", url)
        .with_attr("target", "_blank")
        .with_attr("rel", "noopener noreferrer")
}

fn caption(media: &Media) -> Option<DomNode> {
    media.caption.as_deref().map(|c| DomNode::text("p", c).with_class("media-caption"))
}

/// One media asset by MIME family. Unknown types render nothing.
fn render_media(media: &Media, title: &str) -> Option<DomNode> {
    let mime = media.mime();
    let container = DomNode::element("div").with_class("media-container");

    let body = if media.is_image() {
        DomNode::element("img")
            .with_class("media-image")
            .with_attr("src", media.url.as_str())
            .with_attr("alt", media.alt.as_deref().unwrap_or(title))
    } else if mime.starts_with("audio/") {
        DomNode::element("audio")
            .with_class("audio-player")
            .with_attr("controls", "true")
            .with_child(
                DomNode::element("source")
                    .with_attr("src", media.url.as_str())
                    .with_attr("type", mime),
            )
    } else if mime == "application/pdf" {
        DomNode::element("object")
            .with_class("iframe")
            .with_attr("data", media.url.as_str())
            .with_attr("type", "application/pdf")
            .with_child(
                DomNode::text("p", "Unable to display PDF. ")
                    .with_child(external_link(&media.url, "Download")),
            )
    } else {
        return None;
    };

    let container = if mime == "application/pdf" {
        container.with_class("aspect-pdf")
    } else {
        container
    };
    Some(container.with_child(body).with_children(caption(media)))
}

fn render_media_grid(images: &[&Media], title: &str) -> DomNode {
    let cards = images.iter().map(|media| {
        let hint = generate_layout(media.id, 1.0);
        let mut img = DomNode::element("img")
            .with_attr("src", media.url.as_str())
            .with_attr("alt", media.alt.as_deref().unwrap_or(title));
        if let (Some(w), Some(h)) = (media.width, media.height) {
            img = img.with_attr("width", w.to_string()).with_attr("height", h.to_string());
        }
        let mut inner = DomNode::element("div")
            .with_class("grid-item-inner")
            .with_child(DomNode::element("div").with_class("image-container").with_child(img));
        if let Some(c) = &media.caption {
            inner = inner.with_child(DomNode::element("div").with_class("text-container").with_child(DomNode::text("p", c)));
        }
        DomNode::element("button")
            .with_key(format!("media-{}", media.id))
            .with_class("featured grid-item")
            .with_attr("style", hint.style())
            .with_child(inner)
    });

    DomNode::element("div")
        .with_key("media-grid")
        .with_class("grid media-grid")
        .with_child(DomNode::element("div").with_class("grid-sizer"))
        .with_children(cards)
}
