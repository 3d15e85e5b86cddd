//! Strapi response shapes and their mapping onto grid items.

use folio_grid::model::{Category, Item, LinkKind, Page};
use serde::{Deserialize, Deserializer};

use crate::config::CmsConfig;
use crate::detail::{HeroType, Media, ProjectDetail};
use crate::richtext::Block;

// ── Envelopes ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Meta,
}

#[derive(Debug, Deserialize)]
pub struct SingleResponse<T> {
    pub data: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Meta {
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u32,
}

// ── Records ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct MediaDto {
    pub id: i64,
    pub url: String,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default, rename = "alternativeText")]
    pub alternative_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectDto {
    #[serde(rename = "id")]
    pub id: i64,
    #[serde(rename = "documentId", default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub show: Option<bool>,
    #[serde(default, rename = "Type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<MediaDto>,
    #[serde(default)]
    pub media: Option<Vec<MediaDto>>,
    #[serde(default)]
    pub hero_media: Option<MediaDto>,
    #[serde(default)]
    pub hero_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: Option<String>,
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub collaborators: Option<String>,
    #[serde(default)]
    pub description: Option<Vec<Block>>,
    #[serde(default)]
    pub youtube: Option<String>,
    #[serde(default)]
    pub vimeo: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub iframe: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AboutDto {
    #[serde(default)]
    pub description: Vec<Block>,
}

/// Accept `"2023"`, `2023` or `null`.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(i64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Str(s)) if !s.trim().is_empty() => Some(s),
        Some(Raw::Num(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// ── Mapping ─────────────────────────────────────────────────────────

impl ProjectDto {
    /// Projects with `Show: false` are hidden; absent means shown.
    pub fn is_visible(&self) -> bool {
        self.show.unwrap_or(true)
    }

    pub fn has_detail_content(&self) -> bool {
        let described = self.description.as_ref().map(|d| !d.is_empty()).unwrap_or(false);
        described || non_empty(&self.hero_type).is_some()
    }

    /// Grid item for this project, or `None` when it is hidden.
    pub fn to_item(&self, config: &CmsConfig) -> Option<Item> {
        if !self.is_visible() {
            return None;
        }

        let mut item = Item::new(self.id, &self.title);
        item.document_id = self.document_id.clone();
        item.has_detail_content = self.has_detail_content();
        item.category = non_empty(&self.kind).map(Category::from_label);
        item.year = self.year.clone();

        if let Some(thumb) = &self.thumbnail {
            item = item.with_thumbnail(
                &config.media(&thumb.url),
                thumb.width.unwrap_or(0),
                thumb.height.unwrap_or(0),
            );
        }

        let links = [
            (LinkKind::Youtube, &self.youtube),
            (LinkKind::Vimeo, &self.vimeo),
            (LinkKind::Github, &self.github),
            (LinkKind::Iframe, &self.iframe),
        ];
        for (kind, url) in links {
            if let Some(url) = non_empty(url) {
                item = item.with_link(kind, url);
            }
        }
        Some(item)
    }

    pub fn to_detail(&self, config: &CmsConfig) -> ProjectDetail {
        let media = |m: &MediaDto| Media::from_dto(m, config);
        ProjectDetail {
            id: self.id,
            document_id: self.document_id.clone(),
            title: self.title.clone(),
            year: self.year.clone(),
            stack: non_empty(&self.stack).map(str::to_string),
            collaborators: non_empty(&self.collaborators).map(str::to_string),
            hero_type: non_empty(&self.hero_type).map(HeroType::from_label),
            thumbnail: self.thumbnail.as_ref().map(media),
            hero_media: self.hero_media.as_ref().map(media),
            media: self.media.iter().flatten().map(media).collect(),
            description: self.description.clone().unwrap_or_default(),
            youtube: non_empty(&self.youtube).map(str::to_string),
            vimeo: non_empty(&self.vimeo).map(str::to_string),
            github: non_empty(&self.github).map(str::to_string),
            iframe: non_empty(&self.iframe).map(str::to_string),
        }
    }
}

impl ListResponse<ProjectDto> {
    /// Page of visible items. Without pagination metadata the listing is
    /// treated as a single page.
    pub fn into_page(self, requested: u32, config: &CmsConfig) -> Page {
        let (page_number, page_count) = match self.meta.pagination {
            Some(p) => (p.page, p.page_count),
            None => (requested, requested),
        };
        Page {
            items: self.data.iter().filter_map(|dto| dto.to_item(config)).collect(),
            page_number,
            page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_grid::model::ItemId;
    use serde_json::json;

    fn listing() -> serde_json::Value {
        json!({
            "data": [
                {
                    "id": 4,
                    "documentId": "k2x",
                    "Title": "Orbit",
                    "Show": true,
                    "Type": "Interactive",
                    "Year": 2023,
                    "Thumbnail": {"id": 9, "url": "/uploads/orbit.jpg", "width": 1200, "height": 800, "mime": "image/jpeg"},
                    "Description": [{"type": "paragraph", "children": [{"type": "text", "text": "hi"}]}],
                    "Github": "https://github.com/x/orbit",
                    "Youtube": "https://youtu.be/dQw4w9WgXcQ"
                },
                {"id": 5, "documentId": "hidden", "Title": "Draft", "Show": false},
                {"id": 6, "documentId": "r9", "Title": "Lab", "Type": "R&D", "Year": null, "Thumbnail": null}
            ],
            "meta": {"pagination": {"page": 1, "pageSize": 12, "pageCount": 3, "total": 30}}
        })
    }

    #[test]
    fn test_listing_maps_to_page() {
        let config = CmsConfig::default();
        let resp: ListResponse<ProjectDto> = serde_json::from_value(listing()).unwrap();
        let page = resp.into_page(1, &config);

        assert_eq!(page.page_number, 1);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.items.len(), 2);

        let orbit = &page.items[0];
        assert_eq!(orbit.id, ItemId::Int(4));
        assert_eq!(orbit.detail_key(), "k2x");
        assert!(orbit.has_detail_content);
        assert_eq!(orbit.category, Some(Category::Interactive));
        assert_eq!(orbit.year.as_deref(), Some("2023"));
        assert_eq!(
            orbit.thumbnail.as_ref().map(|t| t.url.as_str()),
            Some("http://localhost:1337/uploads/orbit.jpg")
        );
        assert!(orbit.is_landscape());
        let kinds: Vec<LinkKind> = orbit.external_links.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LinkKind::Youtube, LinkKind::Github]);

        let lab = &page.items[1];
        assert_eq!(lab.category, Some(Category::Rnd));
        assert!(lab.thumbnail.is_none());
        assert!(!lab.has_detail_content);
    }

    #[test]
    fn test_missing_meta_is_single_page() {
        let resp: ListResponse<ProjectDto> = serde_json::from_value(json!({"data": []})).unwrap();
        let page = resp.into_page(1, &CmsConfig::default());
        assert_eq!(page.page_count, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_null_detail() {
        let resp: SingleResponse<ProjectDto> = serde_json::from_value(json!({"data": null})).unwrap();
        assert!(resp.data.is_none());
    }
}
