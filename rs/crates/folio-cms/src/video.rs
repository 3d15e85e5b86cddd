use folio_dom::DomNode;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref YOUTUBE_ID: Regex = Regex::new(
        r"(?:youtu\.be/|youtube\.com/(?:embed/|v/|watch\?v=|watch\?.+&v=))([^&?\s]{11})"
    )
    .unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoKind {
    Youtube,
    Vimeo,
}

impl VideoKind {
    pub fn label(&self) -> &'static str {
        match self {
            VideoKind::Youtube => "Youtube",
            VideoKind::Vimeo => "Vimeo",
        }
    }

    fn allow(&self) -> &'static str {
        match self {
            VideoKind::Youtube => {
                "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture"
            }
            VideoKind::Vimeo => "autoplay; fullscreen; picture-in-picture",
        }
    }
}

/// The 11-character video id from any of the usual YouTube URL shapes.
pub fn youtube_id(url: &str) -> Option<&str> {
    YOUTUBE_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Player URL for embedding. YouTube URLs that do not parse are returned as is.
pub fn embed_url(kind: VideoKind, url: &str) -> String {
    match kind {
        VideoKind::Youtube => match youtube_id(url) {
            Some(id) => format!("https://www.youtube.com/embed/{}", id),
            None => url.to_string(),
        },
        VideoKind::Vimeo => {
            let id = url.rsplit('/').next().unwrap_or(url);
            format!("https://player.vimeo.com/video/{}", id)
        }
    }
}

pub fn render_video(kind: VideoKind, url: &str, title: &str) -> DomNode {
    DomNode::element("div")
        .with_class("video-container")
        .with_attr("style", "aspect-ratio:16/9")
        .with_child(
            DomNode::element("iframe")
                .with_attr("src", embed_url(kind, url))
                .with_attr("title", format!("{} - {}", title, kind.label()))
                .with_attr("frameborder", "0")
                .with_attr("allow", kind.allow())
                .with_attr("allowfullscreen", "true"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_forms() {
        let id = "dQw4w9WgXcQ";
        for url in [
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
        ] {
            assert_eq!(youtube_id(url), Some(id), "{}", url);
        }
        assert_eq!(
            embed_url(VideoKind::Youtube, "https://youtu.be/dQw4w9WgXcQ?t=4"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_unparseable_youtube_falls_back() {
        let url = "https://www.youtube.com/channel/abc";
        assert_eq!(embed_url(VideoKind::Youtube, url), url);
    }

    #[test]
    fn test_vimeo_last_segment() {
        assert_eq!(
            embed_url(VideoKind::Vimeo, "https://vimeo.com/76979871"),
            "https://player.vimeo.com/video/76979871"
        );
    }

    #[test]
    fn test_render_iframe() {
        let node = render_video(VideoKind::Vimeo, "https://vimeo.com/1", "Orbit");
        let iframe = &node.children_iter()[0];
        assert_eq!(iframe.attr("title"), Some("Orbit - Vimeo"));
        assert_eq!(iframe.attr("src"), Some("https://player.vimeo.com/video/1"));
    }
}
