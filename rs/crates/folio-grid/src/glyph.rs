use serde::{Deserialize, Serialize};

/// Script family of a glyph, used to pick fonts and vertical-text rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlyphType {
    /// Chinese
    C,
    /// Japanese kana
    J,
    /// Korean hangul
    K,
    /// Latin and everything else
    L,
}

impl GlyphType {
    pub fn is_cjk(self) -> bool {
        !matches!(self, GlyphType::L)
    }
}

pub fn classify_glyph(c: char) -> GlyphType {
    match c as u32 {
        0x4E00..=0x9FFF => GlyphType::C,
        0x3040..=0x309F | 0x30A0..=0x30FF => GlyphType::J,
        0x3130..=0x318F | 0xAC00..=0xD7AF => GlyphType::K,
        _ => GlyphType::L,
    }
}

pub fn is_cjk_text(text: &str) -> bool {
    text.chars().any(|c| classify_glyph(c).is_cjk())
}

/// Font class for a run of text.
pub fn glyph_class(text: &str) -> &'static str {
    if is_cjk_text(text) {
        "cjk-font"
    } else {
        "latin-font"
    }
}
