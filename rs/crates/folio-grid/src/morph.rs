//! Cross-fading text morph.
//!
//! Two stacked layers: the outgoing text blurs out while the incoming one
//! sharpens in, then both rest for a short cooldown before the next pair.
//! The state is advanced by [`TextMorph::step`] once per animation frame.

use serde::Serialize;

use crate::glyph::{glyph_class, GlyphType};

pub const MORPH_TIME_S: f64 = 2.0;
pub const COOLDOWN_TIME_S: f64 = 0.1;

const MAX_BLUR_PX: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MorphText {
    pub text: String,
    pub font: String,
    pub glyph: GlyphType,
}

impl MorphText {
    pub fn new(text: &str, font: &str, glyph: GlyphType) -> Self {
        Self { text: text.to_string(), font: font.to_string(), glyph }
    }

    pub fn class(&self) -> &'static str {
        glyph_class(&self.text)
    }
}

/// Filter and opacity for one layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerStyle {
    pub blur_px: f64,
    pub opacity: f64,
}

impl LayerStyle {
    pub const SHOWN: LayerStyle = LayerStyle { blur_px: 0.0, opacity: 1.0 };
    pub const HIDDEN: LayerStyle = LayerStyle { blur_px: 0.0, opacity: 0.0 };

    /// Style of a layer that is `p` of the way in.
    pub fn at(p: f64) -> Self {
        Self {
            blur_px: (8.0 / p - 8.0).min(MAX_BLUR_PX),
            opacity: p.powf(0.4),
        }
    }

    pub fn css(&self) -> String {
        if self.blur_px == 0.0 {
            format!("opacity:{:.3}", self.opacity)
        } else {
            format!("filter:blur({:.2}px);opacity:{:.3}", self.blur_px, self.opacity)
        }
    }
}

/// What to draw this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MorphFrame {
    pub current: usize,
    pub next: usize,
    pub outgoing: LayerStyle,
    pub incoming: LayerStyle,
}

#[derive(Debug, Clone)]
pub struct TextMorph {
    texts: Vec<MorphText>,
    morph_time: f64,
    cooldown_time: f64,
    text_index: usize,
    morph: f64,
    cooldown: f64,
    frame: MorphFrame,
}

impl TextMorph {
    pub fn new(texts: Vec<MorphText>) -> Self {
        Self::with_timing(texts, MORPH_TIME_S, COOLDOWN_TIME_S)
    }

    pub fn with_timing(texts: Vec<MorphText>, morph_time: f64, cooldown_time: f64) -> Self {
        let len = texts.len().max(1);
        Self {
            texts,
            morph_time,
            cooldown_time,
            text_index: 0,
            morph: 0.0,
            cooldown: cooldown_time,
            frame: MorphFrame {
                current: 0,
                next: 1 % len,
                outgoing: LayerStyle::SHOWN,
                incoming: LayerStyle::HIDDEN,
            },
        }
    }

    pub fn texts(&self) -> &[MorphText] {
        &self.texts
    }

    pub fn frame(&self) -> &MorphFrame {
        &self.frame
    }

    /// Advance by `dt` seconds.
    pub fn step(&mut self, dt: f64) -> &MorphFrame {
        if self.texts.len() < 2 {
            return &self.frame;
        }

        self.cooldown -= dt;
        if self.cooldown <= 0.0 {
            self.morph_step();
        } else {
            self.rest();
        }
        &self.frame
    }

    fn morph_step(&mut self) {
        // cooldown is zero or negative here, so this accumulates elapsed time
        self.morph -= self.cooldown;
        self.cooldown = 0.0;

        let progress = self.morph / self.morph_time;
        if progress > 1.0 {
            // The incoming text is fully shown, so resting on the next pair
            // draws the same thing and restarts the morph from zero.
            self.cooldown = self.cooldown_time;
            self.text_index += 1;
            self.rest();
            return;
        }

        self.frame.incoming = LayerStyle::at(progress);
        self.frame.outgoing = LayerStyle::at(1.0 - progress);
    }

    fn rest(&mut self) {
        self.morph = 0.0;
        let len = self.texts.len();
        self.frame = MorphFrame {
            current: self.text_index % len,
            next: (self.text_index + 1) % len,
            outgoing: LayerStyle::SHOWN,
            incoming: LayerStyle::HIDDEN,
        };
    }
}
