//! Pointer-reactive hero styling.
//!
//! A smoothed pointer position eases toward the last reported pointer over
//! [`FOLLOW_TIME_S`]. Its distance from the viewport centre drives a text
//! shadow that falls away from the pointer and a slight skew.

use serde::{Deserialize, Serialize};

pub const FOLLOW_TIME_S: f64 = 0.8;

const BASE_OFFSET_X: f64 = 2.0;
const BASE_OFFSET_Y: f64 = 3.0;
const MAX_OFFSET_INCREASE: f64 = 20.0;

/// Pointer position in client coordinates, with the viewport it was
/// measured in.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReactiveStyle {
    pub blur_px: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub skew_deg: f64,
}

impl ReactiveStyle {
    pub fn css(&self) -> String {
        format!(
            "--text-shadow-blur-radius:{:.2}px;--text-shadow-offset-x:{:.2}px;\
             --text-shadow-offset-y:{:.2}px;transform:skew({:.2}deg)",
            self.blur_px, self.offset_x, self.offset_y, self.skew_deg
        )
    }
}

#[derive(Debug, Clone)]
pub struct MouseFollow {
    max_blur: f64,
    max_skew: f64,
    viewport: Option<(f64, f64)>,
    from: (f64, f64),
    to: (f64, f64),
    position: (f64, f64),
    elapsed: f64,
}

impl MouseFollow {
    pub fn new(max_blur: f64, max_skew: f64) -> Self {
        Self {
            max_blur,
            max_skew,
            viewport: None,
            from: (0.0, 0.0),
            to: (0.0, 0.0),
            position: (0.0, 0.0),
            elapsed: FOLLOW_TIME_S,
        }
    }

    /// Blurred shadow and up to 3 degrees of skew.
    pub fn hero() -> Self {
        Self::new(5.0, 3.0)
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    /// Retarget. The ease restarts from wherever the smoothed position is.
    pub fn point_at(&mut self, pointer: Pointer) {
        if self.viewport.is_none() {
            self.position = (pointer.width / 2.0, pointer.height / 2.0);
        }
        self.viewport = Some((pointer.width, pointer.height));
        self.from = self.position;
        self.to = (pointer.x, pointer.y);
        self.elapsed = 0.0;
    }

    /// Advance by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        if self.elapsed >= FOLLOW_TIME_S {
            return;
        }
        self.elapsed = (self.elapsed + dt).min(FOLLOW_TIME_S);
        let t = self.elapsed / FOLLOW_TIME_S;
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        self.position = (
            self.from.0 + (self.to.0 - self.from.0) * eased,
            self.from.1 + (self.to.1 - self.from.1) * eased,
        );
    }

    pub fn style(&self) -> ReactiveStyle {
        let Some((width, height)) = self.viewport else {
            return ReactiveStyle { blur_px: 0.0, offset_x: BASE_OFFSET_X, offset_y: BASE_OFFSET_Y, skew_deg: 0.0 };
        };
        let (cx, cy) = (width / 2.0, height / 2.0);
        let (dx, dy) = (self.position.0 - cx, self.position.1 - cy);
        let distance = dx.hypot(dy);
        let max_distance = cx.hypot(cy);
        let normalized = if max_distance == 0.0 { 0.0 } else { (distance / max_distance).min(1.0) };
        let curve = normalized * normalized;

        let magnitude_x = BASE_OFFSET_X + MAX_OFFSET_INCREASE * curve;
        let magnitude_y = BASE_OFFSET_Y + MAX_OFFSET_INCREASE * curve;
        // Shadow falls away from the pointer.
        let (offset_x, offset_y) = if distance > 0.1 {
            (magnitude_x * -dx / distance, magnitude_y * -dy / distance)
        } else {
            (magnitude_x, magnitude_y)
        };

        let ratio_x = if cx == 0.0 { 0.0 } else { (dx / cx).abs() };
        let ratio_y = if cy == 0.0 { 0.0 } else { (dy / cy).abs() };
        let skew_magnitude = ratio_x.min(ratio_y);
        let skew_deg = if skew_magnitude == 0.0 {
            0.0
        } else if dx.signum() * dy.signum() >= 0.0 {
            -self.max_skew * skew_magnitude
        } else {
            self.max_skew * skew_magnitude
        };

        ReactiveStyle { blur_px: self.max_blur * curve, offset_x, offset_y, skew_deg }
    }
}
