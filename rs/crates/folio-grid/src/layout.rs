//! Deterministic per-item spacing.
//!
//! Every grid item gets a slightly different bottom margin and trailing
//! padding so the masonry columns look hand-placed. The values are derived
//! from the item id alone, so a re-render or a re-fetch of the same item
//! never moves it.

use std::fmt;

/// Spacing for one grid item, in rem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutHint {
    pub margin_bottom: f64,
    pub padding_edge: f64,
}

impl LayoutHint {
    /// Inline style for the item element.
    pub fn style(&self) -> String {
        format!(
            "margin-bottom:{:.2}rem;padding-right:{:.2}rem",
            self.margin_bottom, self.padding_edge
        )
    }
}

const MARGIN_BASE: f64 = 2.0;
const MARGIN_SPAN: f64 = 3.0;
const PADDING_BASE: f64 = 1.0;
const PADDING_SPAN: f64 = 2.0;

/// Multiplier for the second fraction. A third fraction needs its own.
const PADDING_MULTIPLIER: u64 = 31;

/// Additive character-code hash of the id's string form (UTF-16 units).
pub fn seed_of(id: &str) -> u64 {
    id.encode_utf16().map(u64::from).sum()
}

fn fractions(seed: u64) -> (f64, f64) {
    let r1 = (seed % 100) as f64 / 100.0;
    let r2 = (seed.wrapping_mul(PADDING_MULTIPLIER) % 100) as f64 / 100.0;
    (r1, r2)
}

/// Spacing for `id`: margin in 2–5 rem and padding in 1–3 rem at scale 1.
pub fn generate_layout(id: impl fmt::Display, scale_factor: f64) -> LayoutHint {
    let (r1, r2) = fractions(seed_of(&id.to_string()));
    LayoutHint {
        margin_bottom: MARGIN_BASE + r1 * MARGIN_SPAN * scale_factor,
        padding_edge: PADDING_BASE + r2 * PADDING_SPAN * scale_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemId;

    #[test]
    fn test_same_input_same_output() {
        for id in ["1", "42", "project-7", "지희", ""] {
            for scale in [0.5, 1.0, 2.0] {
                let a = generate_layout(id, scale);
                let b = generate_layout(id, scale);
                assert_eq!(a.margin_bottom.to_bits(), b.margin_bottom.to_bits());
                assert_eq!(a.padding_edge.to_bits(), b.padding_edge.to_bits());
            }
        }
    }

    #[test]
    fn test_integer_and_string_ids_agree() {
        assert_eq!(generate_layout(ItemId::Int(17), 1.0), generate_layout("17", 1.0));
    }

    #[test]
    fn test_seed_is_char_code_sum() {
        // '1' = 49, '2' = 50
        assert_eq!(seed_of("12"), 99);
        assert_eq!(seed_of(""), 0);
    }

    #[test]
    fn test_known_values() {
        // seed 99: r1 = 0.99, r2 = (99 * 31) % 100 / 100 = 0.69
        let hint = generate_layout("12", 1.0);
        assert!((hint.margin_bottom - (2.0 + 0.99 * 3.0)).abs() < 1e-9);
        assert!((hint.padding_edge - (1.0 + 0.69 * 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_fractions_are_distinct_formulas() {
        let differing = (0u64..100).filter(|s| {
            let (r1, r2) = fractions(*s);
            r1 != r2
        });
        assert!(differing.count() > 0);
    }

    #[test]
    fn test_ranges_at_unit_scale() {
        for n in 0..500 {
            let hint = generate_layout(n, 1.0);
            assert!((2.0..5.0).contains(&hint.margin_bottom));
            assert!((1.0..3.0).contains(&hint.padding_edge));
        }
    }

    #[test]
    fn test_style_formatting() {
        let hint = LayoutHint { margin_bottom: 2.5, padding_edge: 1.25 };
        assert_eq!(hint.style(), "margin-bottom:2.50rem;padding-right:1.25rem");
    }
}
