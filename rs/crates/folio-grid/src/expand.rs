use serde::{Deserialize, Serialize};

use crate::model::{Item, ItemId};

/// Bounding box in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpandSide {
    Left,
    Right,
    Center,
}

impl ExpandSide {
    pub fn class(&self) -> &'static str {
        match self {
            ExpandSide::Left => "expanded-left",
            ExpandSide::Right => "expanded-right",
            ExpandSide::Center => "expanded-center",
        }
    }
}

/// Which item is blown up, and toward which side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpansionState {
    pub expanded_item_id: Option<ItemId>,
    pub expanded_side: Option<ExpandSide>,
}

/// Result of clicking a grid item.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Item has its own page.
    NavigateToDetail(String),
    /// Item points elsewhere; open in a new browsing context.
    OpenExternal(String),
    Expanded { id: ItemId, side: ExpandSide },
    Collapsed,
}

/// Side an item should grow toward, judged by where its trailing edge sits
/// relative to the middle of the grid.
pub fn expand_side(element: Rect, grid: Rect) -> ExpandSide {
    let mid = grid.left + grid.width / 2.0;
    let edge = element.right();
    if edge < mid {
        ExpandSide::Left
    } else if edge > mid {
        ExpandSide::Right
    } else {
        ExpandSide::Center
    }
}

#[derive(Debug, Default)]
pub struct ExpandableItemController {
    state: ExpansionState,
}

impl ExpandableItemController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ExpansionState {
        &self.state
    }

    pub fn is_expanded(&self, id: &ItemId) -> bool {
        self.state.expanded_item_id.as_ref() == Some(id)
    }

    pub fn handle_item_click(&mut self, item: &Item, clicked: Rect, grid: Rect) -> ClickOutcome {
        if item.has_detail_content {
            return ClickOutcome::NavigateToDetail(item.detail_key());
        }
        if let Some(link) = item.primary_link() {
            return ClickOutcome::OpenExternal(link.url.clone());
        }

        if self.is_expanded(&item.id) {
            self.collapse();
            return ClickOutcome::Collapsed;
        }

        let side = expand_side(clicked, grid);
        self.state = ExpansionState {
            expanded_item_id: Some(item.id.clone()),
            expanded_side: Some(side),
        };
        ClickOutcome::Expanded { id: item.id.clone(), side }
    }

    pub fn collapse(&mut self) {
        self.state = ExpansionState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinkKind;

    fn grid() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 2000.0)
    }

    #[test]
    fn test_side_from_trailing_edge() {
        assert_eq!(expand_side(Rect::new(100.0, 0.0, 300.0, 200.0), grid()), ExpandSide::Left);
        assert_eq!(expand_side(Rect::new(400.0, 0.0, 300.0, 200.0), grid()), ExpandSide::Right);
        assert_eq!(expand_side(Rect::new(0.0, 0.0, 500.0, 200.0), grid()), ExpandSide::Center);
    }

    #[test]
    fn test_side_respects_grid_offset() {
        let offset = Rect::new(200.0, 0.0, 1000.0, 2000.0);
        // midpoint at 700
        assert_eq!(expand_side(Rect::new(300.0, 0.0, 300.0, 100.0), offset), ExpandSide::Left);
        assert_eq!(expand_side(Rect::new(500.0, 0.0, 300.0, 100.0), offset), ExpandSide::Right);
    }

    #[test]
    fn test_detail_items_navigate() {
        let mut ctl = ExpandableItemController::new();
        let item = Item::new(3, "Orbit").with_detail("abc123");
        let out = ctl.handle_item_click(&item, Rect::default(), grid());
        assert_eq!(out, ClickOutcome::NavigateToDetail("abc123".into()));
        assert_eq!(ctl.state(), &ExpansionState::default());
    }

    #[test]
    fn test_external_link_opens_first_in_priority() {
        let mut ctl = ExpandableItemController::new();
        let item = Item::new(4, "Clip")
            .with_link(LinkKind::Youtube, "https://youtu.be/x")
            .with_link(LinkKind::Github, "https://github.com/y");
        let out = ctl.handle_item_click(&item, Rect::new(0.0, 0.0, 100.0, 100.0), grid());
        assert_eq!(out, ClickOutcome::OpenExternal("https://youtu.be/x".into()));
        assert!(ctl.state().expanded_item_id.is_none());
        assert!(ctl.state().expanded_side.is_none());
    }

    #[test]
    fn test_toggle_and_switch() {
        let mut ctl = ExpandableItemController::new();
        let a = Item::new(1, "a");
        let b = Item::new(2, "b");
        let right = Rect::new(600.0, 0.0, 100.0, 100.0);

        assert_eq!(
            ctl.handle_item_click(&a, right, grid()),
            ClickOutcome::Expanded { id: ItemId::Int(1), side: ExpandSide::Right }
        );
        assert_eq!(
            ctl.handle_item_click(&b, Rect::new(0.0, 0.0, 100.0, 100.0), grid()),
            ClickOutcome::Expanded { id: ItemId::Int(2), side: ExpandSide::Left }
        );
        assert!(ctl.is_expanded(&ItemId::Int(2)));
        assert_eq!(ctl.handle_item_click(&b, right, grid()), ClickOutcome::Collapsed);
        assert_eq!(ctl.state(), &ExpansionState::default());
    }
}
