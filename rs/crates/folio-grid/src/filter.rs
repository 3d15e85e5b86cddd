use std::sync::Arc;

use crate::model::{Category, Item};
use crate::selector::{class_selector, matches, MATCH_ALL};

/// Active category plus the full item collection.
///
/// The collection is shared (`Arc<[Item]>`): a new allocation means the set
/// of items changed, which is what the masonry arranger keys re-init on.
#[derive(Debug, Clone)]
pub struct FilterState {
    items: Arc<[Item]>,
    active: Category,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self { items: Arc::from(Vec::new()), active: Category::All }
    }

    pub fn items(&self) -> &Arc<[Item]> {
        &self.items
    }

    pub(crate) fn set_items(&mut self, items: Arc<[Item]>) {
        self.items = items;
    }

    pub fn active(&self) -> &Category {
        &self.active
    }

    /// Replace the active category. Any value is accepted.
    ///
    /// Crate-private: the store pairs this with collapsing the expanded item.
    pub(crate) fn set_active_category(&mut self, category: Category) {
        self.active = category;
    }

    /// `*` for `All`, otherwise `.token`.
    pub fn filter_selector(&self) -> String {
        match &self.active {
            Category::All => MATCH_ALL.to_string(),
            other => class_selector(other.label()),
        }
    }

    pub fn is_visible(&self, item: &Item) -> bool {
        matches(&self.filter_selector(), &item.class_token())
    }

    pub fn visible(&self) -> impl Iterator<Item = &Item> + '_ {
        let selector = self.filter_selector();
        self.items
            .iter()
            .filter(move |item| matches(&selector, &item.class_token()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FilterState {
        let mut state = FilterState::new();
        state.set_items(Arc::from(vec![
            Item::new(1, "Orbit").with_category(Category::Interactive),
            Item::new(2, "Print").with_category(Category::Static),
            Item::new(3, "Lab").with_category(Category::Rnd),
            Item::new(4, "Untitled"),
        ]));
        state
    }

    #[test]
    fn test_all_matches_everything() {
        let state = sample();
        assert_eq!(state.filter_selector(), "*");
        assert_eq!(state.visible().count(), 4);
    }

    #[test]
    fn test_category_selector() {
        let mut state = sample();
        state.set_active_category(Category::Rnd);
        assert_eq!(state.filter_selector(), ".rand");
        let titles: Vec<&str> = state.visible().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Lab"]);
    }

    #[test]
    fn test_unknown_category_yields_empty_view() {
        let mut state = sample();
        state.set_active_category(Category::Other("Sculpture".into()));
        assert_eq!(state.filter_selector(), ".sculpture");
        assert_eq!(state.visible().count(), 0);
    }
}
