//! Collapse view-state
//!
//! Which categories are folded in terminal output. This is owned by the
//! presentation layer and handed to the formatters as a plain argument; the
//! calculation engine never reads it.

use std::collections::HashSet;

use crate::models::{CategoryId, ExpenseCategory};

/// Set of collapsed categories; anything not listed is expanded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    collapsed: HashSet<CategoryId>,
}

impl CollapseState {
    /// Everything expanded
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the categories' persisted flags
    pub fn from_categories(categories: &[ExpenseCategory]) -> Self {
        Self {
            collapsed: categories
                .iter()
                .filter(|c| c.collapsed)
                .map(|c| c.id.clone())
                .collect(),
        }
    }

    /// Whether a category is collapsed
    pub fn is_collapsed(&self, id: &CategoryId) -> bool {
        self.collapsed.contains(id)
    }

    /// Flip a category and return its new collapsed state
    pub fn toggle(&mut self, id: &CategoryId) -> bool {
        if self.collapsed.remove(id) {
            false
        } else {
            self.collapsed.insert(id.clone());
            true
        }
    }

    /// Set a category's state explicitly
    pub fn set(&mut self, id: &CategoryId, collapsed: bool) {
        if collapsed {
            self.collapsed.insert(id.clone());
        } else {
            self.collapsed.remove(id);
        }
    }

    /// Expand every category
    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_expanded() {
        let state = CollapseState::new();
        assert!(!state.is_collapsed(&CategoryId::from("rent")));
    }

    #[test]
    fn test_toggle_is_independent() {
        let mut state = CollapseState::new();
        let rent = CategoryId::from("rent");
        let food = CategoryId::from("food");

        assert!(state.toggle(&rent));
        assert!(state.is_collapsed(&rent));
        assert!(!state.is_collapsed(&food));

        assert!(!state.toggle(&rent));
        assert!(!state.is_collapsed(&rent));
    }

    #[test]
    fn test_seeded_from_categories() {
        let mut folded = ExpenseCategory::new("Folded");
        folded.collapsed = true;
        let open = ExpenseCategory::new("Open");
        let state = CollapseState::from_categories(&[folded.clone(), open.clone()]);
        assert!(state.is_collapsed(&folded.id));
        assert!(!state.is_collapsed(&open.id));
    }

    #[test]
    fn test_set_and_expand_all() {
        let mut state = CollapseState::new();
        let id = CategoryId::shared();
        state.set(&id, true);
        assert!(state.is_collapsed(&id));
        state.expand_all();
        assert!(!state.is_collapsed(&id));
    }
}
