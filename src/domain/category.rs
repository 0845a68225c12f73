use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

/// Categories seeded on initialization. Insertion order fixes their ids,
/// so a fresh ledger always has Food = 1 through Miscellaneous = 6.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Food",
    "Transportation",
    "Utilities",
    "Entertainment",
    "Shopping",
    "Miscellaneous",
];

/// A named spending bucket. Categories are never renamed or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub category_name: String,
}

impl Category {
    pub fn new(category_id: CategoryId, category_name: impl Into<String>) -> Self {
        Self {
            category_id,
            category_name: category_name.into(),
        }
    }

    /// Case-insensitive name comparison, so "food" selects "Food".
    pub fn matches_name(&self, name: &str) -> bool {
        self.category_name.eq_ignore_ascii_case(name.trim())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.category_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_categories_are_unique() {
        let names: HashSet<_> = DEFAULT_CATEGORIES.iter().collect();
        assert_eq!(names.len(), DEFAULT_CATEGORIES.len());
    }

    #[test]
    fn test_matches_name_ignores_case_and_padding() {
        let category = Category::new(1, "Food");
        assert!(category.matches_name("food"));
        assert!(category.matches_name(" FOOD "));
        assert!(!category.matches_name("Foods"));
    }
}
