//! Catalog filter predicates.

use chasha_core::MenuItem;
use serde::{Deserialize, Serialize};

/// Recognized filter options for a catalog query.
///
/// Options are independently optional and combined by logical AND. `limit`
/// truncates the result to the first N items after filtering, in the input's
/// existing order; nothing here re-sorts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuFilter {
    /// Exact-match category label.
    pub category: Option<String>,
    /// Availability flag to require.
    pub is_available: Option<bool>,
    /// Maximum number of items to return.
    pub limit: Option<usize>,
}

impl MenuFilter {
    /// Filter requiring a category and availability, as used by the derived
    /// catalog views.
    #[must_use]
    pub fn for_category(category: impl Into<String>, limit: Option<usize>) -> Self {
        Self {
            category: Some(category.into()),
            is_available: Some(true),
            limit,
        }
    }

    /// Apply this filter over a collection of items.
    ///
    /// Pure: the output is a subset of the input preserving relative order.
    /// Empty input yields empty output.
    #[must_use]
    pub fn apply(&self, items: &[MenuItem]) -> Vec<MenuItem> {
        let filtered = items.iter().filter(|item| self.matches(item)).cloned();
        match self.limit {
            Some(limit) => filtered.take(limit).collect(),
            None => filtered.collect(),
        }
    }

    /// Whether a single item satisfies the category/availability predicates.
    #[must_use]
    pub fn matches(&self, item: &MenuItem) -> bool {
        if let Some(category) = &self.category
            && item.category != *category
        {
            return false;
        }
        if let Some(is_available) = self.is_available
            && item.is_available != is_available
        {
            return false;
        }
        true
    }

    /// Stable cache key for this filter.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "category={};available={};limit={}",
            self.category.as_deref().unwrap_or("*"),
            self.is_available.map_or_else(|| "*".to_string(), |a| a.to_string()),
            self.limit.map_or_else(|| "*".to_string(), |l| l.to_string()),
        )
    }
}
