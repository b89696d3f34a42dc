//! Menu item value type.
//!
//! A `MenuItem` is the normalized shape of one catalog entry. Raw backend
//! rows (live query or bundled fallback) are converted into this type once,
//! at the normalization boundary; afterwards it is treated as immutable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from constructing a [`MenuItem`].
#[derive(Debug, Error, PartialEq)]
pub enum MenuItemError {
    /// The display name was empty or whitespace-only.
    #[error("menu item name must not be empty")]
    EmptyName,

    /// The price was not a finite, non-negative number.
    #[error("menu item price must be a finite non-negative number, got {0}")]
    InvalidPrice(f64),
}

/// A normalized catalog entry with pricing, availability, and display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Opaque unique identifier assigned by the data source.
    pub id: String,
    /// Non-empty display name.
    pub name: String,
    /// Display description (may be truncated for display, never mutated here).
    pub description: String,
    /// Category label; the set of valid categories is owned by the backend.
    pub category: String,
    /// Currency-agnostic price magnitude. Finite and non-negative.
    pub price: f64,
    /// Short currency code (e.g. "AED").
    pub currency: String,
    /// Whether the item can currently be ordered.
    pub is_available: bool,
    /// Image URL, or empty string to signal "use placeholder" downstream.
    pub image: String,
}

impl MenuItem {
    /// Validate the invariants that normalization must uphold.
    ///
    /// # Errors
    ///
    /// Returns `MenuItemError` if the name is empty or the price is not a
    /// finite non-negative number.
    pub fn validate(&self) -> Result<(), MenuItemError> {
        if self.name.trim().is_empty() {
            return Err(MenuItemError::EmptyName);
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(MenuItemError::InvalidPrice(self.price));
        }
        Ok(())
    }

    /// Price formatted for display (e.g. "AED 12.50").
    ///
    /// Rounding to two decimals happens only here, at the presentation
    /// boundary; the stored price is never rounded.
    #[must_use]
    pub fn display_price(&self) -> String {
        format!("{} {:.2}", self.currency, self.price)
    }
}
