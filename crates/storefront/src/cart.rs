//! The order cart.
//!
//! Pure in-memory, session-scoped state: created empty, mutated only through
//! [`CartStore`] operations, discarded at session end. It is deliberately not
//! persisted across reloads (unlike the preloader gate's cached record).

use chasha_core::MenuItem;
use serde::Serialize;
use tracing::debug;

/// A menu item paired with an order quantity.
///
/// Present lines always have `quantity >= 1`; a quantity reaching zero
/// removes the line instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    /// The ordered item.
    pub item: MenuItem,
    /// How many of it.
    pub quantity: u32,
}

impl CartLine {
    /// Line subtotal: price times quantity, unrounded.
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.item.price * f64::from(self.quantity)
    }
}

/// Ordered-by-insertion collection of cart lines, unique by item id, with a
/// derived total recomputed synchronously on every mutation.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    lines: Vec<CartLine>,
    total: f64,
}

impl CartStore {
    /// A new, empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one of `item` to the cart.
    ///
    /// An existing line for the same id gains quantity; otherwise a new line
    /// is appended. Unavailable items never enter the cart: the call is a
    /// silent no-op so out-of-stock dishes cannot be ordered even if the UI
    /// let one through.
    pub fn add_item(&mut self, item: MenuItem) {
        if !item.is_available {
            debug!(item_id = %item.id, "Ignoring add of unavailable item");
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.item.id == item.id) {
            line.quantity += 1;
        } else {
            self.lines.push(CartLine { item, quantity: 1 });
        }
        self.recompute_total();
    }

    /// Set the quantity of an existing line; zero removes it.
    ///
    /// No-op if no line carries `id`.
    pub fn update_quantity(&mut self, id: &str, new_quantity: u32) {
        if new_quantity == 0 {
            self.remove_item(id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.item.id == id) {
            line.quantity = new_quantity;
            self.recompute_total();
        }
    }

    /// Remove the line carrying `id` if present; no-op otherwise.
    pub fn remove_item(&mut self, id: &str) {
        let before = self.lines.len();
        self.lines.retain(|l| l.item.id != id);
        if self.lines.len() != before {
            self.recompute_total();
        }
    }

    /// Empty all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.total = 0.0;
    }

    /// Sum of all line quantities (not the distinct line count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// The derived total: Σ(price × quantity) over present lines. Never
    /// stale; rounded only at presentation time.
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Current lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity currently in the cart for an item id, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, id: &str) -> u32 {
        self.lines
            .iter()
            .find(|l| l.item.id == id)
            .map_or(0, |l| l.quantity)
    }

    fn recompute_total(&mut self) {
        self.total = self.lines.iter().map(CartLine::subtotal).sum();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, price: f64, available: bool) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: format!("Item {id}"),
            description: String::new(),
            category: "CHAI".to_string(),
            price,
            currency: "AED".to_string(),
            is_available: available,
            image: String::new(),
        }
    }

    fn assert_invariants(cart: &CartStore) {
        assert!(cart.lines().iter().all(|l| l.quantity >= 1));
        let expected: f64 = cart.lines().iter().map(CartLine::subtotal).sum();
        assert!((cart.total() - expected).abs() < 1e-9);
    }

    #[test]
    fn add_item_aggregates_by_id() {
        let mut cart = CartStore::new();
        cart.add_item(item("1", 5.0, true));
        cart.add_item(item("1", 5.0, true));
        cart.add_item(item("2", 9.0, true));

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.quantity_of("1"), 2);
        assert_eq!(cart.item_count(), 3);
        assert!((cart.total() - 19.0).abs() < 1e-9);
        assert_invariants(&cart);
    }

    #[test]
    fn unavailable_items_never_enter_the_cart() {
        let mut cart = CartStore::new();
        cart.add_item(item("8", 22.0, false));
        assert!(cart.is_empty());
        assert!((cart.total() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn update_quantity_zero_removes_the_line() {
        let mut cart = CartStore::new();
        cart.add_item(item("1", 5.0, true));
        cart.update_quantity("1", 4);
        assert_eq!(cart.quantity_of("1"), 4);
        assert_invariants(&cart);

        cart.update_quantity("1", 0);
        assert!(cart.is_empty());
        assert_invariants(&cart);
    }

    #[test]
    fn update_and_remove_on_absent_id_are_no_ops() {
        let mut cart = CartStore::new();
        cart.add_item(item("1", 5.0, true));
        let before = cart.lines().to_vec();

        cart.update_quantity("404", 3);
        cart.remove_item("404");
        assert_eq!(cart.lines(), &before[..]);
        assert_invariants(&cart);
    }

    #[test]
    fn update_to_current_quantity_is_idempotent() {
        let mut cart = CartStore::new();
        cart.add_item(item("1", 5.0, true));
        cart.add_item(item("1", 5.0, true));
        let before = cart.lines().to_vec();
        let total_before = cart.total();

        cart.update_quantity("1", cart.quantity_of("1"));
        assert_eq!(cart.lines(), &before[..]);
        assert!((cart.total() - total_before).abs() < f64::EPSILON);
    }

    #[test]
    fn clear_empties_all_lines() {
        let mut cart = CartStore::new();
        cart.add_item(item("1", 5.0, true));
        cart.add_item(item("2", 9.0, true));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert!((cart.total() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_holds_after_arbitrary_operation_sequence() {
        let mut cart = CartStore::new();
        cart.add_item(item("1", 5.5, true));
        assert_invariants(&cart);
        cart.add_item(item("2", 12.25, true));
        assert_invariants(&cart);
        cart.update_quantity("2", 3);
        assert_invariants(&cart);
        cart.remove_item("1");
        assert_invariants(&cart);
        cart.add_item(item("3", 0.0, true));
        assert_invariants(&cart);
        cart.update_quantity("3", 0);
        assert_invariants(&cart);
        assert!((cart.total() - 36.75).abs() < 1e-9);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut cart = CartStore::new();
        cart.add_item(item("b", 1.0, true));
        cart.add_item(item("a", 2.0, true));
        cart.add_item(item("b", 1.0, true));
        let ids: Vec<&str> = cart.lines().iter().map(|l| l.item.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
