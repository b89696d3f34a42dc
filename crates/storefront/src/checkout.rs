//! Checkout hand-off to the messaging channel.
//!
//! There is no payment step: checkout serializes the cart into a
//! human-readable order message and a `wa.me`-style deep link the UI opens
//! in a new browsing context. The destination number and currency are
//! configuration, not computed state.

use crate::cart::CartStore;
use crate::config::WhatsAppConfig;
use crate::error::CheckoutError;

/// A formatted order ready to hand to the URL opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHandoff {
    /// Plain-text order message.
    pub message: String,
    /// Deep link with the message URL-encoded.
    pub url: String,
}

/// Serializes cart contents into an order message and deep link.
#[derive(Debug, Clone)]
pub struct CheckoutFormatter {
    config: WhatsAppConfig,
}

impl CheckoutFormatter {
    /// Create a formatter from the WhatsApp hand-off configuration.
    #[must_use]
    pub const fn new(config: WhatsAppConfig) -> Self {
        Self { config }
    }

    /// Format the cart into an order message and deep link.
    ///
    /// One line per cart line (quantity, name, subtotal to two decimals),
    /// then a total line.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] on a cart with zero lines; no
    /// partial message is produced. Callers hide the checkout entry point
    /// while the cart is empty, but the formatter refuses regardless.
    pub fn format_order(&self, cart: &CartStore) -> Result<OrderHandoff, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order_summary = cart
            .lines()
            .iter()
            .map(|line| {
                format!(
                    "{}x {} - {} {:.2}",
                    line.quantity,
                    line.item.name,
                    line.item.currency,
                    line.subtotal()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let message = format!(
            "🍽️ New Order from Chasha Menu!\n\n📋 Order Details:\n{order_summary}\n\n💰 Total: {} {:.2}\n\nPlease confirm this order and let me know the delivery time. Thank you!",
            self.config.currency,
            cart.total()
        );

        let url = format!(
            "{}/{}?text={}",
            self.config.provider_base,
            self.config.phone_number,
            urlencoding::encode(&message)
        );

        Ok(OrderHandoff { message, url })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chasha_core::MenuItem;

    fn formatter() -> CheckoutFormatter {
        CheckoutFormatter::new(WhatsAppConfig {
            phone_number: "971561945726".to_string(),
            provider_base: "https://wa.me".to_string(),
            currency: "AED".to_string(),
        })
    }

    fn karak() -> MenuItem {
        MenuItem {
            id: "1".to_string(),
            name: "Karak".to_string(),
            description: String::new(),
            category: "CHAI".to_string(),
            price: 5.0,
            currency: "AED".to_string(),
            is_available: true,
            image: String::new(),
        }
    }

    #[test]
    fn formats_lines_and_total() {
        let mut cart = CartStore::new();
        cart.add_item(karak());
        cart.add_item(karak());

        let handoff = formatter().format_order(&cart).unwrap();
        assert!(handoff.message.contains("2x Karak - AED 10.00"));
        assert!(handoff.message.contains("Total: AED 10.00"));
    }

    #[test]
    fn empty_cart_is_refused() {
        let cart = CartStore::new();
        assert_eq!(
            formatter().format_order(&cart),
            Err(CheckoutError::EmptyCart)
        );
    }

    #[test]
    fn deep_link_encodes_the_message() {
        let mut cart = CartStore::new();
        cart.add_item(karak());

        let handoff = formatter().format_order(&cart).unwrap();
        assert!(handoff.url.starts_with("https://wa.me/971561945726?text="));
        // Newlines and spaces never appear raw in the query string.
        let query = handoff.url.split_once("text=").unwrap().1;
        assert!(!query.contains('\n'));
        assert!(!query.contains(' '));
        assert!(query.contains("1x%20Karak"));
    }

    #[test]
    fn one_line_per_cart_line() {
        let mut cart = CartStore::new();
        cart.add_item(karak());
        let mut paratha = karak();
        paratha.id = "2".to_string();
        paratha.name = "Aloo Paratha".to_string();
        paratha.price = 9.0;
        cart.add_item(paratha);
        cart.add_item({
            let mut p = karak();
            p.id = "2".to_string();
            p.name = "Aloo Paratha".to_string();
            p.price = 9.0;
            p
        });

        let handoff = formatter().format_order(&cart).unwrap();
        assert!(handoff.message.contains("1x Karak - AED 5.00"));
        assert!(handoff.message.contains("2x Aloo Paratha - AED 18.00"));
        assert!(handoff.message.contains("Total: AED 23.00"));
    }
}
