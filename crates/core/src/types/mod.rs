//! Core types for the Cha Sha storefront.

pub mod menu_item;

pub use menu_item::{MenuItem, MenuItemError};
