//! Cha Sha Core - Shared types library.
//!
//! This crate provides the domain types shared across the Cha Sha storefront
//! components:
//! - `storefront` - Menu catalog, cart, and checkout engine
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps it
//! lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Menu item value types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
