//! Cha Sha Storefront library.
//!
//! This crate provides the storefront's non-UI logic as a library,
//! allowing it to be tested and reused: the menu catalog source, the order
//! cart, checkout formatting, and the first-load preloader machinery.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod preload;
