//! Error types for the storefront engine.
//!
//! Each concern carries its own `thiserror` enum; there is no unified
//! application error because this crate sits behind a UI that decides how
//! each failure is surfaced (catalog errors get a retry affordance, checkout
//! errors are guarded out upstream, preload failures are recovered locally).

use thiserror::Error;

/// Errors from fetching and normalizing the menu catalog.
///
/// Any of these is fatal to that fetch attempt: the item collection is reset
/// to empty and the caller may retry via `refetch`.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The raw payload was not a sequence of records.
    #[error("menu data is not an array")]
    MalformedInput,

    /// A record in the batch was missing a required field or carried an
    /// unparsable price. The whole batch is aborted on the first offender.
    #[error("invalid menu record {id}: {reason}")]
    InvalidRecord {
        /// Id of the offending record, or "?" when the id itself is missing.
        id: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The live query capability could not be reached or rejected the query.
    /// The message is passed through for display.
    #[error("menu source unavailable: {0}")]
    SourceUnavailable(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        Self::SourceUnavailable(err.to_string())
    }
}

/// Errors from formatting a checkout hand-off.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// The cart had no lines. Callers disable the checkout entry point on an
    /// empty cart, but the formatter still refuses to format nothing.
    #[error("cannot format an order for an empty cart")]
    EmptyCart,
}

/// Errors from the session-scoped key-value store backing the preloader
/// gate. Always recovered locally: reads fail open toward showing the
/// preloader, writes degrade to no-ops.
#[derive(Debug, Error)]
#[error("session store error: {0}")]
pub struct SessionStoreError(pub String);

/// A single asset failed to load during warm-up. Recovered locally: the
/// asset still counts as settled and the batch continues.
#[derive(Debug, Error)]
#[error("asset load failed for {url}: {reason}")]
pub struct AssetLoadError {
    /// URL of the asset that failed.
    pub url: String,
    /// Human-readable reason.
    pub reason: String,
}
