//! First-load preloader machinery.
//!
//! Two independent pieces gate the initial render: [`PreloaderGate`] decides
//! from a session-scoped cached record whether the warm-up screen shows at
//! all, and [`AssetPreloadTracker`] aggregates the asset warm-up into one
//! progress value. Neither affects catalog or cart correctness.

pub mod gate;
pub mod tracker;

pub use gate::{MemorySessionStore, PRELOADER_CACHE_KEY, PreloaderGate, SessionStore};
pub use tracker::{AssetLoader, AssetPreloadTracker, HttpAssetLoader, PreloadProgress};

use std::time::Duration;

use tokio::time::Instant;

/// Minimum time the warm-up screen stays visible once shown.
///
/// A presentation decision, not a correctness one: the floor applies even
/// when data and assets finish early, and on the error path as well, but
/// never extends past itself.
pub const MIN_PRELOADER_DISPLAY: Duration = Duration::from_millis(2500);

/// Sleep out whatever remains of the display floor.
///
/// Always runs to completion relative to `shown_at`; returns immediately if
/// the floor has already elapsed.
pub async fn hold_minimum_display(shown_at: Instant) {
    tokio::time::sleep_until(shown_at + MIN_PRELOADER_DISPLAY).await;
}
