//! Asset warm-up tracking.
//!
//! Fans out one load task per logical asset, joins all settlements (success
//! and failure both count), and aggregates them into a single 0-100 progress
//! value published through a `watch` channel. Individual failures never fail
//! the batch; a cross-invocation satisfied set prevents counting the same
//! URL twice when the caller re-invokes with an overlapping set.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::AssetLoadError;

/// A capability that warms one asset by URL.
pub trait AssetLoader: Send + Sync + 'static {
    /// Load the asset, resolving when it has settled.
    fn load(&self, url: String) -> impl Future<Output = Result<(), AssetLoadError>> + Send;
}

/// [`AssetLoader`] that warms assets over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpAssetLoader {
    client: reqwest::Client,
}

impl HttpAssetLoader {
    /// Loader with a fresh HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssetLoader for HttpAssetLoader {
    async fn load(&self, url: String) -> Result<(), AssetLoadError> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AssetLoadError {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssetLoadError {
                url,
                reason: format!("HTTP {status}"),
            });
        }

        // Drain the body so the bytes are actually fetched into cache.
        response.bytes().await.map_err(|e| AssetLoadError {
            url,
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

/// Aggregated warm-up progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloadProgress {
    /// Assets that have settled (loaded or failed).
    pub settled: usize,
    /// Logical assets requested in this tracking session.
    pub total: usize,
    /// False once every requested asset has settled.
    pub is_loading: bool,
}

impl PreloadProgress {
    /// Progress before any tracking session has started.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            settled: 0,
            total: 0,
            is_loading: false,
        }
    }

    /// Percentage in 0-100. An empty session reports 100.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Asset counts are tiny
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.settled as f64 / self.total as f64 * 100.0
        }
    }
}

/// Tracks warm-up of a set of asset URLs.
///
/// Progress is monotonically non-decreasing within one tracking session and
/// observable through [`subscribe`](Self::subscribe).
pub struct AssetPreloadTracker<L: AssetLoader> {
    loader: Arc<L>,
    satisfied: Mutex<HashSet<String>>,
    progress: watch::Sender<PreloadProgress>,
}

impl<L: AssetLoader> AssetPreloadTracker<L> {
    /// Tracker over an injected loader.
    pub fn new(loader: L) -> Self {
        let (progress, _) = watch::channel(PreloadProgress::idle());
        Self {
            loader: Arc::new(loader),
            satisfied: Mutex::new(HashSet::new()),
            progress,
        }
    }

    /// Watch the aggregated progress.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PreloadProgress> {
        self.progress.subscribe()
    }

    /// Warm every asset in `urls` exactly once and await all settlements.
    ///
    /// Duplicates collapse to one logical asset. When `should_preload` is
    /// false or the set is empty, reports 100 / not-loading immediately.
    /// URLs already satisfied by a prior invocation count without a reload.
    pub async fn preload(&self, urls: &[String], should_preload: bool) -> PreloadProgress {
        let mut seen = HashSet::new();
        let unique: Vec<String> = urls
            .iter()
            .filter(|url| seen.insert(url.as_str()))
            .cloned()
            .collect();

        if !should_preload || unique.is_empty() {
            let done = PreloadProgress::idle();
            self.progress.send_replace(done);
            return done;
        }

        let total = unique.len();
        let mut settled = 0;
        self.publish(settled, total);

        let mut tasks = JoinSet::new();
        for url in unique {
            if self.lock_satisfied().contains(&url) {
                settled += 1;
                self.publish(settled, total);
                continue;
            }
            let loader = Arc::clone(&self.loader);
            tasks.spawn(async move {
                let outcome = loader.load(url.clone()).await;
                (url, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            settled += 1;
            match joined {
                Ok((url, Ok(()))) => {
                    self.lock_satisfied().insert(url);
                }
                Ok((url, Err(err))) => {
                    // Failure still settles the asset; the batch goes on.
                    debug!(url = %url, error = %err, "Asset preload failed");
                }
                Err(err) => {
                    warn!(error = %err, "Asset preload task panicked");
                }
            }
            self.publish(settled, total);
        }

        PreloadProgress {
            settled,
            total,
            is_loading: false,
        }
    }

    fn publish(&self, settled: usize, total: usize) {
        self.progress.send_replace(PreloadProgress {
            settled,
            total,
            is_loading: settled < total,
        });
    }

    fn lock_satisfied(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.satisfied.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
