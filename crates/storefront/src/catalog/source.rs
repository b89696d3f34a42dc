//! Catalog data provenance strategies.
//!
//! The engine fetches raw menu rows through the [`MenuSource`] trait and
//! decides at construction time which strategy backs it: the bundled
//! fallback dataset or the live Supabase query capability. Both hand back
//! the same raw row shape; normalization happens downstream.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::catalog::filter::MenuFilter;
use crate::config::SupabaseConfig;
use crate::error::CatalogError;

/// Bundled dataset used when no live source is configured.
const FALLBACK_JSON: &str = include_str!("fallback_data.json");

/// Name of the remote collection holding menu rows.
const MENU_TABLE: &str = "menu_items";

/// A capability that yields raw menu rows for a filter.
///
/// Implementations push the filter down to the backend where possible, but
/// make no guarantee every option was honored; the catalog source re-applies
/// the filter after normalization.
pub trait MenuSource: Send + Sync {
    /// Fetch raw rows as a JSON array.
    fn fetch_raw(
        &self,
        filter: &MenuFilter,
    ) -> impl Future<Output = Result<Value, CatalogError>> + Send;
}

// =============================================================================
// StaticMenuSource
// =============================================================================

/// Fallback strategy over a bundled JSON dataset.
#[derive(Debug, Clone)]
pub struct StaticMenuSource {
    raw: Arc<str>,
}

impl StaticMenuSource {
    /// Source backed by the dataset shipped with the crate.
    #[must_use]
    pub fn bundled() -> Self {
        Self::from_json(FALLBACK_JSON)
    }

    /// Source backed by caller-supplied JSON (used by tests and previews).
    #[must_use]
    pub fn from_json(raw: &str) -> Self {
        Self { raw: Arc::from(raw) }
    }

    /// Filter raw rows on their backend field names, mirroring what the live
    /// query would have done server-side.
    fn apply_raw_filter(rows: &[Value], filter: &MenuFilter) -> Vec<Value> {
        let matched = rows.iter().filter(|row| {
            if let Some(category) = &filter.category
                && row.get("category").and_then(Value::as_str) != Some(category)
            {
                return false;
            }
            if let Some(available) = filter.is_available
                && row.get("is_available").and_then(Value::as_bool) != Some(available)
            {
                return false;
            }
            true
        });
        match filter.limit {
            Some(limit) => matched.take(limit).cloned().collect(),
            None => matched.cloned().collect(),
        }
    }
}

impl MenuSource for StaticMenuSource {
    async fn fetch_raw(&self, filter: &MenuFilter) -> Result<Value, CatalogError> {
        let parsed: Value = serde_json::from_str(&self.raw)
            .map_err(|e| CatalogError::SourceUnavailable(format!("fallback dataset: {e}")))?;
        let rows = parsed.as_array().ok_or(CatalogError::MalformedInput)?;
        Ok(Value::Array(Self::apply_raw_filter(rows, filter)))
    }
}

// =============================================================================
// SupabaseMenuSource
// =============================================================================

/// Live strategy querying the Supabase PostgREST read interface.
///
/// Responses are cached for 5 minutes, keyed by the filter.
#[derive(Clone)]
pub struct SupabaseMenuSource {
    inner: Arc<SupabaseSourceInner>,
}

struct SupabaseSourceInner {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    cache: Cache<String, Value>,
}

impl SupabaseMenuSource {
    /// Create a new live menu source.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let endpoint = format!("{}/rest/v1/{MENU_TABLE}", config.project_url);

        Self {
            inner: Arc::new(SupabaseSourceInner {
                client: reqwest::Client::new(),
                endpoint,
                api_key: config.anon_key.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// PostgREST query parameters for a filter: equality filters on category
    /// and availability, a row limit, ascending-by-name ordering.
    fn query_params(filter: &MenuFilter) -> Vec<(String, String)> {
        let mut params = vec![
            ("select".to_string(), "*".to_string()),
            ("order".to_string(), "name.asc".to_string()),
        ];
        if let Some(category) = &filter.category {
            params.push(("category".to_string(), format!("eq.{category}")));
        }
        if let Some(available) = filter.is_available {
            params.push(("is_available".to_string(), format!("eq.{available}")));
        }
        if let Some(limit) = filter.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

impl MenuSource for SupabaseMenuSource {
    #[instrument(skip(self), fields(filter = %filter.cache_key()))]
    async fn fetch_raw(&self, filter: &MenuFilter) -> Result<Value, CatalogError> {
        let cache_key = filter.cache_key();

        if let Some(rows) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for menu rows");
            return Ok(rows);
        }

        let response = self
            .inner
            .client
            .get(&self.inner.endpoint)
            .query(&Self::query_params(filter))
            .header("apikey", &self.inner.api_key)
            .bearer_auth(&self.inner.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Supabase returned non-success status"
            );
            return Err(CatalogError::SourceUnavailable(format!(
                "HTTP {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let rows: Value = response.json().await?;
        self.inner.cache.insert(cache_key, rows.clone()).await;
        Ok(rows)
    }
}
