//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CHASHA_WHATSAPP_PHONE` - Destination phone number for order hand-off
//!
//! ## Optional
//! - `CHASHA_SUPABASE_URL` - Supabase project URL; when absent the catalog
//!   uses the bundled fallback dataset instead of the live source
//! - `CHASHA_SUPABASE_ANON_KEY` - Supabase anon API key (required when the
//!   URL is set)
//! - `CHASHA_WHATSAPP_BASE` - Messaging deep-link base (default: <https://wa.me>)
//! - `CHASHA_CURRENCY` - Currency code for order totals (default: AED)

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Live catalog source settings. `None` selects the bundled fallback
    /// dataset; provenance is an explicit choice made at construction time.
    pub supabase: Option<SupabaseConfig>,
    /// WhatsApp order hand-off settings.
    pub whatsapp: WhatsAppConfig,
}

/// Supabase read-only query configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g. `https://xyzcompany.supabase.co`).
    pub project_url: String,
    /// Anon API key. Sent as both `apikey` and bearer token.
    pub anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("project_url", &self.project_url)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

/// WhatsApp checkout hand-off configuration.
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    /// Destination phone number in international format, digits only.
    pub phone_number: String,
    /// Deep-link provider base URL.
    pub provider_base: String,
    /// Currency code printed on the order total line.
    pub currency: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let supabase = SupabaseConfig::from_env()?;
        let whatsapp = WhatsAppConfig::from_env()?;

        Ok(Self { supabase, whatsapp })
    }
}

impl SupabaseConfig {
    /// The live source is optional; a missing URL means "use the fallback",
    /// but a URL without a key is a configuration mistake.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(project_url) = get_optional_env("CHASHA_SUPABASE_URL") else {
            return Ok(None);
        };
        let anon_key = get_required_env("CHASHA_SUPABASE_ANON_KEY")?;

        Ok(Some(Self {
            project_url: project_url.trim_end_matches('/').to_string(),
            anon_key: SecretString::from(anon_key),
        }))
    }
}

impl WhatsAppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let phone_number = get_required_env("CHASHA_WHATSAPP_PHONE")?;
        if !phone_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidEnvVar(
                "CHASHA_WHATSAPP_PHONE".to_string(),
                "must contain digits only".to_string(),
            ));
        }

        Ok(Self {
            phone_number,
            provider_base: get_env_or_default("CHASHA_WHATSAPP_BASE", "https://wa.me"),
            currency: get_env_or_default("CHASHA_CURRENCY", "AED"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
