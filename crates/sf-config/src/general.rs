//! General application configuration.

use serde::{Deserialize, Serialize};
use sf_core::errors::Locale;

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Language of user-facing error messages.
    #[serde(default)]
    pub locale: Locale,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            locale: Locale::default(),
        }
    }
}
