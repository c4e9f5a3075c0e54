//! Generator configuration
//!
//! Defaults reproduce the stock behavior: cookie `fp`, path `/`,
//! `SameSite=Lax`, WebCrypto digest. Host code may pass a partial JS
//! object; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use crate::cookie::{CookieAttributes, SameSite};
use crate::error::{FingerprintError, Result};

/// Name of the cookie holding the fingerprint
pub const DEFAULT_COOKIE_NAME: &str = "fp";

/// Cookie path
pub const DEFAULT_COOKIE_PATH: &str = "/";

/// Which SHA-256 implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestBackend {
    /// `crypto.subtle.digest`, unavailable outside secure contexts
    WebCrypto,
    /// Pure Rust `sha2`
    Native,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub cookie_name: String,
    pub path: String,
    pub same_site: SameSite,
    pub digest: DigestBackend,
    pub log_level: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            path: DEFAULT_COOKIE_PATH.to_string(),
            same_site: SameSite::Lax,
            digest: DigestBackend::WebCrypto,
            log_level: "info".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parse an options object passed in from JavaScript.
    ///
    /// `undefined` and `null` yield the defaults.
    pub fn from_js(options: JsValue) -> Result<Self> {
        if options.is_undefined() || options.is_null() {
            return Ok(Self::default());
        }
        let config: Self = serde_wasm_bindgen::from_value(options)
            .map_err(|e| FingerprintError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON options document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| FingerprintError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cookie_name.is_empty() {
            return Err(FingerprintError::Config("cookie_name is empty".into()));
        }
        if self
            .cookie_name
            .chars()
            .any(|c| c == '=' || c == ';' || c == ',' || c.is_whitespace() || c.is_control())
        {
            return Err(FingerprintError::Config(format!(
                "cookie_name {:?} contains a reserved character",
                self.cookie_name
            )));
        }
        if !self.path.starts_with('/') || self.path.contains(';') {
            return Err(FingerprintError::Config(format!(
                "path {:?} must start with '/' and not contain ';'",
                self.path
            )));
        }
        // Browsers drop `SameSite=None` cookies that lack `Secure`, and the
        // cookie never carries `Secure`.
        if self.same_site == SameSite::None {
            return Err(FingerprintError::Config(
                "same_site None requires the Secure flag, which is never set".into(),
            ));
        }
        self.level()?;
        Ok(())
    }

    /// Cookie attributes derived from this config.
    pub fn cookie_attributes(&self) -> CookieAttributes {
        CookieAttributes {
            path: self.path.clone(),
            same_site: self.same_site,
        }
    }

    /// Raise or lower the active log filter to `log_level`.
    ///
    /// The console logger can only be installed once per page, so later
    /// configs adjust the global max level instead.
    pub fn apply_log_level(&self) -> Result<()> {
        log::set_max_level(self.level()?.to_level_filter());
        Ok(())
    }

    /// Parsed console log level.
    pub fn level(&self) -> Result<log::Level> {
        self.log_level
            .parse()
            .map_err(|_| FingerprintError::Config(format!("unknown log_level {:?}", self.log_level)))
    }
}
