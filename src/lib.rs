//! # fp-cookie
//!
//! Browser client fingerprint compiled to WebAssembly.
//!
//! On load the module reads five page attributes, hashes them with SHA-256
//! and stores the hex digest in the `fp` cookie:
//!
//! ```text
//! navigator.userAgent | navigator.language | screen WxH | timeZone | navigator.platform
//!   ↓ SHA-256 (crypto.subtle)
//! fp=<64 hex chars>; path=/; SameSite=Lax
//! ```
//!
//! The same operation is exported for host code that wants to await it:
//!
//! ```javascript
//! import init, { generate_fingerprint, current_fingerprint } from './pkg/fp_cookie.js';
//! await init();                             // also writes the cookie once
//! const fp = await generate_fingerprint();  // rejects on failure
//! current_fingerprint() === fp;             // read back from document.cookie
//! ```

use sha2::{Digest, Sha256};
use wasm_bindgen::prelude::*;

pub mod config;
pub mod cookie;
pub mod environment;
mod error;
pub mod fingerprint;

pub use config::{DigestBackend, GeneratorConfig, DEFAULT_COOKIE_NAME};
pub use cookie::{
    read_cookie, Cookie, CookieAttributes, CookieReader, CookieWriter, DocumentCookieWriter,
    MemoryCookieJar, SameSite,
};
pub use environment::{BrowserEnvironment, EnvironmentReader, StaticEnvironment};
pub use error::{ErrorCode, ErrorInfo, FingerprintError, Result};
pub use fingerprint::{
    fingerprint_from_string, AttributeVector, DigestProvider, FingerprintGenerator,
    HexFingerprint, ScreenSize, Sha256Digest, SubtleCryptoDigest,
};

/// Initialize logging and write the fingerprint cookie.
///
/// Runs automatically when the module is instantiated. Failures are logged
/// and otherwise dropped; call [`generate_fingerprint`] to observe them.
#[wasm_bindgen(start)]
pub fn init() {
    let config = GeneratorConfig::default();
    init_logging(&config);

    log::debug!("fp-cookie initialized");

    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = run(&config).await {
            log::warn!("fingerprint not written: {}", e);
        }
    });
}

fn init_logging(config: &GeneratorConfig) {
    let level = config.level().unwrap_or(log::Level::Info);
    // Already initialized on repeat calls
    let _ = console_log::init_with_level(level);
}

/// Generate the fingerprint with the browser environment and write the
/// cookie described by `config`.
pub async fn run(config: &GeneratorConfig) -> Result<HexFingerprint> {
    let environment = BrowserEnvironment::new()?;
    let digest: Box<dyn DigestProvider> = match config.digest {
        DigestBackend::WebCrypto => Box::new(SubtleCryptoDigest::new()?),
        DigestBackend::Native => Box::new(Sha256Digest),
    };
    let cookies = DocumentCookieWriter::new()?;

    FingerprintGenerator::with_config(environment, digest, cookies, config)
        .generate()
        .await
}

/// Generate and store the fingerprint with the default configuration.
///
/// Resolves to the 64-character hex fingerprint.
#[wasm_bindgen]
pub async fn generate_fingerprint() -> std::result::Result<String, JsValue> {
    let fingerprint = run(&GeneratorConfig::default()).await?;
    Ok(fingerprint.into_string())
}

/// Generate and store the fingerprint with a partial options object:
///
/// ```javascript
/// await generate_fingerprint_with({ digest: "native", same_site: "Strict" });
/// ```
#[wasm_bindgen]
pub async fn generate_fingerprint_with(options: JsValue) -> std::result::Result<String, JsValue> {
    let config = GeneratorConfig::from_js(options)?;
    init_logging(&config);
    config.apply_log_level()?;
    let fingerprint = run(&config).await?;
    Ok(fingerprint.into_string())
}

/// Read the current `fp` cookie, if set.
#[wasm_bindgen]
pub fn current_fingerprint() -> Option<String> {
    DocumentCookieWriter::new()
        .and_then(|cookies| cookies.read(DEFAULT_COOKIE_NAME))
        .ok()
        .flatten()
}

/// Hash an arbitrary joined attribute string with the pure Rust digest.
///
/// Lets host code verify a cookie value against known attributes.
#[wasm_bindgen]
pub fn fingerprint_of(joined: &str) -> std::result::Result<String, JsValue> {
    let fingerprint = HexFingerprint::from_digest(&Sha256::digest(joined.as_bytes()))?;
    Ok(fingerprint.into_string())
}
