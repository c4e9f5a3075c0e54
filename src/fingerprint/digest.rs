//! SHA-256 providers and the hex fingerprint
//!
//! Two interchangeable providers:
//! - [`SubtleCryptoDigest`]: WebCrypto `crypto.subtle.digest("SHA-256", ..)`,
//!   only present in secure contexts
//! - [`Sha256Digest`]: pure Rust `sha2`, usable anywhere (and in native tests)

use std::fmt;

use async_trait::async_trait;
use js_sys::{Reflect, Uint8Array};
use sha2::{Digest, Sha256};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::SubtleCrypto;

use crate::error::{describe_js_error, FingerprintError, Result};

/// SHA-256 output length in bytes
pub const DIGEST_LEN: usize = 32;

/// Hex fingerprint length in characters
pub const HEX_LEN: usize = DIGEST_LEN * 2;

/// WebCrypto algorithm name
pub const ALGORITHM: &str = "SHA-256";

/// Asynchronous SHA-256 primitive.
#[async_trait(?Send)]
pub trait DigestProvider {
    async fn sha256(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Pure Rust SHA-256.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

#[async_trait(?Send)]
impl DigestProvider for Sha256Digest {
    async fn sha256(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(Sha256::digest(data).to_vec())
    }
}

/// WebCrypto SHA-256 via `window.crypto.subtle`.
#[derive(Clone)]
pub struct SubtleCryptoDigest {
    subtle: SubtleCrypto,
}

impl SubtleCryptoDigest {
    /// Bind to `window.crypto.subtle`.
    ///
    /// Fails with `DigestUnavailable` outside a secure context, where
    /// browsers leave `crypto.subtle` undefined.
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or(FingerprintError::NoWindow)?;
        let crypto = window
            .crypto()
            .map_err(|e| FingerprintError::DigestUnavailable(describe_js_error(&e)))?;
        let subtle = Reflect::get(&crypto, &JsValue::from_str("subtle"))
            .map_err(|e| FingerprintError::DigestUnavailable(describe_js_error(&e)))?;
        if subtle.is_undefined() || subtle.is_null() {
            return Err(FingerprintError::DigestUnavailable(
                "crypto.subtle is undefined (non-secure context?)".into(),
            ));
        }
        Ok(Self {
            subtle: subtle.unchecked_into(),
        })
    }
}

#[async_trait(?Send)]
impl DigestProvider for SubtleCryptoDigest {
    async fn sha256(&self, data: &[u8]) -> Result<Vec<u8>> {
        let buffer = Uint8Array::from(data);
        let promise = self
            .subtle
            .digest_with_str_and_buffer_source(ALGORITHM, &buffer)
            .map_err(|e| FingerprintError::Digest(describe_js_error(&e)))?;
        let digest = JsFuture::from(promise)
            .await
            .map_err(|e| FingerprintError::Digest(describe_js_error(&e)))?;
        Ok(Uint8Array::new(&digest).to_vec())
    }
}

#[async_trait(?Send)]
impl<T: DigestProvider + ?Sized> DigestProvider for Box<T> {
    async fn sha256(&self, data: &[u8]) -> Result<Vec<u8>> {
        (**self).sha256(data).await
    }
}

/// 64 lowercase hex characters of a SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexFingerprint(String);

impl HexFingerprint {
    /// Encode a 32-byte digest.
    pub fn from_digest(digest: &[u8]) -> Result<Self> {
        if digest.len() != DIGEST_LEN {
            return Err(FingerprintError::InvalidDigestLength(digest.len()));
        }
        Ok(Self(hex::encode(digest)))
    }

    /// Validate an existing fingerprint, e.g. one read back from a cookie.
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != HEX_LEN {
            return Err(FingerprintError::InvalidFingerprint(format!(
                "expected {} characters, got {}",
                HEX_LEN,
                s.len()
            )));
        }
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(FingerprintError::InvalidFingerprint(
                "expected lowercase hex".into(),
            ));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Decoded digest bytes.
    pub fn to_bytes(&self) -> Result<[u8; DIGEST_LEN]> {
        let mut out = [0u8; DIGEST_LEN];
        hex::decode_to_slice(&self.0, &mut out)
            .map_err(|e| FingerprintError::InvalidFingerprint(e.to_string()))?;
        Ok(out)
    }

    /// First characters, for logging.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Display for HexFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HexFingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Hash an already-joined fingerprint string.
pub async fn fingerprint_from_string<D>(digest: &D, joined: &str) -> Result<HexFingerprint>
where
    D: DigestProvider + ?Sized,
{
    let bytes = digest.sha256(joined.as_bytes()).await?;
    HexFingerprint::from_digest(&bytes)
}
