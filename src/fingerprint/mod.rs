//! Fingerprint generation
//!
//! ```text
//! EnvironmentReader ──► AttributeVector ──► "ua|lang|WxH|tz|platform"
//!                                                   │
//!                                         DigestProvider (SHA-256, async)
//!                                                   │
//!                          CookieWriter ◄── HexFingerprint (64 hex chars)
//! ```
//!
//! The digest is the only suspension point. A failure at any step returns
//! before the cookie is written.

pub mod attributes;
pub mod digest;

pub use attributes::{AttributeVector, ScreenSize, SEPARATOR};
pub use digest::{
    fingerprint_from_string, DigestProvider, HexFingerprint, Sha256Digest, SubtleCryptoDigest,
    DIGEST_LEN, HEX_LEN,
};

use crate::config::{GeneratorConfig, DEFAULT_COOKIE_NAME};
use crate::cookie::{CookieAttributes, CookieWriter};
use crate::environment::EnvironmentReader;
use crate::error::Result;

/// Reads the environment, hashes it and stores the result in a cookie.
pub struct FingerprintGenerator<E, D, C> {
    environment: E,
    digest: D,
    cookies: C,
    cookie_name: String,
    attributes: CookieAttributes,
}

impl<E, D, C> FingerprintGenerator<E, D, C>
where
    E: EnvironmentReader,
    D: DigestProvider,
    C: CookieWriter,
{
    /// Generator writing `fp=<hex>; path=/; SameSite=Lax`.
    pub fn new(environment: E, digest: D, cookies: C) -> Self {
        Self {
            environment,
            digest,
            cookies,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            attributes: CookieAttributes::default(),
        }
    }

    /// Generator using the cookie name and attributes from `config`.
    pub fn with_config(environment: E, digest: D, cookies: C, config: &GeneratorConfig) -> Self {
        Self {
            environment,
            digest,
            cookies,
            cookie_name: config.cookie_name.clone(),
            attributes: config.cookie_attributes(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Read the five attributes in hashing order.
    pub fn collect(&self) -> Result<AttributeVector> {
        Ok(AttributeVector {
            user_agent: self.environment.user_agent()?,
            language: self.environment.language()?,
            screen: self.environment.screen_size()?,
            timezone: self.environment.timezone()?,
            platform: self.environment.platform()?,
        })
    }

    /// Collect and hash without touching the cookie store.
    pub async fn compute(&self) -> Result<HexFingerprint> {
        let attributes = self.collect()?;
        if attributes.has_ambiguous_separator() {
            log::debug!("attribute contains '{}', field boundaries are ambiguous", SEPARATOR);
        }
        fingerprint_from_string(&self.digest, &attributes.fingerprint_string()).await
    }

    /// Compute the fingerprint and overwrite the cookie with it.
    ///
    /// The cookie is written unconditionally, even if it already holds
    /// the same value.
    pub async fn generate(&self) -> Result<HexFingerprint> {
        let fingerprint = self.compute().await?;
        self.cookies
            .write(&self.cookie_name, fingerprint.as_str(), &self.attributes)?;
        log::debug!("{}={}… written", self.cookie_name, fingerprint.short());
        Ok(fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookie::{MemoryCookieJar, SameSite};
    use crate::environment::StaticEnvironment;
    use crate::error::FingerprintError;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use sha2::{Digest, Sha256};

    fn fixture() -> StaticEnvironment {
        StaticEnvironment::new(
            "UA1",
            "en-US",
            ScreenSize::new(1920, 1080),
            "America/New_York",
            "Win32",
        )
    }

    fn expected_hex(joined: &str) -> String {
        hex::encode(Sha256::digest(joined.as_bytes()))
    }

    struct FailingDigest;

    #[async_trait(?Send)]
    impl DigestProvider for FailingDigest {
        async fn sha256(&self, _data: &[u8]) -> Result<Vec<u8>> {
            Err(FingerprintError::DigestUnavailable("stubbed".into()))
        }
    }

    struct ShortDigest;

    #[async_trait(?Send)]
    impl DigestProvider for ShortDigest {
        async fn sha256(&self, _data: &[u8]) -> Result<Vec<u8>> {
            Ok(vec![0u8; 20])
        }
    }

    struct FailingPlatform(StaticEnvironment);

    impl EnvironmentReader for FailingPlatform {
        fn user_agent(&self) -> Result<String> {
            self.0.user_agent()
        }
        fn language(&self) -> Result<String> {
            self.0.language()
        }
        fn screen_size(&self) -> Result<ScreenSize> {
            self.0.screen_size()
        }
        fn timezone(&self) -> Result<String> {
            self.0.timezone()
        }
        fn platform(&self) -> Result<String> {
            Err(FingerprintError::attribute("platform", "getter threw"))
        }
    }

    #[test]
    fn test_collect_order() {
        let jar = MemoryCookieJar::new();
        let generator = FingerprintGenerator::new(fixture(), Sha256Digest, &jar);
        let attrs = generator.collect().unwrap();
        assert_eq!(
            attrs.fingerprint_string(),
            "UA1|en-US|1920x1080|America/New_York|Win32"
        );
    }

    #[test]
    fn test_generate_writes_expected_cookie() {
        let jar = MemoryCookieJar::new();
        let generator = FingerprintGenerator::new(fixture(), Sha256Digest, &jar);

        let fp = block_on(generator.generate()).unwrap();
        let expected = expected_hex("UA1|en-US|1920x1080|America/New_York|Win32");

        assert_eq!(fp.as_str(), expected);
        assert_eq!(jar.get("fp"), Some(expected.clone()));
        assert_eq!(
            jar.writes(),
            vec![format!("fp={}; path=/; SameSite=Lax", expected)]
        );
    }

    #[test]
    fn test_output_format() {
        let jar = MemoryCookieJar::new();
        let generator = FingerprintGenerator::new(fixture(), Sha256Digest, &jar);
        let fp = block_on(generator.generate()).unwrap();

        assert_eq!(fp.as_str().len(), 64);
        assert!(fp
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_deterministic_and_idempotent_overwrite() {
        let jar = MemoryCookieJar::new();
        let generator = FingerprintGenerator::new(fixture(), Sha256Digest, &jar);

        let first = block_on(generator.generate()).unwrap();
        let second = block_on(generator.generate()).unwrap();

        assert_eq!(first, second);
        assert_eq!(jar.write_count(), 2);
        assert_eq!(jar.get("fp").as_deref(), Some(first.as_str()));
    }

    #[test]
    fn test_each_attribute_changes_hash() {
        let jar = MemoryCookieJar::new();
        let base = block_on(FingerprintGenerator::new(fixture(), Sha256Digest, &jar).compute())
            .unwrap();

        let variants = vec![
            StaticEnvironment {
                user_agent: "UA2".into(),
                ..fixture()
            },
            StaticEnvironment {
                language: "pt-BR".into(),
                ..fixture()
            },
            StaticEnvironment {
                screen: ScreenSize::new(1366, 768),
                ..fixture()
            },
            StaticEnvironment {
                timezone: "America/Sao_Paulo".into(),
                ..fixture()
            },
            StaticEnvironment {
                platform: "MacIntel".into(),
                ..fixture()
            },
        ];

        for env in variants {
            let fp = block_on(FingerprintGenerator::new(env.clone(), Sha256Digest, &jar).compute())
                .unwrap();
            assert_ne!(fp, base, "{:?} should change the fingerprint", env);
        }
    }

    #[test]
    fn test_compute_does_not_write() {
        let jar = MemoryCookieJar::new();
        let generator = FingerprintGenerator::new(fixture(), Sha256Digest, &jar);
        block_on(generator.compute()).unwrap();
        assert_eq!(jar.write_count(), 0);
    }

    #[test]
    fn test_digest_failure_leaves_cookie_unchanged() {
        let jar = MemoryCookieJar::new();
        jar.insert("fp", "previous");
        let generator = FingerprintGenerator::new(fixture(), FailingDigest, &jar);

        let result = block_on(generator.generate());

        assert!(matches!(result, Err(FingerprintError::DigestUnavailable(_))));
        assert_eq!(jar.get("fp").as_deref(), Some("previous"));
        assert_eq!(jar.write_count(), 0);
    }

    #[test]
    fn test_attribute_failure_propagates() {
        let jar = MemoryCookieJar::new();
        let generator = FingerprintGenerator::new(FailingPlatform(fixture()), Sha256Digest, &jar);

        let result = block_on(generator.generate());

        assert!(matches!(
            result,
            Err(FingerprintError::AttributeUnavailable { ref attribute, .. }) if attribute == "platform"
        ));
        assert_eq!(jar.get("fp"), None);
    }

    #[test]
    fn test_invalid_digest_length_rejected() {
        let jar = MemoryCookieJar::new();
        let generator = FingerprintGenerator::new(fixture(), ShortDigest, &jar);

        let result = block_on(generator.generate());

        assert_eq!(result, Err(FingerprintError::InvalidDigestLength(20)));
        assert_eq!(jar.write_count(), 0);
    }

    #[test]
    fn test_with_config() {
        let jar = MemoryCookieJar::new();
        let config = GeneratorConfig {
            cookie_name: "client_id".into(),
            path: "/app".into(),
            same_site: SameSite::Strict,
            ..GeneratorConfig::default()
        };
        let generator = FingerprintGenerator::with_config(fixture(), Sha256Digest, &jar, &config);

        let fp = block_on(generator.generate()).unwrap();

        assert_eq!(generator.cookie_name(), "client_id");
        assert_eq!(
            jar.writes(),
            vec![format!("client_id={}; path=/app; SameSite=Strict", fp)]
        );
    }
}
