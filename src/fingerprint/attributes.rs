//! Attribute vector and pre-hash string

use std::fmt;

/// Separator between joined attributes. Values are not escaped, so an
/// attribute containing `|` makes field boundaries ambiguous.
pub const SEPARATOR: &str = "|";

/// Screen dimensions, rendered as `<width>x<height>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

impl ScreenSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The five environment attributes, in hashing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeVector {
    pub user_agent: String,
    pub language: String,
    pub screen: ScreenSize,
    pub timezone: String,
    pub platform: String,
}

impl AttributeVector {
    /// Attributes in their fixed order, screen already formatted.
    pub fn ordered(&self) -> [String; 5] {
        [
            self.user_agent.clone(),
            self.language.clone(),
            self.screen.to_string(),
            self.timezone.clone(),
            self.platform.clone(),
        ]
    }

    /// Join the attributes with [`SEPARATOR`]. This is the exact string
    /// that gets hashed.
    pub fn fingerprint_string(&self) -> String {
        self.ordered().join(SEPARATOR)
    }

    /// True when any attribute would blur field boundaries in the joined
    /// string.
    pub fn has_ambiguous_separator(&self) -> bool {
        [
            &self.user_agent,
            &self.language,
            &self.timezone,
            &self.platform,
        ]
        .iter()
        .any(|value| value.contains(SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AttributeVector {
        AttributeVector {
            user_agent: "UA1".into(),
            language: "en-US".into(),
            screen: ScreenSize::new(1920, 1080),
            timezone: "America/New_York".into(),
            platform: "Win32".into(),
        }
    }

    #[test]
    fn test_join_order() {
        assert_eq!(
            sample().fingerprint_string(),
            "UA1|en-US|1920x1080|America/New_York|Win32"
        );
    }

    #[test]
    fn test_screen_format() {
        assert_eq!(ScreenSize::new(1366, 768).to_string(), "1366x768");
    }

    #[test]
    fn test_empty_attributes_keep_positions() {
        let attrs = AttributeVector {
            language: String::new(),
            timezone: String::new(),
            ..sample()
        };
        assert_eq!(attrs.fingerprint_string(), "UA1||1920x1080||Win32");
    }

    #[test]
    fn test_separator_collision_detected() {
        assert!(!sample().has_ambiguous_separator());

        let attrs = AttributeVector {
            user_agent: "UA|1".into(),
            ..sample()
        };
        assert!(attrs.has_ambiguous_separator());
    }
}
