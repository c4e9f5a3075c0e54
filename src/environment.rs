//! Environment attribute readers
//!
//! [`BrowserEnvironment`] reads the live page globals:
//! - `navigator.userAgent`, `navigator.language`, `navigator.platform`
//! - `screen.width`, `screen.height`
//! - `Intl.DateTimeFormat().resolvedOptions().timeZone`
//!
//! [`StaticEnvironment`] returns fixed values for tests and for hosts that
//! already know the attributes.

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsValue;
use web_sys::Window;

use crate::error::{describe_js_error, FingerprintError, Result};
use crate::fingerprint::ScreenSize;

/// Source of the five fingerprinted attributes.
pub trait EnvironmentReader {
    fn user_agent(&self) -> Result<String>;
    fn language(&self) -> Result<String>;
    fn screen_size(&self) -> Result<ScreenSize>;
    fn timezone(&self) -> Result<String>;
    fn platform(&self) -> Result<String>;
}

impl<T: EnvironmentReader + ?Sized> EnvironmentReader for &T {
    fn user_agent(&self) -> Result<String> {
        (**self).user_agent()
    }
    fn language(&self) -> Result<String> {
        (**self).language()
    }
    fn screen_size(&self) -> Result<ScreenSize> {
        (**self).screen_size()
    }
    fn timezone(&self) -> Result<String> {
        (**self).timezone()
    }
    fn platform(&self) -> Result<String> {
        (**self).platform()
    }
}

/// Reads attributes from the current window.
#[derive(Clone)]
pub struct BrowserEnvironment {
    window: Window,
}

impl BrowserEnvironment {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or(FingerprintError::NoWindow)?;
        Ok(Self { window })
    }

    pub fn from_window(window: Window) -> Self {
        Self { window }
    }
}

impl EnvironmentReader for BrowserEnvironment {
    fn user_agent(&self) -> Result<String> {
        self.window
            .navigator()
            .user_agent()
            .map_err(|e| FingerprintError::attribute("userAgent", describe_js_error(&e)))
    }

    // An absent language joins as an empty field.
    fn language(&self) -> Result<String> {
        Ok(self.window.navigator().language().unwrap_or_default())
    }

    fn screen_size(&self) -> Result<ScreenSize> {
        let screen = self
            .window
            .screen()
            .map_err(|e| FingerprintError::attribute("screen", describe_js_error(&e)))?;
        let width = screen
            .width()
            .map_err(|e| FingerprintError::attribute("screen.width", describe_js_error(&e)))?;
        let height = screen
            .height()
            .map_err(|e| FingerprintError::attribute("screen.height", describe_js_error(&e)))?;
        Ok(ScreenSize::new(width, height))
    }

    fn timezone(&self) -> Result<String> {
        let format = js_sys::Intl::DateTimeFormat::new(&Array::new(), &Object::new());
        let options = format.resolved_options();
        let time_zone = Reflect::get(&options, &JsValue::from_str("timeZone"))
            .map_err(|e| FingerprintError::attribute("timeZone", describe_js_error(&e)))?;
        Ok(time_zone.as_string().unwrap_or_default())
    }

    fn platform(&self) -> Result<String> {
        self.window
            .navigator()
            .platform()
            .map_err(|e| FingerprintError::attribute("platform", describe_js_error(&e)))
    }
}

/// Fixed attribute values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticEnvironment {
    pub user_agent: String,
    pub language: String,
    pub screen: ScreenSize,
    pub timezone: String,
    pub platform: String,
}

impl StaticEnvironment {
    pub fn new(
        user_agent: impl Into<String>,
        language: impl Into<String>,
        screen: ScreenSize,
        timezone: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            language: language.into(),
            screen,
            timezone: timezone.into(),
            platform: platform.into(),
        }
    }
}

impl EnvironmentReader for StaticEnvironment {
    fn user_agent(&self) -> Result<String> {
        Ok(self.user_agent.clone())
    }
    fn language(&self) -> Result<String> {
        Ok(self.language.clone())
    }
    fn screen_size(&self) -> Result<ScreenSize> {
        Ok(self.screen)
    }
    fn timezone(&self) -> Result<String> {
        Ok(self.timezone.clone())
    }
    fn platform(&self) -> Result<String> {
        Ok(self.platform.clone())
    }
}
