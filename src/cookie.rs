//! Cookie store access
//!
//! The generator never touches `document.cookie` directly; it writes through
//! a [`CookieWriter`]. The browser implementation assigns the serialized
//! cookie string to `document.cookie`; [`MemoryCookieJar`] keeps the same
//! last-write-wins semantics in memory.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

use crate::config::DEFAULT_COOKIE_PATH;
use crate::error::{describe_js_error, FingerprintError, Result};

/// `SameSite` cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes written after `name=value`.
///
/// No `Expires`/`Max-Age` (session cookie) and no `Secure` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    pub path: String,
    pub same_site: SameSite,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            path: DEFAULT_COOKIE_PATH.to_string(),
            same_site: SameSite::Lax,
        }
    }
}

impl fmt::Display for CookieAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "; path={}; SameSite={}", self.path, self.same_site)
    }
}

/// A single cookie assignment.
#[derive(Debug, Clone, Copy)]
pub struct Cookie<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub attributes: &'a CookieAttributes,
}

impl Cookie<'_> {
    /// Serialize as a `document.cookie` assignment, e.g.
    /// `fp=<hex>; path=/; SameSite=Lax`.
    pub fn to_cookie_string(&self) -> String {
        format!("{}={}{}", self.name, self.value, self.attributes)
    }
}

/// Find the value of `name` in a `Cookie` header or `document.cookie`
/// string (`a=1; fp=abc; b=2`). The first match wins.
pub fn read_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
}

/// Write side of the cookie store.
pub trait CookieWriter {
    fn write(&self, name: &str, value: &str, attributes: &CookieAttributes) -> Result<()>;
}

/// Read side of the cookie store.
pub trait CookieReader {
    fn read(&self, name: &str) -> Result<Option<String>>;
}

/// Cookie store backed by `document.cookie`.
#[derive(Clone)]
pub struct DocumentCookieWriter {
    document: HtmlDocument,
}

impl DocumentCookieWriter {
    /// Bind to the current window's document.
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or(FingerprintError::NoWindow)?;
        let document = window
            .document()
            .ok_or_else(|| FingerprintError::CookieWrite("window has no document".into()))?;
        let document = document
            .dyn_into::<HtmlDocument>()
            .map_err(|_| FingerprintError::CookieWrite("document is not an HTML document".into()))?;
        Ok(Self { document })
    }

    pub fn from_document(document: HtmlDocument) -> Self {
        Self { document }
    }
}

impl CookieWriter for DocumentCookieWriter {
    fn write(&self, name: &str, value: &str, attributes: &CookieAttributes) -> Result<()> {
        let cookie = Cookie {
            name,
            value,
            attributes,
        };
        self.document
            .set_cookie(&cookie.to_cookie_string())
            .map_err(|e| FingerprintError::CookieWrite(describe_js_error(&e)))
    }
}

impl CookieReader for DocumentCookieWriter {
    fn read(&self, name: &str) -> Result<Option<String>> {
        let header = self
            .document
            .cookie()
            .map_err(|e| FingerprintError::CookieWrite(describe_js_error(&e)))?;
        Ok(read_cookie(&header, name).map(str::to_string))
    }
}

/// In-memory cookie store with last-write-wins semantics.
///
/// Records every serialized assignment so callers can inspect exactly what
/// would have been written to `document.cookie`.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    values: RefCell<HashMap<String, String>>,
    writes: RefCell<Vec<String>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a cookie.
    pub fn get(&self, name: &str) -> Option<String> {
        self.values.borrow().get(name).cloned()
    }

    /// Seed a value without recording a write.
    pub fn insert(&self, name: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    /// Serialized assignments in write order.
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }
}

impl CookieWriter for MemoryCookieJar {
    fn write(&self, name: &str, value: &str, attributes: &CookieAttributes) -> Result<()> {
        let cookie = Cookie {
            name,
            value,
            attributes,
        };
        self.writes.borrow_mut().push(cookie.to_cookie_string());
        self.insert(name, value);
        Ok(())
    }
}

impl CookieReader for MemoryCookieJar {
    fn read(&self, name: &str) -> Result<Option<String>> {
        Ok(self.get(name))
    }
}

impl<T: CookieWriter + ?Sized> CookieWriter for &T {
    fn write(&self, name: &str, value: &str, attributes: &CookieAttributes) -> Result<()> {
        (**self).write(name, value, attributes)
    }
}
