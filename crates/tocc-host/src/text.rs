//! Host text
//!
//! The host stores text as UTF-16 code units, so a host string may hold
//! unpaired surrogates that have no UTF-8 encoding. Conversion to native text
//! is therefore fallible.

use std::fmt;
use std::sync::Arc;

/// Reference-counted, immutable host string
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HostStr(Arc<[u16]>);

impl HostStr {
    /// Build host text from raw code units (may be ill-formed)
    pub fn from_units(units: impl Into<Vec<u16>>) -> Self {
        HostStr(Arc::from(units.into()))
    }

    pub fn units(&self) -> &[u16] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode as UTF-8, failing on unpaired surrogates
    pub fn to_utf8(&self) -> Result<String, std::string::FromUtf16Error> {
        String::from_utf16(&self.0)
    }

    /// Encode as UTF-8, replacing unpaired surrogates with U+FFFD
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.0)
    }

    /// Number of live references to the underlying buffer
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl From<&str> for HostStr {
    fn from(s: &str) -> Self {
        HostStr(s.encode_utf16().collect())
    }
}

impl From<String> for HostStr {
    fn from(s: String) -> Self {
        HostStr::from(s.as_str())
    }
}

impl From<&String> for HostStr {
    fn from(s: &String) -> Self {
        HostStr::from(s.as_str())
    }
}

impl fmt::Display for HostStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for HostStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}
