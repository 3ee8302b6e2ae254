//! Deduplication keys.

use std::fmt;

/// Identity of a request for deduplication and caching.
///
/// Two requests with the same method, URL (path plus query string) and body
/// produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn new(method: &str, url: &str, body: Option<&str>) -> Self {
        match body {
            Some(body) if !body.is_empty() => Self(format!("{method} {url} {body}")),
            _ => Self(format!("{method} {url}")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DedupKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}
