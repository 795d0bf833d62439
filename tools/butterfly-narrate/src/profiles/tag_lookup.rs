//! Tag lookup utility for profiles
//!
//! Tags are kept as an ordered list so that anything derived from them
//! (tagged names in particular) follows the source order.

/// Borrowed view over a way's `(key, value)` tags
#[derive(Debug, Clone, Copy)]
pub struct TagLookup<'a> {
    tags: &'a [(String, String)],
}

impl<'a> TagLookup<'a> {
    pub fn new(tags: &'a [(String, String)]) -> Self {
        Self { tags }
    }

    /// Value of the first tag with `key`
    pub fn get_str(&self, key: &str) -> Option<&'a str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.get_str(key).is_some()
    }

    /// `yes`-like values; anything else (including absence) is false
    pub fn is_truthy(&self, key: &str) -> bool {
        matches!(self.get_str(key), Some("yes" | "true" | "1"))
    }

    /// Tags in source order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
