use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Store-assigned metadata for one object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectMeta {
    /// The object's key.
    pub key: String,
    /// Length of the object body in bytes.
    pub size: u64,
    /// Time of the last committed put for this key.
    pub last_modified: DateTime<Utc>,
}

/// A stored object: its body plus metadata.
///
/// Bodies are reference-counted [`Bytes`], so cloning an `Object` out of a
/// backend does not copy the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    pub meta: ObjectMeta,
    pub data: Bytes,
}

impl Object {
    /// Create an object stamped with the current time.
    pub fn new(key: impl Into<String>, data: Bytes) -> Self {
        let meta = ObjectMeta {
            key: key.into(),
            size: data.len() as u64,
            last_modified: Utc::now(),
        };
        Self { meta, data }
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Parameters of a prefix listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListRequest {
    /// Only keys starting with this string are returned.
    pub prefix: String,
    /// When set, keys containing the delimiter after the prefix are rolled up
    /// into a single common sub-prefix ending at the first delimiter.
    pub delimiter: Option<char>,
    /// Upper bound on `objects.len() + common_prefixes.len()`.
    pub limit: Option<usize>,
}

impl ListRequest {
    /// List everything under `prefix`, flat.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter: None,
            limit: None,
        }
    }

    /// Group results by `delimiter`.
    pub fn delimited(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Stop after `limit` entries.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Result of a prefix listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Listing {
    /// Keys directly matched (not rolled up), sorted by key.
    pub objects: Vec<ObjectMeta>,
    /// Common sub-prefixes, each ending with the delimiter, sorted.
    pub common_prefixes: Vec<String>,
    /// `true` if the limit cut the listing short.
    pub truncated: bool,
}

impl Listing {
    /// Total number of entries returned.
    pub fn len(&self) -> usize {
        self.objects.len() + self.common_prefixes.len()
    }

    /// Returns `true` if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.common_prefixes.is_empty()
    }

    /// Build a listing from metadata sorted by key.
    ///
    /// Backends collect the candidate keys however suits them and share this
    /// grouping step, so every backend rolls up prefixes identically.
    pub fn from_sorted<I>(request: &ListRequest, sorted: I) -> Self
    where
        I: IntoIterator<Item = ObjectMeta>,
    {
        let mut listing = Listing::default();
        let prefix = request.prefix.as_str();

        for meta in sorted {
            if !meta.key.starts_with(prefix) {
                continue;
            }

            let rest = &meta.key[prefix.len()..];
            let common = request
                .delimiter
                .and_then(|d| rest.find(d).map(|i| prefix.len() + i + d.len_utf8()))
                .map(|end| &meta.key[..end]);

            // Keys sharing a sub-prefix are contiguous in key order.
            if common.is_some() && listing.common_prefixes.last().map(String::as_str) == common {
                continue;
            }
            if request.limit.is_some_and(|limit| listing.len() >= limit) {
                listing.truncated = true;
                break;
            }

            match common {
                Some(common) => listing.common_prefixes.push(common.to_string()),
                None => listing.objects.push(meta),
            }
        }
        listing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(key: &str) -> ObjectMeta {
        ObjectMeta {
            key: key.to_string(),
            size: 1,
            last_modified: Utc::now(),
        }
    }

    fn keys(listing: &Listing) -> Vec<&str> {
        listing.objects.iter().map(|m| m.key.as_str()).collect()
    }

    fn sample() -> Vec<ObjectMeta> {
        ["a", "x/2.txt", "x/y", "x/y/0.txt", "x/y/1.txt", "x/z/", "xx"]
            .into_iter()
            .map(meta)
            .collect()
    }

    #[test]
    fn flat_listing_returns_every_key_under_prefix() {
        let listing = Listing::from_sorted(&ListRequest::new("x/"), sample());
        assert_eq!(keys(&listing), ["x/2.txt", "x/y", "x/y/0.txt", "x/y/1.txt", "x/z/"]);
        assert!(listing.common_prefixes.is_empty());
        assert!(!listing.truncated);
    }

    #[test]
    fn delimiter_rolls_up_sub_prefixes() {
        let listing = Listing::from_sorted(&ListRequest::new("x/").delimited('/'), sample());
        assert_eq!(keys(&listing), ["x/2.txt", "x/y"]);
        assert_eq!(listing.common_prefixes, ["x/y/", "x/z/"]);
    }

    #[test]
    fn empty_prefix_lists_top_level() {
        let listing = Listing::from_sorted(&ListRequest::new("").delimited('/'), sample());
        assert_eq!(keys(&listing), ["a", "xx"]);
        assert_eq!(listing.common_prefixes, ["x/"]);
    }

    #[test]
    fn key_equal_to_prefix_is_an_object() {
        let listing = Listing::from_sorted(&ListRequest::new("x/z/").delimited('/'), sample());
        assert_eq!(keys(&listing), ["x/z/"]);
        assert!(listing.common_prefixes.is_empty());
    }

    #[test]
    fn limit_truncates() {
        let listing =
            Listing::from_sorted(&ListRequest::new("x/").delimited('/').limit(1), sample());
        assert_eq!(listing.len(), 1);
        assert!(listing.truncated);
    }

    #[test]
    fn limit_counts_rolled_up_prefix_once() {
        let metas = ["a", "x/1", "x/2"].into_iter().map(meta);
        let listing = Listing::from_sorted(&ListRequest::new("").delimited('/').limit(2), metas);
        assert_eq!(keys(&listing), ["a"]);
        assert_eq!(listing.common_prefixes, ["x/"]);
        assert!(!listing.truncated);
    }
}
