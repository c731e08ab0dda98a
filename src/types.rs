//! Core value types shared by every plane.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Stored or retrieved content (typically a credential document).
pub type Content = Value;

/// Index query. Objects are matched by the provider; the wallet only uses the
/// serialized form as a cache key.
pub type Query = Value;

/// Key material returned by identity providers (a JWK-shaped object).
pub type Keypair = Value;

/// Consistency mode for cache-aware reads and writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
    /// Serve from cache when possible, refresh in the background
    #[default]
    CacheFirst,
    /// Bypass the cache entirely
    SkipCache,
    /// Require a caching provider; serve hits without a background refresh
    CacheOnly,
}

impl CacheMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheMode::CacheFirst => "cache-first",
            CacheMode::SkipCache => "skip-cache",
            CacheMode::CacheOnly => "cache-only",
        }
    }

    /// Whether this mode touches the cache at all.
    pub fn uses_cache(&self) -> bool {
        *self != CacheMode::SkipCache
    }
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cache-first" => Ok(CacheMode::CacheFirst),
            "skip-cache" => Ok(CacheMode::SkipCache),
            "cache-only" => Ok(CacheMode::CacheOnly),
            other => Err(format!(
                "Invalid cache mode: {} (must be 'cache-first', 'skip-cache', or 'cache-only')",
                other
            )),
        }
    }
}

/// A single index record.
///
/// Records are shared handles. Two records are the *same* record when they
/// are equal primitives or when they point at the same allocation; two
/// separately built objects with identical fields are distinct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Arc<Value>);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Top-level identity comparison used when merging index results.
    pub fn same_as(&self, other: &Record) -> bool {
        match (self.0.as_ref(), other.0.as_ref()) {
            (Value::Object(_) | Value::Array(_), _) | (_, Value::Object(_) | Value::Array(_)) => {
                Arc::ptr_eq(&self.0, &other.0)
            }
            (a, b) => a == b,
        }
    }

    /// Convenience accessor for the conventional `id` field.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Record::new(value)
    }
}

/// Drop later records that are the [same](Record::same_as) as an earlier one,
/// keeping first-seen order.
pub fn dedup_records(records: Vec<Record>) -> Vec<Record> {
    let mut kept: Vec<Record> = Vec::with_capacity(records.len());
    for record in records {
        if !kept.iter().any(|existing| existing.same_as(&record)) {
            kept.push(record);
        }
    }
    kept
}

/// Cursor pagination options for paged index reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationOptions {
    #[serde(default = "default_page_limit")]
    pub limit: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

fn default_page_limit() -> usize {
    25
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            limit: default_page_limit(),
            cursor: None,
        }
    }
}

/// One page of index records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    pub records: Vec<Record>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}
