//! Configuration fingerprinting
//!
//! The host tree hands the adapter a fresh configuration object on every
//! render, usually semantically unchanged. Reconciliation is gated on a
//! canonical serialization of the subset of fields that drive post-creation
//! updates, so identical configurations never cause imperative calls.

use crate::types::{MediaSource, PlayerOptions, Preload};
use serde::Serialize;

/// Tracked subset of the configuration, serialized in a fixed field order.
///
/// Absent optionals serialize as `null`, which keeps `autoplay: None`
/// distinct from `autoplay: Some(false)` - the reconciler branches on
/// presence, not truthiness.
#[derive(Serialize)]
struct Tracked<'a> {
    sources: &'a [MediaSource],
    autoplay: Option<bool>,
    muted: Option<bool>,
    poster: Option<&'a str>,
    preload: Option<Preload>,
}

/// Derived equality key over the tracked configuration subset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a configuration
    ///
    /// Pure and deterministic. Source order is part of the key because it
    /// expresses source preference order. Fields outside the tracked subset
    /// (including pass-through creation options) never affect the result.
    pub fn of(options: &PlayerOptions) -> Self {
        let tracked = Tracked {
            sources: &options.sources,
            autoplay: options.autoplay,
            muted: options.muted,
            poster: options.poster.as_deref(),
            preload: options.preload,
        };
        // Struct serialization order is fixed, so the JSON text is canonical.
        let key = serde_json::to_string(&tracked)
            .unwrap_or_else(|_| String::from("{}"));
        Self(key)
    }

    /// The canonical serialized form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
