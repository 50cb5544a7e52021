//! External player seam
//!
//! The adapter never talks to a concrete player library directly; it consumes
//! three capabilities behind async traits:
//!
//! - [`PlayerBackend`]: asynchronous acquisition of the player library and
//!   its style resource (the two things a dynamic module import fetches)
//! - [`PlayerFactory`]: construction of a live player over a host element
//! - [`PlayerHandle`]: the bounded imperative surface of a live player
//!
//! Real embeddings implement these over their player of choice; the
//! [`crate::sim`] module ships a deterministic in-memory implementation.

use crate::dom::MediaElement;
use crate::error::Result;
use crate::types::{MediaSource, PlayerOptions};
use async_trait::async_trait;
use std::sync::Arc;

/// Asynchronous acquisition of the external player library
#[async_trait]
pub trait PlayerBackend: Send + Sync {
    /// Load the player module
    ///
    /// First suspension point of mount setup. There is no way to abort a
    /// load in flight; the mount controller re-checks liveness after the
    /// await instead.
    async fn load(&self) -> Result<Arc<dyn PlayerFactory>>;

    /// Load the stylesheet that ships with the player library
    ///
    /// Failure is non-fatal: the mount reports it and proceeds, since the
    /// styling may be provided globally by the embedding.
    async fn load_styles(&self) -> Result<()>;
}

/// Constructor surface of a loaded player library
#[async_trait]
pub trait PlayerFactory: Send + Sync {
    /// Create a player over the host element with the full initial
    /// configuration
    ///
    /// Second suspension point of mount setup: resolves once the player
    /// reports itself initialized. The returned handle is the one live
    /// player for this mount.
    async fn create(
        &self,
        host: MediaElement,
        options: &PlayerOptions,
    ) -> Result<Arc<dyn PlayerHandle>>;
}

impl std::fmt::Debug for dyn PlayerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn PlayerFactory")
    }
}

/// Imperative operations on a live player
///
/// This is the complete surface the reconciler may touch; nothing else about
/// the external resource is visible to the adapter.
#[async_trait]
pub trait PlayerHandle: Send + Sync {
    /// Pause playback
    fn pause(&self) -> Result<()>;

    /// Replace the source list, in preference order; an empty list puts the
    /// player into an explicit no-media state
    fn set_sources(&self, sources: &[MediaSource]) -> Result<()>;

    /// Set the poster image
    fn set_poster(&self, url: &str) -> Result<()>;

    /// Set the autoplay flag
    fn set_autoplay(&self, autoplay: bool) -> Result<()>;

    /// Request playback
    ///
    /// May be rejected by the environment's playback policy; such a
    /// rejection is recoverable.
    async fn play(&self) -> Result<()>;

    /// Set the muted flag
    fn set_muted(&self, muted: bool) -> Result<()>;

    /// The underlying playable element, when the player exposes one
    ///
    /// Used for attribute writes the player does not expose as live
    /// setters (preload).
    fn media_element(&self) -> Option<MediaElement>;

    /// Dispose the player and release everything it holds
    ///
    /// Called at most once per handle by the mount controller; never
    /// retried on failure.
    fn dispose(&self) -> Result<()>;
}
