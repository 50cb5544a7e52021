//! Core types for the player lifecycle adapter

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one mount of the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MountId(pub Uuid);

impl MountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MountId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One media source descriptor
///
/// The order of a source list is preference order: the player tries entries
/// front to back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSource {
    /// Source URL or path
    pub src: String,
    /// MIME type hint, e.g. "video/mp4"
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl MediaSource {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            mime_type: None,
        }
    }

    pub fn with_type(src: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            mime_type: Some(mime_type.into()),
        }
    }
}

/// Preload hint for the playable element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preload {
    /// Fetch nothing until playback is requested
    None,
    /// Fetch metadata only
    Metadata,
    /// Let the element fetch freely
    Auto,
}

impl Preload {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preload::None => "none",
            Preload::Metadata => "metadata",
            Preload::Auto => "auto",
        }
    }
}

impl Default for Preload {
    fn default() -> Self {
        Preload::None
    }
}

impl std::fmt::Display for Preload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declarative player configuration supplied by the host on every render
///
/// Presence matters: `None` means "leave this aspect of the player alone",
/// which is different from an explicit `Some(false)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerOptions {
    /// Ordered media sources; empty means no playable media
    #[serde(default)]
    pub sources: Vec<MediaSource>,
    /// Autoplay policy; absent leaves the player's policy unspecified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
    /// Muted flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
    /// Poster image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    /// Preload hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preload: Option<Preload>,
    /// Inline playback hint applied to the host element at creation
    #[serde(default = "default_inline_playback")]
    pub inline_playback: bool,
    /// Opaque creation-time options handed to the player constructor as-is;
    /// never diffed after creation
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_inline_playback() -> bool {
    true
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            autoplay: None,
            muted: None,
            poster: None,
            preload: None,
            inline_playback: true,
            extra: serde_json::Map::new(),
        }
    }
}

impl PlayerOptions {
    /// Options with a single source and everything else unspecified
    pub fn with_source(src: impl Into<String>) -> Self {
        Self {
            sources: vec![MediaSource::new(src)],
            ..Self::default()
        }
    }

    /// Preload hint used for the creation-time attribute when none is set
    pub fn effective_preload(&self) -> Preload {
        self.preload.unwrap_or_default()
    }
}

/// Mount lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MountState {
    /// No player held; eligible for begin()
    Unmounted,
    /// Async setup in flight
    Initializing,
    /// Player created and ready
    Ready,
    /// Teardown disposing the player
    Disposing,
}

impl MountState {
    /// Check if transition to target state is valid
    pub fn can_transition_to(&self, target: MountState) -> bool {
        use MountState::*;
        matches!(
            (self, target),
            // From Unmounted
            (Unmounted, Initializing) |
            // From Initializing; Initializing -> Unmounted is the
            // unmount-raced-ahead-of-setup short circuit
            (Initializing, Ready) | (Initializing, Unmounted) |
            // From Ready
            (Ready, Disposing) |
            // From Disposing
            (Disposing, Unmounted)
        )
    }
}

impl std::fmt::Display for MountState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MountState::Unmounted => write!(f, "unmounted"),
            MountState::Initializing => write!(f, "initializing"),
            MountState::Ready => write!(f, "ready"),
            MountState::Disposing => write!(f, "disposing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_state_transitions() {
        // Valid transitions
        assert!(MountState::Unmounted.can_transition_to(MountState::Initializing));
        assert!(MountState::Initializing.can_transition_to(MountState::Ready));
        assert!(MountState::Initializing.can_transition_to(MountState::Unmounted));
        assert!(MountState::Ready.can_transition_to(MountState::Disposing));
        assert!(MountState::Disposing.can_transition_to(MountState::Unmounted));

        // Invalid transitions
        assert!(!MountState::Unmounted.can_transition_to(MountState::Ready));
        assert!(!MountState::Ready.can_transition_to(MountState::Unmounted));
        assert!(!MountState::Ready.can_transition_to(MountState::Initializing));
        assert!(!MountState::Disposing.can_transition_to(MountState::Ready));
    }

    #[test]
    fn test_preload_strings() {
        assert_eq!(Preload::None.as_str(), "none");
        assert_eq!(Preload::Metadata.as_str(), "metadata");
        assert_eq!(Preload::Auto.as_str(), "auto");
        assert_eq!(Preload::default(), Preload::None);
    }

    #[test]
    fn test_options_defaults() {
        let options = PlayerOptions::default();
        assert!(options.sources.is_empty());
        assert!(options.autoplay.is_none());
        assert!(options.muted.is_none());
        assert_eq!(options.effective_preload(), Preload::None);
    }

    #[test]
    fn test_options_deserialization_presence() {
        let options: PlayerOptions =
            serde_json::from_str(r#"{"sources":[{"src":"a.mp4","type":"video/mp4"}],"autoplay":false}"#)
                .unwrap();
        assert_eq!(options.sources[0].src, "a.mp4");
        assert_eq!(options.sources[0].mime_type.as_deref(), Some("video/mp4"));
        // Explicit false is present, not absent
        assert_eq!(options.autoplay, Some(false));
        assert_eq!(options.muted, None);
        // Unspecified inline playback defaults on
        assert!(options.inline_playback);
    }

    #[test]
    fn test_options_extra_passthrough() {
        let options: PlayerOptions =
            serde_json::from_str(r#"{"sources":[],"fluid":true,"controls":true}"#).unwrap();
        assert_eq!(options.extra.get("fluid"), Some(&serde_json::json!(true)));
        assert_eq!(options.extra.get("controls"), Some(&serde_json::json!(true)));
    }
}
