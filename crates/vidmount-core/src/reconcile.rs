//! Reconciliation of declarative configuration onto a live player
//!
//! Applies the minimal imperative update sequence for a changed tracked
//! subset. Field updates are best-effort and independent: one failing field
//! never blocks the rest, and nothing here is fatal to the mount.

use crate::backend::PlayerHandle;
use crate::error::Error;
use crate::types::PlayerOptions;
use tracing::{debug, warn};

/// Apply a configuration subset to a live player
///
/// Returns the per-field errors that were caught so the caller can surface
/// them; an empty vec means every attempted update took.
pub(crate) async fn apply_options(
    handle: &dyn PlayerHandle,
    options: &PlayerOptions,
    debug_enabled: bool,
) -> Vec<Error> {
    let mut failures = Vec::new();

    // 1. Sources. A non-empty list replaces playback wholesale, so pause
    // first; an empty list is an explicit no-media state, never left stale.
    if !options.sources.is_empty() {
        if let Err(e) = handle.pause() {
            failures.push(Error::field("pause", e));
        }
        match handle.set_sources(&options.sources) {
            Ok(()) => {
                if debug_enabled {
                    debug!(count = options.sources.len(), "Updated sources");
                }
            }
            Err(e) => failures.push(Error::field("sources", e)),
        }
    } else if let Err(e) = handle.set_sources(&[]) {
        failures.push(Error::field("sources", e));
    }

    // 2. Poster is sticky: absent leaves a previously set poster in place.
    if let Some(poster) = options.poster.as_deref() {
        if let Err(e) = handle.set_poster(poster) {
            failures.push(Error::field("poster", e));
        }
    }

    // 3. Autoplay branches on presence, not truthiness. A play request
    // rejected by the environment's autoplay policy is recoverable.
    if let Some(autoplay) = options.autoplay {
        if let Err(e) = handle.set_autoplay(autoplay) {
            failures.push(Error::field("autoplay", e));
        }
        if autoplay {
            if let Err(e) = handle.play().await {
                if debug_enabled {
                    warn!(error = %e, "Autoplay blocked");
                }
            }
        }
    }

    // 4. Muted, presence-gated like autoplay.
    if let Some(muted) = options.muted {
        if let Err(e) = handle.set_muted(muted) {
            failures.push(Error::field("muted", e));
        }
    }

    // 5. Preload is written straight onto the playable element: the wrapped
    // player treats it as a creation-time hint and does not expose a live
    // setter. The creation-time attribute path in the mount controller
    // stays as well.
    if let Some(preload) = options.preload {
        if let Some(element) = handle.media_element() {
            element.set_attribute("preload", preload.as_str());
        }
    }

    for failure in &failures {
        warn!(code = failure.error_code(), error = %failure, "Field update failed");
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimBackend, SimCall};
    use crate::types::{MediaSource, Preload};

    async fn live_player(
        backend: &SimBackend,
        options: &PlayerOptions,
    ) -> std::sync::Arc<dyn PlayerHandle> {
        use crate::backend::PlayerBackend;
        let factory = backend.load().await.unwrap();
        factory
            .create(crate::dom::MediaElement::new("video"), options)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_non_empty_sources_pause_then_replace() {
        let backend = SimBackend::new();
        let handle = live_player(&backend, &PlayerOptions::default()).await;
        backend.clear_calls();

        let mut options = PlayerOptions::default();
        options.sources = vec![MediaSource::new("b.mp4")];
        let failures = apply_options(handle.as_ref(), &options, false).await;

        assert!(failures.is_empty());
        assert_eq!(
            backend.calls(),
            vec![
                SimCall::Pause,
                SimCall::SetSources(vec!["b.mp4".into()]),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_sources_clear_without_pause() {
        let backend = SimBackend::new();
        let handle = live_player(&backend, &PlayerOptions::with_source("a.mp4")).await;
        backend.clear_calls();

        let failures = apply_options(handle.as_ref(), &PlayerOptions::default(), false).await;

        assert!(failures.is_empty());
        assert_eq!(backend.calls(), vec![SimCall::SetSources(vec![])]);
    }

    #[tokio::test]
    async fn test_absent_optionals_touch_nothing() {
        let backend = SimBackend::new();
        let handle = live_player(&backend, &PlayerOptions::default()).await;
        backend.clear_calls();

        apply_options(handle.as_ref(), &PlayerOptions::default(), false).await;

        // Only the explicit no-media clear; no poster/autoplay/muted calls.
        assert_eq!(backend.calls(), vec![SimCall::SetSources(vec![])]);
    }

    #[tokio::test]
    async fn test_autoplay_true_requests_playback() {
        let backend = SimBackend::new();
        let handle = live_player(&backend, &PlayerOptions::default()).await;
        backend.clear_calls();

        let mut options = PlayerOptions::with_source("a.mp4");
        options.autoplay = Some(true);
        apply_options(handle.as_ref(), &options, false).await;

        let calls = backend.calls();
        assert!(calls.contains(&SimCall::SetAutoplay(true)));
        assert!(calls.contains(&SimCall::Play));
    }

    #[tokio::test]
    async fn test_autoplay_false_never_plays() {
        let backend = SimBackend::new();
        let handle = live_player(&backend, &PlayerOptions::default()).await;
        backend.clear_calls();

        let mut options = PlayerOptions::with_source("a.mp4");
        options.autoplay = Some(false);
        apply_options(handle.as_ref(), &options, false).await;

        let calls = backend.calls();
        assert!(calls.contains(&SimCall::SetAutoplay(false)));
        assert!(!calls.contains(&SimCall::Play));
    }

    #[tokio::test]
    async fn test_blocked_autoplay_is_swallowed() {
        let backend = SimBackend::new();
        backend.block_autoplay(true);
        let handle = live_player(&backend, &PlayerOptions::default()).await;
        backend.clear_calls();

        let mut options = PlayerOptions::with_source("a.mp4");
        options.autoplay = Some(true);
        let failures = apply_options(handle.as_ref(), &options, true).await;

        // The rejection is reported, not returned as a field failure.
        assert!(failures.is_empty());
    }

    #[tokio::test]
    async fn test_preload_written_on_playable_element() {
        let backend = SimBackend::new();
        let handle = live_player(&backend, &PlayerOptions::default()).await;

        let mut options = PlayerOptions::default();
        options.preload = Some(Preload::Auto);
        apply_options(handle.as_ref(), &options, false).await;

        let element = handle.media_element().unwrap();
        assert_eq!(element.attribute("preload").as_deref(), Some("auto"));
    }

    #[tokio::test]
    async fn test_field_failure_does_not_block_others() {
        let backend = SimBackend::new();
        backend.fail_field("poster");
        let handle = live_player(&backend, &PlayerOptions::default()).await;
        backend.clear_calls();

        let mut options = PlayerOptions::with_source("a.mp4");
        options.poster = Some("p.jpg".into());
        options.muted = Some(true);
        let failures = apply_options(handle.as_ref(), &options, false).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].error_code(), "FIELD_UPDATE");
        // Muted still applied after the poster failure.
        assert!(backend.calls().contains(&SimCall::SetMuted(true)));
    }
}
