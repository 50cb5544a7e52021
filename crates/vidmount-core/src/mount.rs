//! Mount controller - owns the player lifecycle
//!
//! Sits at the seam between a declarative host that re-renders at will and a
//! stateful external player with its own async initialization and disposal
//! protocol. The controller:
//! - acquires the player exactly once per mount (`begin`)
//! - reconciles every configuration notification onto the live player
//!   without recreating it (`apply`)
//! - disposes the player and tears down the owned subtree exactly once per
//!   unmount, regardless of how far setup got (`teardown`)
//!
//! State machine: `Unmounted -> Initializing -> Ready -> Disposing ->
//! Unmounted`, with `Initializing -> Unmounted` as the short circuit taken
//! when unmount races ahead of setup. There is no true cancellation of the
//! module load; liveness is re-checked after every suspension point instead.

use crate::backend::{PlayerBackend, PlayerHandle};
use crate::dom::{HostContainer, MediaElement, HOST_ELEMENT_CLASS};
use crate::error::{Error, Result};
use crate::fingerprint::Fingerprint;
use crate::reconcile;
use crate::types::{MountId, MountState, PlayerOptions};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, error, info, instrument, warn};

/// One-shot hook invoked with the live player once it is ready
pub type ReadyHook = Box<dyn Fn(Arc<dyn PlayerHandle>) + Send + Sync>;

/// Player lifecycle adapter for a single mount point
///
/// One instance per mount point in the host tree. The player reference and
/// the mounted flag are private to the instance; nothing else holds the
/// player strongly.
pub struct PlayerMount {
    /// Unique mount ID
    id: MountId,
    /// External player library seam
    backend: Arc<dyn PlayerBackend>,
    /// Configuration the player is created with
    initial_options: PlayerOptions,
    /// Current lifecycle state
    state: RwLock<MountState>,
    /// State change broadcaster
    state_tx: watch::Sender<MountState>,
    /// Liveness guard checked after every suspension point
    mounted: AtomicBool,
    /// The one live player, if setup has completed
    player: RwLock<Option<Arc<dyn PlayerHandle>>>,
    /// Owned subtree the host element is attached to
    container: HostContainer,
    /// Fingerprint of the last applied configuration
    last_fingerprint: RwLock<Option<Fingerprint>>,
    /// Ready hook
    on_ready: Option<ReadyHook>,
    /// Gates diagnostic chatter only; no behavioral effect
    debug: bool,
}

impl PlayerMount {
    /// Create an adapter for the given backend and initial configuration
    pub fn new(backend: Arc<dyn PlayerBackend>, options: PlayerOptions) -> Self {
        let (state_tx, _) = watch::channel(MountState::Unmounted);

        Self {
            id: MountId::new(),
            backend,
            initial_options: options,
            state: RwLock::new(MountState::Unmounted),
            state_tx,
            mounted: AtomicBool::new(false),
            player: RwLock::new(None),
            container: HostContainer::new(),
            last_fingerprint: RwLock::new(None),
            on_ready: None,
            debug: false,
        }
    }

    /// Install a hook invoked once the player reports ready
    pub fn with_on_ready(
        mut self,
        hook: impl Fn(Arc<dyn PlayerHandle>) + Send + Sync + 'static,
    ) -> Self {
        self.on_ready = Some(Box::new(hook));
        self
    }

    /// Enable diagnostic reporting
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Get mount ID
    pub fn id(&self) -> MountId {
        self.id
    }

    /// Get current lifecycle state
    pub async fn state(&self) -> MountState {
        *self.state.read().await
    }

    /// Subscribe to lifecycle state changes
    pub fn subscribe_state(&self) -> watch::Receiver<MountState> {
        self.state_tx.subscribe()
    }

    /// The owned container; the host tree may hold this to observe the
    /// adapter's subtree
    pub fn container(&self) -> HostContainer {
        self.container.clone()
    }

    /// True between mount and unmount
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// The live player, if setup has completed
    pub async fn player(&self) -> Option<Arc<dyn PlayerHandle>> {
        self.player.read().await.clone()
    }

    /// Transition to new state, validating against the state machine
    async fn set_state(&self, new_state: MountState) -> Result<()> {
        let current = *self.state.read().await;

        if !current.can_transition_to(new_state) {
            return Err(Error::InvalidStateTransition {
                from: current.to_string(),
                to: new_state.to_string(),
            });
        }

        *self.state.write().await = new_state;
        let _ = self.state_tx.send(new_state);

        info!(from = %current, to = %new_state, "Mount state transition");
        Ok(())
    }

    /// Force the state, bypassing validation; used by teardown and by setup
    /// abandonment, where the machine must always come back to rest
    async fn force_state(&self, new_state: MountState) {
        let current = *self.state.read().await;
        if current == new_state {
            return;
        }
        *self.state.write().await = new_state;
        let _ = self.state_tx.send(new_state);
        info!(from = %current, to = %new_state, "Mount state transition");
    }

    /// Mount setup: acquire the player exactly once
    ///
    /// Invoked by the host's mount hook. Re-invocation while a player is
    /// held or setup is in flight returns immediately with no side effects.
    /// An acquisition failure reverts the mount to `Unmounted` and leaves it
    /// inert; a future `begin()` (re-mount) retries from scratch.
    #[instrument(skip(self), fields(mount_id = %self.id))]
    pub async fn begin(&self) -> Result<()> {
        if self.player.read().await.is_some() {
            debug!("begin() with a live player; ignoring");
            return Ok(());
        }
        if *self.state.read().await != MountState::Unmounted {
            debug!("begin() re-entered during setup; ignoring");
            return Ok(());
        }

        self.mounted.store(true, Ordering::SeqCst);
        self.set_state(MountState::Initializing).await?;

        let options = self.initial_options.clone();

        // Suspension point: module acquisition. Cannot be aborted; the
        // liveness checks below stand in for cancellation.
        let factory = match self.backend.load().await {
            Ok(factory) => factory,
            Err(e) => {
                error!(code = e.error_code(), error = %e, "Player module load failed");
                self.force_state(MountState::Unmounted).await;
                return Err(e);
            }
        };

        // Style loading may fail silently; the embedding can provide the
        // styles globally instead.
        if let Err(e) = self.backend.load_styles().await {
            if self.debug {
                debug!(error = %e, "Style load failed; continuing");
            }
        }

        if !self.is_mounted() {
            debug!("Unmounted during module load; abandoning setup");
            self.force_state(MountState::Unmounted).await;
            return Ok(());
        }

        let host = self.build_host_element(&options);
        self.container.append(host.clone());

        // Suspension point: creation, resolving when the player reports
        // ready.
        let handle = match factory.create(host.clone(), &options).await {
            Ok(handle) => handle,
            Err(e) => {
                error!(code = e.error_code(), error = %e, "Player creation failed");
                self.container.remove(&host);
                self.force_state(MountState::Unmounted).await;
                return Err(e);
            }
        };

        if !self.is_mounted() {
            // Unmount raced creation. Finishing setup after unmount is a
            // no-op: discard the fresh player and leave nothing behind.
            debug!("Unmounted during player creation; discarding player");
            if let Err(e) = handle.dispose() {
                warn!(code = e.error_code(), error = %e, "Disposal of abandoned player failed");
            }
            self.container.clear();
            self.force_state(MountState::Unmounted).await;
            return Ok(());
        }

        *self.player.write().await = Some(handle.clone());
        // The creation configuration counts as applied, so the host's next
        // notification with the same content reconciles nothing.
        *self.last_fingerprint.write().await = Some(Fingerprint::of(&options));
        self.set_state(MountState::Ready).await?;

        if self.debug {
            debug!("Player created");
        }
        info!("Player ready");

        if let Some(on_ready) = &self.on_ready {
            on_ready(handle);
        }

        Ok(())
    }

    /// Reconciliation trigger: called with the configuration on every host
    /// notification
    ///
    /// A call before the player exists is a pure no-op (the host notifies
    /// again, so deferral needs no queue). A call whose tracked subset
    /// fingerprints equal to the last applied configuration performs zero
    /// imperative operations.
    #[instrument(skip(self, options), fields(mount_id = %self.id))]
    pub async fn apply(&self, options: &PlayerOptions) {
        let held = { self.player.read().await.clone() };
        let handle = match held {
            Some(handle) => handle,
            None => {
                debug!("apply() before player exists; deferred");
                return;
            }
        };

        let fingerprint = Fingerprint::of(options);
        if self.last_fingerprint.read().await.as_ref() == Some(&fingerprint) {
            debug!("Configuration unchanged; skipping reconciliation");
            return;
        }

        let failures = reconcile::apply_options(handle.as_ref(), options, self.debug).await;
        if !failures.is_empty() {
            warn!(failed_fields = failures.len(), "Reconciliation completed with field failures");
        }

        *self.last_fingerprint.write().await = Some(fingerprint);
    }

    /// Unmount teardown: dispose the player and clear the owned subtree
    ///
    /// Safe to call at any point of the lifecycle, any number of times.
    /// Disposal failures are reported and never retried; the container is
    /// cleared unconditionally so nothing survives into a later mount.
    #[instrument(skip(self), fields(mount_id = %self.id))]
    pub async fn teardown(&self) {
        self.mounted.store(false, Ordering::SeqCst);

        let handle = self.player.write().await.take();
        if let Some(handle) = handle {
            self.force_state(MountState::Disposing).await;
            if self.debug {
                debug!("Disposing player");
            }
            if let Err(e) = handle.dispose() {
                warn!(code = e.error_code(), error = %e, "Player disposal failed; continuing teardown");
            }
        }

        self.container.clear();
        *self.last_fingerprint.write().await = None;

        // An in-flight setup owns the Initializing state; its liveness check
        // finishes the transition to Unmounted.
        if *self.state.read().await != MountState::Initializing {
            self.force_state(MountState::Unmounted).await;
        }
    }

    /// Build the playable host element with its creation-time attributes
    fn build_host_element(&self, options: &PlayerOptions) -> MediaElement {
        let host = MediaElement::new("video");
        host.set_class_name(HOST_ELEMENT_CLASS);
        if options.inline_playback {
            host.set_attribute("playsinline", "");
        }
        host.set_attribute("preload", options.effective_preload().as_str());
        if let Some(poster) = &options.poster {
            host.set_attribute("poster", poster);
        }
        host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBackend;
    use crate::types::Preload;

    #[tokio::test]
    async fn test_begin_reaches_ready() {
        let backend = Arc::new(SimBackend::new());
        let mount = PlayerMount::new(backend.clone(), PlayerOptions::with_source("a.mp4"));

        assert_eq!(mount.state().await, MountState::Unmounted);
        mount.begin().await.unwrap();

        assert_eq!(mount.state().await, MountState::Ready);
        assert!(mount.is_mounted());
        assert!(mount.player().await.is_some());
        assert_eq!(backend.created_count(), 1);
        assert_eq!(mount.container().child_count(), 1);
    }

    #[tokio::test]
    async fn test_host_element_creation_attributes() {
        let backend = Arc::new(SimBackend::new());
        let mut options = PlayerOptions::with_source("a.mp4");
        options.poster = Some("p.jpg".into());
        options.preload = Some(Preload::Metadata);
        let mount = PlayerMount::new(backend, options);

        mount.begin().await.unwrap();

        let host = mount.container().first().unwrap();
        assert_eq!(host.tag(), "video");
        assert_eq!(host.class_name(), HOST_ELEMENT_CLASS);
        assert_eq!(host.attribute("playsinline").as_deref(), Some(""));
        assert_eq!(host.attribute("preload").as_deref(), Some("metadata"));
        assert_eq!(host.attribute("poster").as_deref(), Some("p.jpg"));
    }

    #[tokio::test]
    async fn test_preload_attribute_defaults_to_none() {
        let backend = Arc::new(SimBackend::new());
        let mount = PlayerMount::new(backend, PlayerOptions::with_source("a.mp4"));
        mount.begin().await.unwrap();

        let host = mount.container().first().unwrap();
        assert_eq!(host.attribute("preload").as_deref(), Some("none"));
    }

    #[tokio::test]
    async fn test_state_subscription_observes_lifecycle() {
        let backend = Arc::new(SimBackend::new());
        let mount = PlayerMount::new(backend, PlayerOptions::default());
        let rx = mount.subscribe_state();

        mount.begin().await.unwrap();
        assert_eq!(*rx.borrow(), MountState::Ready);

        mount.teardown().await;
        assert_eq!(*rx.borrow(), MountState::Unmounted);
    }

    #[tokio::test]
    async fn test_apply_before_begin_is_noop() {
        let backend = Arc::new(SimBackend::new());
        let mount = PlayerMount::new(backend.clone(), PlayerOptions::default());

        mount.apply(&PlayerOptions::with_source("a.mp4")).await;

        assert!(backend.calls().is_empty());
        assert_eq!(mount.state().await, MountState::Unmounted);
    }

    #[tokio::test]
    async fn test_initial_options_count_as_applied() {
        let backend = Arc::new(SimBackend::new());
        let options = PlayerOptions::with_source("a.mp4");
        let mount = PlayerMount::new(backend.clone(), options.clone());

        mount.begin().await.unwrap();
        backend.clear_calls();

        // Host hands back a structurally identical configuration object.
        mount.apply(&options.clone()).await;
        assert!(backend.calls().is_empty());
    }
}
