//! Simulated player backend
//!
//! Deterministic in-memory implementation of the external player seam, used
//! by the test suites and the examples. Every imperative call is journaled,
//! failures can be injected per operation, and module acquisition can be
//! gated so unmount races are reproducible instead of timing-dependent.

use crate::backend::{PlayerBackend, PlayerFactory, PlayerHandle};
use crate::dom::MediaElement;
use crate::error::{Error, Result};
use crate::types::{MediaSource, PlayerOptions};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// One recorded imperative operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimCall {
    Create,
    Pause,
    SetSources(Vec<String>),
    SetPoster(String),
    SetAutoplay(bool),
    Play,
    SetMuted(bool),
    Dispose,
}

#[derive(Default)]
struct Gate {
    release: Notify,
    entered: Notify,
}

impl Gate {
    async fn park(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[derive(Default)]
struct SimShared {
    load_gate: Option<Arc<Gate>>,
    create_gate: Option<Arc<Gate>>,
    calls: Mutex<Vec<SimCall>>,
    fail_load: AtomicBool,
    fail_styles: AtomicBool,
    fail_create: AtomicBool,
    fail_dispose: AtomicBool,
    block_autoplay: AtomicBool,
    failing_fields: Mutex<HashSet<&'static str>>,
    created: AtomicUsize,
    disposed: AtomicUsize,
    last_player: Mutex<Option<Arc<SimPlayer>>>,
}

impl SimShared {
    fn record(&self, call: SimCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn field_fails(&self, field: &str) -> bool {
        self.failing_fields
            .lock()
            .map(|f| f.contains(field))
            .unwrap_or(false)
    }
}

/// Opens the suspension point a gated backend parks on
pub struct SimGate {
    gate: Arc<Gate>,
}

impl SimGate {
    /// Resolves once the gated operation has been entered and parked
    pub async fn entered(&self) {
        self.gate.entered.notified().await;
    }

    /// Let the parked operation proceed
    pub fn release(&self) {
        self.gate.release.notify_one();
    }
}

/// Simulated player library backend
#[derive(Clone, Default)]
pub struct SimBackend {
    shared: Arc<SimShared>,
}

impl SimBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose `load()` parks until the returned gate is released
    pub fn gated() -> (Self, SimGate) {
        let gate = Arc::new(Gate::default());
        let backend = Self {
            shared: Arc::new(SimShared {
                load_gate: Some(gate.clone()),
                ..SimShared::default()
            }),
        };
        (backend, SimGate { gate })
    }

    /// Backend whose `create()` parks until the returned gate is released
    pub fn gated_create() -> (Self, SimGate) {
        let gate = Arc::new(Gate::default());
        let backend = Self {
            shared: Arc::new(SimShared {
                create_gate: Some(gate.clone()),
                ..SimShared::default()
            }),
        };
        (backend, SimGate { gate })
    }

    /// Snapshot of every call recorded so far, in order
    pub fn calls(&self) -> Vec<SimCall> {
        self.shared
            .calls
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    /// Drop the recorded calls (state and counters are kept)
    pub fn clear_calls(&self) {
        if let Ok(mut calls) = self.shared.calls.lock() {
            calls.clear();
        }
    }

    /// Number of players created
    pub fn created_count(&self) -> usize {
        self.shared.created.load(Ordering::SeqCst)
    }

    /// Number of dispose calls observed
    pub fn disposed_count(&self) -> usize {
        self.shared.disposed.load(Ordering::SeqCst)
    }

    /// The most recently created player, if any
    pub fn last_player(&self) -> Option<Arc<SimPlayer>> {
        self.shared
            .last_player
            .lock()
            .ok()
            .and_then(|p| p.clone())
    }

    pub fn fail_load(&self, fail: bool) {
        self.shared.fail_load.store(fail, Ordering::SeqCst);
    }

    pub fn fail_styles(&self, fail: bool) {
        self.shared.fail_styles.store(fail, Ordering::SeqCst);
    }

    pub fn fail_create(&self, fail: bool) {
        self.shared.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn fail_dispose(&self, fail: bool) {
        self.shared.fail_dispose.store(fail, Ordering::SeqCst);
    }

    /// Reject subsequent play() requests the way an autoplay policy would
    pub fn block_autoplay(&self, block: bool) {
        self.shared.block_autoplay.store(block, Ordering::SeqCst);
    }

    /// Make one imperative field operation fail from now on
    pub fn fail_field(&self, field: &'static str) {
        if let Ok(mut fields) = self.shared.failing_fields.lock() {
            fields.insert(field);
        }
    }
}

#[async_trait]
impl PlayerBackend for SimBackend {
    async fn load(&self) -> Result<Arc<dyn PlayerFactory>> {
        if let Some(gate) = &self.shared.load_gate {
            gate.park().await;
        }
        if self.shared.fail_load.load(Ordering::SeqCst) {
            return Err(Error::ModuleLoad("injected load failure".into()));
        }
        Ok(Arc::new(SimFactory {
            shared: self.shared.clone(),
        }))
    }

    async fn load_styles(&self) -> Result<()> {
        if self.shared.fail_styles.load(Ordering::SeqCst) {
            return Err(Error::StyleLoad("injected style failure".into()));
        }
        Ok(())
    }
}

struct SimFactory {
    shared: Arc<SimShared>,
}

#[async_trait]
impl PlayerFactory for SimFactory {
    async fn create(
        &self,
        host: MediaElement,
        options: &PlayerOptions,
    ) -> Result<Arc<dyn PlayerHandle>> {
        if let Some(gate) = &self.shared.create_gate {
            gate.park().await;
        }
        if self.shared.fail_create.load(Ordering::SeqCst) {
            return Err(Error::PlayerCreate("injected create failure".into()));
        }

        let player = Arc::new(SimPlayer {
            shared: self.shared.clone(),
            host,
            state: Mutex::new(SimPlayerState {
                sources: options.sources.clone(),
                poster: options.poster.clone(),
                autoplay: options.autoplay.unwrap_or(false),
                muted: options.muted.unwrap_or(false),
                playing: false,
            }),
            dispose_count: AtomicUsize::new(0),
        });

        self.shared.created.fetch_add(1, Ordering::SeqCst);
        self.shared.record(SimCall::Create);
        if let Ok(mut last) = self.shared.last_player.lock() {
            *last = Some(player.clone());
        }

        Ok(player)
    }
}

#[derive(Debug, Clone)]
struct SimPlayerState {
    sources: Vec<MediaSource>,
    poster: Option<String>,
    autoplay: bool,
    muted: bool,
    playing: bool,
}

/// Simulated live player
pub struct SimPlayer {
    shared: Arc<SimShared>,
    host: MediaElement,
    state: Mutex<SimPlayerState>,
    dispose_count: AtomicUsize,
}

impl SimPlayer {
    /// Current source URLs, in order
    pub fn sources(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.sources.iter().map(|src| src.src.clone()).collect())
            .unwrap_or_default()
    }

    pub fn poster(&self) -> Option<String> {
        self.state.lock().ok().and_then(|s| s.poster.clone())
    }

    pub fn autoplay(&self) -> bool {
        self.state.lock().map(|s| s.autoplay).unwrap_or(false)
    }

    pub fn muted(&self) -> bool {
        self.state.lock().map(|s| s.muted).unwrap_or(false)
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().map(|s| s.playing).unwrap_or(false)
    }

    /// Host element this player was created over
    pub fn host(&self) -> MediaElement {
        self.host.clone()
    }

    pub fn dispose_count(&self) -> usize {
        self.dispose_count.load(Ordering::SeqCst)
    }

    fn guard(&self, field: &'static str) -> Result<()> {
        if self.shared.field_fails(field) {
            return Err(Error::Backend(format!("injected {field} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl PlayerHandle for SimPlayer {
    fn pause(&self) -> Result<()> {
        self.guard("pause")?;
        self.shared.record(SimCall::Pause);
        if let Ok(mut s) = self.state.lock() {
            s.playing = false;
        }
        Ok(())
    }

    fn set_sources(&self, sources: &[MediaSource]) -> Result<()> {
        self.guard("sources")?;
        self.shared.record(SimCall::SetSources(
            sources.iter().map(|s| s.src.clone()).collect(),
        ));
        if let Ok(mut s) = self.state.lock() {
            s.sources = sources.to_vec();
        }
        Ok(())
    }

    fn set_poster(&self, url: &str) -> Result<()> {
        self.guard("poster")?;
        self.shared.record(SimCall::SetPoster(url.to_string()));
        if let Ok(mut s) = self.state.lock() {
            s.poster = Some(url.to_string());
        }
        Ok(())
    }

    fn set_autoplay(&self, autoplay: bool) -> Result<()> {
        self.guard("autoplay")?;
        self.shared.record(SimCall::SetAutoplay(autoplay));
        if let Ok(mut s) = self.state.lock() {
            s.autoplay = autoplay;
        }
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        self.shared.record(SimCall::Play);
        if self.shared.block_autoplay.load(Ordering::SeqCst) {
            return Err(Error::PlaybackBlocked(
                "autoplay policy rejected playback".into(),
            ));
        }
        if let Ok(mut s) = self.state.lock() {
            s.playing = true;
        }
        Ok(())
    }

    fn set_muted(&self, muted: bool) -> Result<()> {
        self.guard("muted")?;
        self.shared.record(SimCall::SetMuted(muted));
        if let Ok(mut s) = self.state.lock() {
            s.muted = muted;
        }
        Ok(())
    }

    fn media_element(&self) -> Option<MediaElement> {
        Some(self.host.clone())
    }

    fn dispose(&self) -> Result<()> {
        self.shared.record(SimCall::Dispose);
        self.shared.disposed.fetch_add(1, Ordering::SeqCst);
        self.dispose_count.fetch_add(1, Ordering::SeqCst);
        if self.shared.fail_dispose.load(Ordering::SeqCst) {
            return Err(Error::Disposal("injected dispose failure".into()));
        }
        if let Ok(mut s) = self.state.lock() {
            s.playing = false;
            s.sources.clear();
        }
        Ok(())
    }
}
