//! Vidmount Core - Player Lifecycle Adapter
//!
//! Embeds a stateful, externally-owned media player behind a declarative
//! configuration surface:
//! - Exactly-once async acquisition of the player per mount
//! - Deterministic, exactly-once disposal per unmount, whatever setup raced
//! - Fingerprint-gated reconciliation of configuration changes onto the
//!   live player, without recreating it
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                    Vidmount Core                       │
//! ├────────────────────────────────────────────────────────┤
//! │                                                        │
//! │   host notifications          mount / unmount          │
//! │          │                          │                  │
//! │   ┌──────┴───────┐          ┌───────┴──────┐           │
//! │   │  Fingerprint │          │    Mount     │           │
//! │   │    Differ    │─────────▶│  Controller  │           │
//! │   └──────────────┘          └───────┬──────┘           │
//! │                                     │                  │
//! │   ┌──────────────┐          ┌───────┴──────┐           │
//! │   │  Reconciler  │◀─────────│    Player    │           │
//! │   │              │─────────▶│    Handle    │           │
//! │   └──────────────┘          └──────────────┘           │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! The `PlayerBackend` / `PlayerFactory` / `PlayerHandle` traits are the
//! seam to the real player library; `sim` provides a deterministic
//! in-memory implementation for tests and embedding development.

pub mod backend;
pub mod dom;
pub mod error;
pub mod fingerprint;
pub mod mount;
mod reconcile;
pub mod sim;
pub mod types;

pub use backend::{PlayerBackend, PlayerFactory, PlayerHandle};
pub use dom::{HostContainer, MediaElement, HOST_ELEMENT_CLASS};
pub use error::{Error, Result};
pub use fingerprint::Fingerprint;
pub use mount::{PlayerMount, ReadyHook};
pub use sim::{SimBackend, SimCall, SimGate, SimPlayer};
pub use types::{MediaSource, MountId, MountState, PlayerOptions, Preload};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the adapter library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "Vidmount Core initialized");
}
