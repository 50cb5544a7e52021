//! Full mount lifecycle against the simulated backend
//!
//! Run with: cargo run --example mount_lifecycle

use anyhow::Result;
use std::sync::Arc;
use vidmount_core::{PlayerMount, PlayerOptions, SimBackend};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidmount_core=debug".into()),
        )
        .init();

    vidmount_core::init();

    let backend = Arc::new(SimBackend::new());

    let mut options = PlayerOptions::with_source("https://cdn.example.com/v/main.mp4");
    options.muted = Some(true);

    let mount = PlayerMount::new(backend.clone(), options)
        .with_debug(true)
        .with_on_ready(|_player| {
            println!("player ready");
        });

    // Host mounts the adapter.
    mount.begin().await?;

    // Host re-renders with a new source and wants playback.
    let mut next = PlayerOptions::with_source("https://cdn.example.com/v/other.mp4");
    next.muted = Some(true);
    next.autoplay = Some(true);
    mount.apply(&next).await;

    // Host re-renders with identical content: nothing happens.
    let mut same = PlayerOptions::with_source("https://cdn.example.com/v/other.mp4");
    same.muted = Some(true);
    same.autoplay = Some(true);
    mount.apply(&same).await;

    // Host unmounts the adapter.
    mount.teardown().await;

    println!("imperative calls: {:#?}", backend.calls());
    println!("players created: {}", backend.created_count());
    println!("players disposed: {}", backend.disposed_count());

    Ok(())
}
