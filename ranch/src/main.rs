use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use eosin_common::shutdown::shutdown_signal;
use ranch::args::RanchServerArgs;
use ranch::id::UuidNameGenerator;
use ranch::reconciler::Reconciler;
use ranch::request_queue::RequestQueue;
use ranch::store::memory::InMemoryStore;
use ranch::store::Store;
use ranch::types::BoskosConfig;
use ranch::Ranch;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = RanchServerArgs::parse();
    let cancel = CancellationToken::new();

    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let queue = Arc::new(RequestQueue::new());
    let names = Arc::new(UuidNameGenerator);
    let ranch = Arc::new(Ranch::new(store.clone(), queue.clone(), names.clone()));
    let reconciler = Arc::new(Reconciler::new(store.clone(), names));

    // The declarative configuration is handed to the process by whatever
    // embeds this binary; there is no config-file loader here (see
    // SPEC_FULL.md §1).
    let config = BoskosConfig::default();
    reconciler.sync_config(&config).await?;

    let gc_handle = queue.clone().spawn_gc(
        args.request_ttl.into(),
        args.request_gc_interval.into(),
        cancel.clone(),
    );

    let reset_handle = tokio::spawn(reset_loop(
        ranch.clone(),
        args.reset_expiry.into(),
        args.reset_interval.into(),
        cancel.clone(),
    ));

    let reconcile_handle = tokio::spawn(reconcile_loop(
        reconciler.clone(),
        args.reconcile_interval.into(),
        cancel.clone(),
    ));

    shutdown_signal().await;
    tracing::info!("shutting down");
    cancel.cancel();

    let _ = tokio::join!(gc_handle, reset_handle, reconcile_handle);
    Ok(())
}

async fn reset_loop(
    ranch: Arc<Ranch>,
    expiry: std::time::Duration,
    interval: std::time::Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                // Placeholder pool/state pairs; a real deployment drives
                // this from the same BoskosConfig handed to the reconciler.
                for (rtype, state, dest) in known_reset_targets() {
                    match ranch.reset(rtype, state, expiry, dest).await {
                        Ok(reclaimed) if !reclaimed.is_empty() => {
                            tracing::info!(rtype, state, count = reclaimed.len(), "reset reclaimed resources");
                        }
                        Ok(_) => {}
                        Err(err) => tracing::warn!(rtype, state, %err, "reset sweep failed"),
                    }
                }
            }
        }
    }
}

/// `Ranch::reset` needs an explicit `(type, state, dest_state)` per pool —
/// there is no "reset everything" operation (§4.C), and which pools/states
/// to reap is exactly the kind of deployment-specific policy that lives in
/// the `BoskosConfig` this binary's config-file loader is not responsible
/// for parsing (§1's explicit non-goal). Left empty here rather than
/// invented: a real deployment derives this list from the same config it
/// hands to `Reconciler::sync_config`, not from a constant in this binary.
fn known_reset_targets() -> Vec<(&'static str, &'static str, &'static str)> {
    Vec::new()
}

async fn reconcile_loop(reconciler: Arc<Reconciler>, interval: std::time::Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(err) = reconciler.update_all_dynamic_resources().await {
                    tracing::warn!(%err, "dynamic resource reconcile failed");
                }
            }
        }
    }
}
