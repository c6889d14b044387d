//! Lookup Worker Thread
//!
//! Runs remote lookups in a background thread so the host loop never blocks.
//! Receives requests via channel, runs each lookup as its own task on a
//! single-threaded tokio runtime, and sends tagged responses back.
//!
//! Lookups are not serialized: a second request may start before the first one
//! resolves. The coordinator discards responses that are no longer the latest.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

use crate::ResultSet;
use crate::lookup::{Lookup, LookupError};

/// Request to resolve a query remotely
#[derive(Debug)]
pub struct LookupRequest {
    pub query: String,
    /// Unique ID for tracking this request
    pub request_id: u64,
}

/// Outcome of one remote lookup
#[derive(Debug)]
pub struct LookupResponse {
    pub query: String,
    /// Request ID this response belongs to
    pub request_id: u64,
    pub outcome: Result<ResultSet, LookupError>,
}

/// Spawn the lookup worker thread
///
/// The thread exits when `shutdown` is cancelled or every request sender is dropped.
/// Responses for lookups still running at that point are never sent.
pub fn spawn_worker(
    lookup: Lookup,
    request_rx: UnboundedReceiver<LookupRequest>,
    response_tx: Sender<LookupResponse>,
    shutdown: CancellationToken,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("hyper-search-lookup".to_string())
        .spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        log::error!("Failed to create lookup runtime: {}", e);
                        return;
                    }
                };

                rt.block_on(worker_loop(lookup, request_rx, response_tx, shutdown));
            }));

            if let Err(e) = result {
                let panic_msg = if let Some(s) = e.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = e.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                log::error!("Lookup worker thread panicked: {}", panic_msg);
            }
        })
}

/// Main async worker loop - dispatches requests until shutdown or channel close
pub(crate) async fn worker_loop(
    lookup: Lookup,
    mut request_rx: UnboundedReceiver<LookupRequest>,
    response_tx: Sender<LookupResponse>,
    shutdown: CancellationToken,
) {
    log::debug!("Lookup worker started ({})", lookup.name());

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                log::debug!("Lookup worker shutting down");
                break;
            }

            request = request_rx.recv() => {
                let Some(request) = request else {
                    log::debug!("Lookup request channel closed");
                    break;
                };

                let lookup = lookup.clone();
                let response_tx = response_tx.clone();
                let shutdown = shutdown.clone();
                tokio::spawn(async move {
                    handle_request(&lookup, request, &response_tx, &shutdown).await;
                });
            }
        }
    }
}

async fn handle_request(
    lookup: &Lookup,
    request: LookupRequest,
    response_tx: &Sender<LookupResponse>,
    shutdown: &CancellationToken,
) {
    let LookupRequest { query, request_id } = request;
    log::debug!("Lookup {} started for {:?}", request_id, query);

    // A panicking host lookup must still produce a response, or the loading flag would stick
    let outcome = match tokio::spawn(lookup.lookup(query.clone())).await {
        Ok(outcome) => outcome,
        Err(e) => Err(LookupError::Task {
            message: e.to_string(),
        }),
    };

    if shutdown.is_cancelled() {
        log::debug!("Dropping lookup {} finished after shutdown", request_id);
        return;
    }

    match &outcome {
        Ok(results) => log::debug!("Lookup {} returned {} results", request_id, results.len()),
        Err(e) => log::debug!("Lookup {} failed: {}", request_id, e),
    }

    let _ = response_tx.send(LookupResponse {
        query,
        request_id,
        outcome,
    });
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod worker_tests;
