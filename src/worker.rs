//! Lookup Worker Thread
//!
//! Runs lookup requests on a background thread so the resolver never blocks.
//! Receives tagged requests via channel, runs each one as its own task on a
//! current-thread tokio runtime, and sends tagged responses back. Tasks are
//! independent, so responses can arrive in any order; the resolver decides
//! which ones still matter.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::lookup::{LookupError, LookupService, ResolveOutcome, Suggestion};

/// Request messages sent to the lookup worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupRequest {
    /// Fetch suggestions for a query
    Suggest {
        query: String,
        /// Query generation at the time the lookup was issued
        generation: u64,
    },
    /// Resolve submitted text to one BBL
    Resolve { address: String, request_id: u64 },
}

/// Response messages received from the lookup worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResponse {
    Suggestions {
        /// Generation copied from the request
        generation: u64,
        result: Result<Vec<Suggestion>, LookupError>,
    },
    Resolved {
        /// Request ID copied from the request
        request_id: u64,
        result: Result<ResolveOutcome, LookupError>,
    },
}

pub type RequestSender = UnboundedSender<LookupRequest>;
pub type RequestReceiver = UnboundedReceiver<LookupRequest>;

/// Spawn the lookup worker thread
///
/// The worker runs until the request channel is closed or `shutdown` is
/// cancelled. Requests still in flight at that point are dropped.
pub fn spawn_worker<S: LookupService>(
    service: S,
    request_rx: RequestReceiver,
    response_tx: Sender<LookupResponse>,
    shutdown: CancellationToken,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("bblsearch-lookup".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to start lookup runtime: {}", e);
                    return;
                }
            };

            runtime.block_on(worker_loop(
                Arc::new(service),
                request_rx,
                response_tx,
                shutdown,
            ));
        })
}

/// Main worker loop - processes requests until the channel is closed
async fn worker_loop<S: LookupService>(
    service: Arc<S>,
    mut request_rx: RequestReceiver,
    response_tx: Sender<LookupResponse>,
    shutdown: CancellationToken,
) {
    loop {
        let request = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            request = request_rx.recv() => match request {
                Some(request) => request,
                None => break,
            },
        };

        let service = Arc::clone(&service);
        let response_tx = response_tx.clone();
        tokio::spawn(async move {
            let response = handle_request(service.as_ref(), request).await;
            if response_tx.send(response).is_err() {
                // Resolver is gone; nothing left to deliver to
                log::debug!("Dropping lookup response: receiver disconnected");
            }
        });
    }

    log::debug!("Lookup worker shutting down");
}

/// Run one request against the service and tag the response
pub(crate) async fn handle_request<S: LookupService + ?Sized>(
    service: &S,
    request: LookupRequest,
) -> LookupResponse {
    match request {
        LookupRequest::Suggest { query, generation } => {
            log::debug!("Fetching suggestions for {:?} (generation {})", query, generation);
            let result = service.autocomplete(&query).await;
            LookupResponse::Suggestions { generation, result }
        }
        LookupRequest::Resolve {
            address,
            request_id,
        } => {
            log::debug!("Resolving {:?} (request {})", address, request_id);
            let result = service.resolve(&address).await;
            LookupResponse::Resolved { request_id, result }
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod worker_tests;
