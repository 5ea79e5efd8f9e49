//! Readiness and liveness probes.
//!
//! Readiness is not a flag: once startup hands over the opened collections,
//! every `/health/ready` request re-reads each of them, so a deleted or
//! corrupted data file turns the probe red without a restart.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use actix_web::{HttpResponse, get, http::header, web};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::{Record, RecordStore, RecordStoreError};

/// A collection whose backing can be checked on demand.
#[async_trait]
pub trait CollectionProbe: Send + Sync {
    /// Collection name for logs.
    fn collection(&self) -> &str;

    /// Read and decode the collection without changing it.
    async fn probe(&self) -> Result<(), RecordStoreError>;
}

#[async_trait]
impl<R: Record> CollectionProbe for RecordStore<R> {
    fn collection(&self) -> &str {
        RecordStore::collection(self)
    }

    async fn probe(&self) -> Result<(), RecordStoreError> {
        RecordStore::probe(self).await
    }
}

/// Shared probe state.
///
/// Starts not ready and live. [`HealthState::mark_ready`] hands over the
/// collections to check; [`HealthState::mark_unhealthy`] fails liveness
/// while the server drains.
pub struct HealthState {
    collections: OnceLock<Vec<Arc<dyn CollectionProbe>>>,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            collections: OnceLock::new(),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a state that is live but not yet ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that startup finished and which collections readiness covers.
    ///
    /// Only the first call takes effect.
    pub fn mark_ready(&self, collections: Vec<Arc<dyn CollectionProbe>>) {
        if self.collections.set(collections).is_err() {
            debug!("health state already marked ready");
        }
    }

    /// Flag the service as unhealthy so liveness checks fail fast during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Whether the process is still accepting work.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Whether startup finished and every collection currently reads back.
    pub async fn is_ready(&self) -> bool {
        let Some(collections) = self.collections.get() else {
            return false;
        };
        for collection in collections {
            if let Err(err) = collection.probe().await {
                warn!(
                    collection = collection.collection(),
                    error = %err,
                    "readiness probe failed"
                );
                return false;
            }
        }
        true
    }
}

fn probe_response(probe_ok: bool) -> HttpResponse {
    let mut response = if probe_ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };

    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness probe. 200 when every collection reads and decodes; 503 during
/// startup or while any collection is unreadable.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Every collection is readable"),
        (status = 503, description = "Starting up, or a collection cannot be read")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe_response(state.is_ready().await)
}

/// Liveness probe. 200 until shutdown begins.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe_response(state.is_alive())
}
