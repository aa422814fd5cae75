//! Guidance engine
//!
//! Owns the card catalog and session state, routes each event to its handler
//! and keeps the latest guidance text. Callers must serialize access: one
//! load, save or dispatch at a time.

pub mod handlers;
pub mod pack;

pub use handlers::{handler_for, Handler, UNKNOWN_MESSAGE_PREFIX};
pub use pack::{Criterion, PackAnalysis};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::adapters::{Clock, FsStorage, Storage, SystemClock};
use crate::catalog::{self, CardCatalog, IngestReport, ReconcileReport};
use crate::domain::Session;
use crate::error::{GuideError, Result};
use crate::events::{strings, Event, Payload};

pub const INITIAL_GUIDANCE: &str = "Initial Guidance Empty";

pub struct GuidanceEngine {
    catalog: CardCatalog,
    session: Session,
    /// Raw entries from the latest Collection event, waiting for reconciliation
    pending_snapshot: Option<Vec<Payload>>,
    reconciliation_pending: bool,
    /// Default target for `save_collection(None)`
    cache_target: Option<PathBuf>,
    guidance: String,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl Default for GuidanceEngine {
    fn default() -> Self {
        Self::new(Arc::new(FsStorage), Arc::new(SystemClock))
    }
}

impl GuidanceEngine {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog: CardCatalog::new(),
            session: Session::new(),
            pending_snapshot: None,
            reconciliation_pending: false,
            cache_target: None,
            guidance: INITIAL_GUIDANCE.to_string(),
            storage,
            clock,
        }
    }

    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Latest guidance text (or the error text of the last failed dispatch)
    pub fn guidance(&self) -> &str {
        &self.guidance
    }

    pub fn cache_target(&self) -> Option<&Path> {
        self.cache_target.as_deref()
    }

    pub fn pending_snapshot(&self) -> Option<&[Payload]> {
        self.pending_snapshot.as_deref()
    }

    pub fn reconciliation_pending(&self) -> bool {
        self.reconciliation_pending
    }

    pub fn clear_reconciliation_pending(&mut self) {
        self.reconciliation_pending = false;
    }

    // ==================== Price feed ====================

    pub fn ingest_prices(&mut self, text: &str) -> IngestReport {
        catalog::ingest_prices(&mut self.catalog, text)
    }

    pub fn dump_prices(&self) -> String {
        self.catalog.dump_prices()
    }

    // ==================== Collection cache ====================

    /// Load ownership quantities from the cache at `source`.
    ///
    /// `source` becomes the default save target even when it does not exist
    /// yet; a missing cache loads nothing.
    pub fn load_collection(&mut self, source: impl AsRef<Path>) -> Result<usize> {
        let source = source.as_ref();
        // Recorded before the read so a first run with no cache still has a
        // target for the reconciled snapshot
        self.cache_target = Some(source.to_path_buf());

        match self.storage.read_text(source)? {
            Some(text) => {
                let loaded = catalog::load_cache(&mut self.catalog, &text);
                info!("Loaded {} cards from {}", loaded, source.display());
                Ok(loaded)
            }
            None => {
                info!(
                    "Collection cache {} does not exist, nothing to load",
                    source.display()
                );
                Ok(0)
            }
        }
    }

    /// Write every owned card to `target`, or to the last loaded/saved cache.
    pub fn save_collection(&mut self, target: Option<&Path>) -> Result<PathBuf> {
        let target = match target {
            Some(path) => path.to_path_buf(),
            None => self.cache_target.clone().ok_or(GuideError::NoSaveTarget)?,
        };

        let text = catalog::serialize_cache(&self.catalog);
        self.storage.write_text(&target, &text)?;
        info!(
            "Saved {} owned cards to {}",
            text.lines().count(),
            target.display()
        );

        self.cache_target = Some(target.clone());
        Ok(target)
    }

    pub fn dump_collection(&self) -> String {
        self.catalog.dump_collection()
    }

    /// Apply the pending Collection snapshot and persist it.
    ///
    /// Clears the pending flag. Fails without touching the catalog when no
    /// save target is known. When the write fails the reconciled quantities
    /// stay in the catalog, and the snapshot and flag are restored so the
    /// next attempt writes them again.
    pub fn reconcile_collection(&mut self) -> Result<ReconcileReport> {
        self.reconciliation_pending = false;

        if self.pending_snapshot.is_none() {
            debug!("No collection snapshot pending");
            return Ok(ReconcileReport::default());
        }
        if self.cache_target.is_none() {
            return Err(GuideError::NoSaveTarget);
        }

        let snapshot = self.pending_snapshot.take().unwrap_or_default();
        let tally = catalog::tally_snapshot(strings(&snapshot));
        let report = catalog::reconcile_snapshot(&mut self.catalog, &tally);

        if let Err(e) = self.save_collection(None) {
            warn!("Collection cache write failed, snapshot kept for retry: {}", e);
            self.pending_snapshot = Some(snapshot);
            self.reconciliation_pending = true;
            return Err(e);
        }
        Ok(report)
    }

    // ==================== Events ====================

    /// Decode one raw event message and dispatch it.
    pub fn dispatch(&mut self, text: &str) -> Result<String> {
        match Event::parse(text) {
            Ok(event) => self.dispatch_event(&event),
            Err(e) => {
                warn!("Could not decode event: {}", e);
                self.set_guidance(e.to_string());
                Err(e)
            }
        }
    }

    /// Route a decoded event to its handler.
    ///
    /// Unknown types are not errors. A handler failure leaves catalog and
    /// session untouched and its message becomes the current guidance.
    pub fn dispatch_event(&mut self, event: &Event) -> Result<String> {
        match event.kind {
            Some(kind) => debug!("Dispatching {} event", kind),
            None => warn!("{}{}", UNKNOWN_MESSAGE_PREFIX, event.tag),
        }
        let result = handler_for(event.kind)(self, event);

        match result {
            Ok(guidance) => {
                self.set_guidance(guidance.clone());
                Ok(guidance)
            }
            Err(e) => {
                warn!("{} event failed: {}", event.tag, e);
                self.set_guidance(e.to_string());
                Err(e)
            }
        }
    }

    fn set_guidance(&mut self, guidance: String) {
        if guidance != self.guidance {
            info!("{}", guidance);
        }
        self.guidance = guidance;
    }
}
