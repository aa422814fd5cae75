//! API Data File Watcher
//!
//! The game client rewrites a single file with its latest API message. This
//! service polls that file, dispatches every new message to the guidance
//! engine and schedules the debounced collection cache write.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::debounce::Debouncer;
use crate::guidance::GuidanceEngine;

pub struct ApiWatcher {
    path: PathBuf,
    engine: GuidanceEngine,
    previous_text: String,
    messages_received: u64,
    collection_write: Debouncer,
}

impl ApiWatcher {
    pub fn new(path: impl Into<PathBuf>, engine: GuidanceEngine, write_delay: Duration) -> Self {
        Self {
            path: path.into(),
            engine,
            previous_text: String::new(),
            messages_received: 0,
            collection_write: Debouncer::new(write_delay),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn engine(&self) -> &GuidanceEngine {
        &self.engine
    }

    pub fn into_engine(self) -> GuidanceEngine {
        self.engine
    }

    pub fn messages_received(&self) -> u64 {
        self.messages_received
    }

    pub fn collection_write_scheduled(&self) -> bool {
        self.collection_write.is_armed()
    }

    /// Read the API file once. Returns guidance when it held a new message.
    pub async fn poll_once(&mut self, now: Instant) -> Option<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => self.handle_text(text, now),
            Err(e) => {
                debug!("Could not read {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Dispatch `text` unless it is the message we already handled.
    pub fn handle_text(&mut self, text: String, now: Instant) -> Option<String> {
        if text == self.previous_text {
            return None;
        }
        self.messages_received += 1;
        debug!("API message #{} received", self.messages_received);

        let guidance = match self.engine.dispatch(&text) {
            Ok(guidance) => guidance,
            Err(e) => e.to_string(),
        };
        self.previous_text = text;

        if self.engine.reconciliation_pending() {
            self.engine.clear_reconciliation_pending();
            self.collection_write.request(now);
            debug!("Collection cache write scheduled");
        }

        Some(guidance)
    }

    /// Run the deferred reconciliation once the quiet period is over.
    ///
    /// A failed write leaves the snapshot pending and is retried after
    /// another quiet period.
    pub fn flush_due_writes(&mut self, now: Instant) {
        if self.collection_write.fire(now) {
            self.reconcile();
            if self.engine.reconciliation_pending() {
                self.engine.clear_reconciliation_pending();
                self.collection_write.request(now);
                debug!("Collection cache write rescheduled");
            }
        }
    }

    fn reconcile(&mut self) {
        match self.engine.reconcile_collection() {
            Ok(report) => info!(
                "Collection cache updated ({} cards, {} without prices)",
                report.applied,
                report.unmatched.len()
            ),
            Err(e) => error!("Collection reconciliation failed: {}", e),
        }
    }

    /// Poll until `shutdown` resolves, handing each new guidance to `on_guidance`.
    ///
    /// A scheduled cache write is flushed before returning.
    pub async fn run<S, F>(mut self, poll_interval: Duration, shutdown: S, mut on_guidance: F) -> Self
    where
        S: Future<Output = ()>,
        F: FnMut(&str),
    {
        info!(
            "Watching {} every {}ms",
            self.path.display(),
            poll_interval.as_millis()
        );

        let mut tick = tokio::time::interval(poll_interval);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down API watcher");
                    break;
                }
                _ = tick.tick() => {
                    let now = Instant::now();
                    if let Some(guidance) = self.poll_once(now).await {
                        on_guidance(&guidance);
                    }
                    self.flush_due_writes(now);
                }
            }
        }

        if self.collection_write.take() {
            self.reconcile();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemoryStorage, Storage, SystemClock};
    use crate::error::Result;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Memory storage whose writes fail until `allow_writes` is set
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        allow_writes: AtomicBool,
    }

    impl Storage for FlakyStorage {
        fn read_text(&self, path: &Path) -> Result<Option<String>> {
            self.inner.read_text(path)
        }

        fn write_text(&self, path: &Path, text: &str) -> Result<()> {
            if !self.allow_writes.load(Ordering::SeqCst) {
                return Err(std::io::Error::other("disk full").into());
            }
            self.inner.write_text(path, text)
        }
    }

    fn watcher(storage: Arc<MemoryStorage>) -> ApiWatcher {
        let mut engine = GuidanceEngine::new(storage, Arc::new(SystemClock));
        engine.ingest_prices("Burn ... 0 PLATINUM ... 12 GOLD\nAlwyn ... 1 PLATINUM ... 90 GOLD\n");
        engine.load_collection("collection.cache").unwrap();
        ApiWatcher::new("api.data", engine, Duration::from_secs(10))
    }

    #[test]
    fn test_same_message_is_handled_once() {
        let mut w = watcher(Arc::new(MemoryStorage::new()));
        let now = Instant::now();
        let msg = r#"["Logout","Dylan"]"#.to_string();

        assert!(w.handle_text(msg.clone(), now).is_some());
        assert!(w.handle_text(msg, now).is_none());
        assert_eq!(w.messages_received(), 1);
    }

    #[test]
    fn test_errors_become_guidance() {
        let mut w = watcher(Arc::new(MemoryStorage::new()));
        let guidance = w
            .handle_text(r#"["DraftCardPicked","P",["Nope"]]"#.to_string(), Instant::now())
            .unwrap();
        assert_eq!(guidance, "Card not found: Nope");
    }

    #[test]
    fn test_collection_write_is_debounced() {
        let storage = Arc::new(MemoryStorage::new());
        let mut w = watcher(storage.clone());
        let start = Instant::now();

        w.handle_text(r#"["Collection","Dylan",["Burn"]]"#.to_string(), start);
        assert!(w.collection_write_scheduled());
        assert!(!w.engine().reconciliation_pending());

        let later = start + Duration::from_secs(5);
        w.handle_text(r#"["Collection","Dylan",["Burn","Burn","Alwyn"]]"#.to_string(), later);

        w.flush_due_writes(start + Duration::from_secs(12));
        assert_eq!(storage.contents("collection.cache"), None);

        w.flush_due_writes(later + Duration::from_secs(10));
        assert_eq!(
            storage.contents("collection.cache").as_deref(),
            Some("1 : Alwyn\n2 : Burn\n")
        );
        assert!(!w.collection_write_scheduled());
    }

    #[test]
    fn test_failed_collection_write_is_retried() {
        let storage = Arc::new(FlakyStorage::default());
        let mut engine = GuidanceEngine::new(storage.clone(), Arc::new(SystemClock));
        engine.ingest_prices("Burn ... 0 PLATINUM ... 12 GOLD\n");
        engine.load_collection("collection.cache").unwrap();
        let mut w = ApiWatcher::new("api.data", engine, Duration::from_secs(10));
        let start = Instant::now();

        w.handle_text(r#"["Collection","Dylan",["Burn"]]"#.to_string(), start);
        w.flush_due_writes(start + Duration::from_secs(10));
        assert!(w.collection_write_scheduled());
        assert_eq!(storage.inner.contents("collection.cache"), None);

        storage.allow_writes.store(true, Ordering::SeqCst);
        w.flush_due_writes(start + Duration::from_secs(20));
        assert!(!w.collection_write_scheduled());
        assert_eq!(
            storage.inner.contents("collection.cache").as_deref(),
            Some("1 : Burn\n")
        );
    }

    #[tokio::test]
    async fn test_run_polls_file_and_flushes_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let api = dir.path().join("api.data");
        std::fs::write(&api, r#"["Collection","Dylan",["Burn"]]"#).unwrap();

        let storage = Arc::new(MemoryStorage::new());
        let mut engine = GuidanceEngine::new(storage.clone(), Arc::new(SystemClock));
        engine.ingest_prices("Burn ... 0 PLATINUM ... 12 GOLD\n");
        engine.load_collection("collection.cache").unwrap();

        let mut seen = Vec::new();
        let w = ApiWatcher::new(&api, engine, Duration::from_secs(60))
            .run(
                Duration::from_millis(10),
                tokio::time::sleep(Duration::from_millis(150)),
                |g| seen.push(g.to_string()),
            )
            .await;

        assert_eq!(w.messages_received(), 1);
        assert_eq!(seen, vec!["Processing Collection Event".to_string()]);
        assert_eq!(
            storage.contents("collection.cache").as_deref(),
            Some("1 : Burn\n")
        );
    }
}
