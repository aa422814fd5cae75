pub mod adapters;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod guidance;
pub mod services;

pub use adapters::{Clock, FsStorage, MemoryStorage, Storage, SystemClock};
pub use catalog::CardCatalog;
pub use config::AppConfig;
pub use domain::{Card, Elapsed, Session};
pub use error::{GuideError, Result};
pub use events::{Event, EventKind, Payload};
pub use guidance::{GuidanceEngine, PackAnalysis};
pub use services::{ApiWatcher, Debouncer};
