//! Host-side services around the guidance engine
//!
//! - API data file watcher (polling + dispatch)
//! - Debounced collection cache writes

pub mod api_watcher;
pub mod debounce;

pub use api_watcher::ApiWatcher;
pub use debounce::Debouncer;
