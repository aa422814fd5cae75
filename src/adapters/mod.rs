//! Collaborators outside the guidance engine (cache storage, clock, price feed)

pub mod clock;
pub mod price_feed;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use price_feed::{PriceFeedClient, PriceSource};
pub use storage::{FsStorage, MemoryStorage, Storage};
