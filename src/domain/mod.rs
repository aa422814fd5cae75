pub mod card;
pub mod session;

pub use card::*;
pub use session::*;
