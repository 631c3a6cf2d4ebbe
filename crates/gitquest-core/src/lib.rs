pub mod stamp;
pub mod types;

pub use stamp::{Clock, FixedClock, HashSource, RandomHashes, SequenceHashes, Stamp, SystemClock};
pub use types::*;
