//! # Sponge Utils
//!
//! Value types and small helpers shared by every sponge crate.

pub mod logger;
pub mod time;
pub mod types;

pub use time::{Clock, ManualClock, SystemClock};
pub use types::{BlockPos, Material};
