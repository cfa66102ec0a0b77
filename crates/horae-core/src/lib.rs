//! Horae core: instants, clocks, errors and formatting helpers shared by the
//! range types.

pub mod clock;
pub mod cloner;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod instant;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult};
pub use instant::Instant;
