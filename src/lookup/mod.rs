//! Debounced remote lookups: quiet-period scheduling, request identities and
//! the per-dialog option cache.

mod clock;
mod debounce;
mod options;

pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::{Debouncer, RequestId};
pub use options::{LoadState, OptionLookup};
