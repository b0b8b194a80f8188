//! Monotonic time and cooperative timer scheduling
//!
//! Every test owns a [`Scheduler`] whose timers carry the test's own event
//! values. The host polls the test, the test drains due timers through its
//! transition function, and leaving a timed phase cancels the handle.

mod clock;
mod scheduler;

pub use clock::{Clock, ManualClock, MonotonicClock, SharedClock, Timestamp};
pub use scheduler::{Fired, Scheduler, TimerHandle};
