//! Synchronization shared between the scheduler and the switch.

mod sched_lock;
mod up;

pub use sched_lock::{SchedulerLock, SchedulerLockGuard};
pub use up::CoreCell;
