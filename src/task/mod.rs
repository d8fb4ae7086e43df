//! Portable boundary of the task switch.
//!
//! All register assumptions stay inside `crate::arch`; this module only deals
//! in opaque [`TaskContext`] values and the lock handed across a switch.

mod context;
mod frame;
mod switch;

#[cfg(test)]
mod tests;

pub use context::TaskContext;
pub use frame::{FrameError, InitialFrame, TaskEntry, TaskExit, init_task_stack, required_stack_size};
pub use switch::switch_task;

pub(crate) use switch::release_on_first_run;
