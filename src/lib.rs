//! Stack-switching core of a cooperative multitasking runtime for targets
//! without an operating system.
//!
//! A task is suspended only inside [`switch_task`], which parks its
//! resumption address on its own stack and hands the CPU to another stack
//! pointer. A task that has never run is resumed into a per-architecture
//! trampoline laid down by [`init_task_stack`], which releases the
//! [`SchedulerLock`] on the task's behalf and makes a returning entry
//! function fall into the task's exit routine.
//!
//! Scheduling policy and stack allocation belong to the caller.
#![cfg_attr(not(test), no_std)]

mod arch;
pub mod config;
pub mod logging;
#[cfg(all(
    any(target_arch = "riscv32", target_arch = "riscv64"),
    target_os = "none"
))]
mod sbi;
pub mod sync;
pub mod task;

pub use sync::{CoreCell, SchedulerLock, SchedulerLockGuard};
pub use task::{
    FrameError, InitialFrame, TaskContext, TaskEntry, TaskExit, init_task_stack,
    required_stack_size, switch_task,
};

/// Name of the architecture variant compiled into this build.
pub const ARCH: &str = arch::NAME;
