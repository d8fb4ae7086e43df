//! Architecture variants of the switch and the trampoline.
//!
//! Every variant provides the same items and must satisfy the same contract:
//!
//! - `switch_task(save, next)` pushes a resumption address, stores the stack
//!   pointer into `save`, loads `next`, pops a resumption address and jumps
//!   to it. Callee-saved registers are left to the calling convention by
//!   declaring them clobbered; only the registers the compiler refuses as
//!   clobbers are pushed explicitly.
//! - `task_start_trampoline` is what a never-run task resumes into. It
//!   releases the scheduler lock stored in the frame, points the entry
//!   function's return at the exit routine and jumps into the entry function.
//! - `initial_frame_words` returns the synthetic frame, lowest address first,
//!   that `switch_task` resumes from exactly as if the task had been
//!   suspended by it. Its shape is the variant's `LAYOUT` from `layout`,
//!   which also gives the trampoline its load offsets.

mod layout;

#[cfg(target_arch = "x86_64")]
mod x86_64;
#[cfg(target_arch = "x86_64")]
pub(crate) use self::x86_64::*;

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "aarch64")]
pub(crate) use self::aarch64::*;

#[cfg(target_arch = "arm")]
mod arm;
#[cfg(target_arch = "arm")]
pub(crate) use self::arm::*;

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
mod riscv;
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub(crate) use self::riscv::*;

#[cfg(not(any(
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "arm",
    target_arch = "riscv32",
    target_arch = "riscv64"
)))]
compile_error!("coswitch: no task switch implementation for this architecture");

/// Size of one saved word on the stack.
pub(crate) const WORD: usize = core::mem::size_of::<usize>();
