//! AArch64, AAPCS64.
//!
//! Callee-saved: x19-x29 and the low halves of v8-v15. LLVM reserves x19 and
//! x29, so the switch stores that pair by hand. Everything else is declared
//! clobbered; `clobber_abi("C")` already covers all of v0-v31 because only
//! the low 64 bits of v8-v15 survive a call.
//!
//! sp must stay 16-byte aligned, so the resumption address occupies a full
//! 16-byte slot.

use core::arch::{asm, naked_asm};

use super::layout::{self, FrameLayout, Word};
use crate::task::{InitialFrame, release_on_first_run};

pub(crate) const LAYOUT: FrameLayout = layout::AARCH64;

pub(crate) const NAME: &str = LAYOUT.name;

pub(crate) const STACK_ALIGN: usize = LAYOUT.stack_align;

pub(crate) const FRAME_WORDS: usize = LAYOUT.words.len();

/// Suspend the caller into `*save` and resume the stack at `next`.
///
/// # Safety
/// `save` must be writable and belong to the calling task. `next` must have
/// been stored by this function or built by `initial_frame_words`.
#[inline(never)]
pub(crate) unsafe fn switch_task(save: *mut *mut usize, next: *mut usize) {
    unsafe {
        asm!(
            "stp x29, x19, [sp, #-16]!",
            "adr x9, 2f",
            "str x9, [sp, #-{resume}]!",
            "mov x9, sp",
            "str x9, [{save}]",
            "mov sp, {next}",
            "ldr x9, [sp], #{resume}",
            "br x9",
            "2:",
            "ldp x29, x19, [sp], #16",
            save = in(reg) save,
            next = in(reg) next,
            resume = const LAYOUT.resume_block,
            out("x9") _,
            out("x20") _,
            out("x21") _,
            out("x22") _,
            out("x23") _,
            out("x24") _,
            out("x25") _,
            out("x26") _,
            out("x27") _,
            out("x28") _,
            clobber_abi("C"),
        );
    }
}

/// First code a new task runs. Entered by the `br` of `switch_task` with sp
/// pointing just past the resume block of its `LAYOUT` frame.
#[unsafe(naked)]
pub(crate) extern "C" fn task_start_trampoline() {
    naked_asm!(
        "ldr x0, [sp, #{lock}]",
        "ldr x20, [sp, #{entry}]",
        "ldr x21, [sp, #{arg}]",
        "ldr x22, [sp, #{exit}]",
        "add sp, sp, #{frame}",
        "bl {release}",
        "mov x0, x21",
        // a normal return from the entry function lands in the exit routine
        "mov x30, x22",
        "br x20",
        lock = const LAYOUT.trampoline_offset(Word::Lock),
        entry = const LAYOUT.trampoline_offset(Word::Entry),
        arg = const LAYOUT.trampoline_offset(Word::Arg),
        exit = const LAYOUT.trampoline_offset(Word::Exit),
        frame = const LAYOUT.trampoline_consumes(),
        release = sym release_on_first_run,
    )
}

pub(crate) fn trampoline_address() -> usize {
    task_start_trampoline as extern "C" fn() as usize
}

pub(crate) fn initial_frame_words(frame: &InitialFrame) -> [usize; FRAME_WORDS] {
    let mut words = [0; FRAME_WORDS];
    LAYOUT.fill(&mut words, trampoline_address(), frame);
    words
}
