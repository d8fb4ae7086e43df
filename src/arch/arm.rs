//! 32-bit ARM in Thumb state (Cortex-M class, soft-float AAPCS).
//!
//! Callee-saved: r4-r11. LLVM reserves r6 (base pointer) and r7 (Thumb frame
//! pointer), so the switch pushes those two; r4, r5 and r8-r11 are declared
//! clobbered. On Thumb-1 cores the high registers can only appear as
//! clobbers, which is all the switch needs.
//!
//! Every address loaded into pc must have bit 0 set to stay in Thumb state.
//! Whether the target runs in Thumb state is detected by `build.rs`.

use core::arch::{asm, naked_asm};

use super::layout::{self, FrameLayout, Word};
use crate::task::{InitialFrame, release_on_first_run};

#[cfg(not(coswitch_thumb))]
compile_error!("coswitch: the arm variant is written for Thumb targets (`thumb*`) only");

#[cfg(target_abi = "eabihf")]
compile_error!("coswitch: the arm variant does not save d8-d15 and requires a soft-float ABI");

pub(crate) const LAYOUT: FrameLayout = layout::ARM_THUMB;

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
            "push {{r6, r7}}",
            // resumption address, +1 for the Thumb bit
            "ldr r2, =2f+1",
            "push {{r2}}",
            "mov r2, sp",
            "str r2, [{save}]",
            "mov sp, {next}",
            "pop {{pc}}",
            "2:",
            "pop {{r6, r7}}",
            save = in(reg) save,
            next = in(reg) next,
            out("r2") _,
            out("r4") _,
            out("r5") _,
            out("r8") _,
            out("r9") _,
            out("r10") _,
            out("r11") _,
            clobber_abi("C"),
        );
    }
}

/// First code a new task runs. Entered by the `pop {pc}` of `switch_task`
/// with sp pointing just past the resume block of its `LAYOUT` frame.
#[unsafe(naked)]
pub(crate) extern "C" fn task_start_trampoline() {
    naked_asm!(
        "ldr r0, [sp, #{lock}]",
        "ldr r4, [sp, #{entry}]",
        "ldr r5, [sp, #{arg}]",
        "ldr r6, [sp, #{exit}]",
        "add sp, #{frame}",
        "bl {release}",
        "mov r0, r5",
        // a normal return from the entry function lands in the exit routine
        "mov lr, r6",
        "bx r4",
        lock = const LAYOUT.trampoline_offset(Word::Lock),
        entry = const LAYOUT.trampoline_offset(Word::Entry),
        arg = const LAYOUT.trampoline_offset(Word::Arg),
        exit = const LAYOUT.trampoline_offset(Word::Exit),
        frame = const LAYOUT.trampoline_consumes(),
        release = sym release_on_first_run,
    )
}

pub(crate) fn trampoline_address() -> usize {
    task_start_trampoline as extern "C" fn() as usize | LAYOUT.code_bit
}

pub(crate) fn initial_frame_words(frame: &InitialFrame) -> [usize; FRAME_WORDS] {
    let mut words = [0; FRAME_WORDS];
    // the layout also sets the Thumb bit on entry and exit
    LAYOUT.fill(&mut words, trampoline_address(), frame);
    words
}
