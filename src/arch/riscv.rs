//! RISC-V, RV32 and RV64 with the standard calling convention.
//!
//! Callee-saved: s0-s11 and, with the F extension, fs0-fs11. LLVM reserves s0
//! (frame pointer) and s1 (base pointer), so the switch stores those two by
//! hand. sp is kept 16-byte aligned, so the resumption address and the s0/s1
//! pair each take a 16-byte block.

use core::arch::{asm, naked_asm};

use super::WORD;
use super::layout::{self, FrameLayout, Word};
use crate::task::{InitialFrame, release_on_first_run};

#[cfg(target_feature = "e")]
compile_error!("coswitch: the riscv variant needs s2-s11 and does not support RV32E");

#[cfg(target_arch = "riscv64")]
macro_rules! store {
    () => {
        "sd"
    };
}
#[cfg(target_arch = "riscv64")]
macro_rules! load {
    () => {
        "ld"
    };
}
#[cfg(target_arch = "riscv32")]
macro_rules! store {
    () => {
        "sw"
    };
}
#[cfg(target_arch = "riscv32")]
macro_rules! load {
    () => {
        "lw"
    };
}

#[cfg(target_arch = "riscv64")]
pub(crate) const LAYOUT: FrameLayout = layout::RISCV64;
#[cfg(target_arch = "riscv32")]
pub(crate) const LAYOUT: FrameLayout = layout::RISCV32;

pub(crate) const NAME: &str = LAYOUT.name;

pub(crate) const STACK_ALIGN: usize = LAYOUT.stack_align;

pub(crate) const FRAME_WORDS: usize = LAYOUT.words.len();

macro_rules! switch_asm {
    ($save:expr, $next:expr; $($fregs:tt)*) => {
        asm!(
            "addi sp, sp, -16",
            concat!(store!(), " s0, 0(sp)"),
            concat!(store!(), " s1, {word}(sp)"),
            "addi sp, sp, -{resume}",
            "lla t0, 2f",
            concat!(store!(), " t0, 0(sp)"),
            concat!(store!(), " sp, 0({save})"),
            "mv sp, {next}",
            concat!(load!(), " t0, 0(sp)"),
            "addi sp, sp, {resume}",
            "jr t0",
            "2:",
            concat!(load!(), " s0, 0(sp)"),
            concat!(load!(), " s1, {word}(sp)"),
            "addi sp, sp, 16",
            save = in(reg) $save,
            next = in(reg) $next,
            word = const WORD,
            resume = const LAYOUT.resume_block,
            out("t0") _,
            out("s2") _,
            out("s3") _,
            out("s4") _,
            out("s5") _,
            out("s6") _,
            out("s7") _,
            out("s8") _,
            out("s9") _,
            out("s10") _,
            out("s11") _,
            $($fregs)*
            clobber_abi("C"),
        )
    };
}

/// Suspend the caller into `*save` and resume the stack at `next`.
///
/// # Safety
/// `save` must be writable and belong to the calling task. `next` must have
/// been stored by this function or built by `initial_frame_words`.
#[inline(never)]
pub(crate) unsafe fn switch_task(save: *mut *mut usize, next: *mut usize) {
    #[cfg(target_feature = "f")]
    unsafe {
        switch_asm!(save, next;
            out("fs0") _, out("fs1") _, out("fs2") _, out("fs3") _,
            out("fs4") _, out("fs5") _, out("fs6") _, out("fs7") _,
            out("fs8") _, out("fs9") _, out("fs10") _, out("fs11") _,
        );
    }
    #[cfg(not(target_feature = "f"))]
    unsafe {
        switch_asm!(save, next;);
    }
}

/// First code a new task runs. Entered by the `jr` of `switch_task` with sp
/// pointing just past the resume block of its `LAYOUT` frame.
#[unsafe(naked)]
pub(crate) extern "C" fn task_start_trampoline() {
    naked_asm!(
        concat!(load!(), " a0, {lock}(sp)"),
        concat!(load!(), " s2, {entry}(sp)"),
        concat!(load!(), " s3, {arg}(sp)"),
        concat!(load!(), " s4, {exit}(sp)"),
        "addi sp, sp, {frame}",
        "call {release}",
        "mv a0, s3",
        // a normal return from the entry function lands in the exit routine
        "mv ra, s4",
        "jr s2",
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
