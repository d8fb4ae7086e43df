//! x86_64, System V calling convention.
//!
//! Callee-saved: rbx, rbp, r12-r15. LLVM reserves rbx and rbp, so the switch
//! pushes those two by hand; r12-r15 are declared clobbered and saved by the
//! compiler in the prologue of `switch_task`.

use core::arch::{asm, naked_asm};

use super::layout::{self, FrameLayout, Word};
use crate::task::{InitialFrame, release_on_first_run};

#[cfg(windows)]
compile_error!("coswitch: the x86_64 variant implements the System V calling convention only");

pub(crate) const LAYOUT: FrameLayout = layout::X86_64;

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
            "push rbp",
            "push rbx",
            // resumption address
            "lea rax, [rip + 2f]",
            "push rax",
            "mov [{save}], rsp",
            "mov rsp, {next}",
            "ret",
            "2:",
            "pop rbx",
            "pop rbp",
            save = in(reg) save,
            next = in(reg) next,
            out("rax") _,
            out("r12") _,
            out("r13") _,
            out("r14") _,
            out("r15") _,
            clobber_abi("C"),
        );
    }
}

/// First code a new task runs. Entered by the `ret` of `switch_task` with rsp
/// pointing just past the resume block of its `LAYOUT` frame.
///
/// A plain `ret` out of the entry function would leave the stack 8 bytes off
/// the alignment a called function expects, so the return address is a
/// landing pad that calls the exit routine kept in r14.
#[unsafe(naked)]
pub(crate) extern "C" fn task_start_trampoline() {
    naked_asm!(
        "mov rdi, [rsp + {lock}]",
        "mov r12, [rsp + {entry}]",
        "mov r13, [rsp + {arg}]",
        "mov r14, [rsp + {exit}]",
        "add rsp, {frame}",
        "call {release}",
        "mov rdi, r13",
        "lea rax, [rip + 2f]",
        "push rax",
        "jmp r12",
        "2:",
        "call r14",
        "ud2",
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
