//! Synthetic initial frames of every variant, described as data.
//!
//! A variant's `initial_frame_words` fills its frame from one of these
//! tables, and its trampoline reads the lock, entry, argument and exit slots
//! at the offsets the same table yields. All tables are built into host test
//! runs, so the frame of a variant can be checked without its target.

use crate::task::InitialFrame;

use self::Word::*;

/// Meaning of one word of an initial frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Word {
    /// Address the switch pops and jumps to: the trampoline.
    Resume,
    Pad,
    Lock,
    Entry,
    Arg,
    Exit,
}

#[derive(Debug)]
pub(crate) struct FrameLayout {
    pub(crate) name: &'static str,
    pub(crate) word_size: usize,
    pub(crate) stack_align: usize,
    /// Bytes the switch pops before jumping to the resumption address.
    pub(crate) resume_block: usize,
    /// Bit set in every code address, for instruction sets that encode the
    /// mode in bit 0.
    pub(crate) code_bit: usize,
    /// The frame, lowest address first.
    pub(crate) words: &'static [Word],
}

impl FrameLayout {
    pub(crate) const fn frame_bytes(&self) -> usize {
        self.words.len() * self.word_size
    }

    /// Byte offset of `word` from the lowest address of the frame.
    pub(crate) const fn offset_of(&self, word: Word) -> usize {
        let mut i = 0;
        while i < self.words.len() {
            if self.words[i] as u8 == word as u8 {
                return i * self.word_size;
            }
            i += 1;
        }
        panic!("word missing from frame layout");
    }

    /// Byte offset of `word` from sp as the trampoline finds it, after the
    /// switch has popped the resume block.
    pub(crate) const fn trampoline_offset(&self, word: Word) -> usize {
        self.offset_of(word) - self.resume_block
    }

    /// Bytes the trampoline drops before calling out, leaving sp at the top
    /// of the frame.
    pub(crate) const fn trampoline_consumes(&self) -> usize {
        self.frame_bytes() - self.resume_block
    }

    /// Write the frame for `frame` into `out`, one machine word per entry.
    pub(crate) fn fill(&self, out: &mut [usize], trampoline: usize, frame: &InitialFrame) {
        debug_assert_eq!(out.len(), self.words.len());
        for (slot, word) in out.iter_mut().zip(self.words) {
            *slot = match word {
                Word::Resume => trampoline | self.code_bit,
                Word::Pad => 0,
                Word::Lock => frame.lock as *const _ as usize,
                Word::Entry => frame.entry as usize | self.code_bit,
                Word::Arg => frame.arg as usize,
                Word::Exit => frame.exit as usize | self.code_bit,
            };
        }
    }
}

/// `ret` pops one word; the trailing pad keeps the frame a multiple of 16.
#[cfg(any(test, target_arch = "x86_64"))]
pub(crate) const X86_64: FrameLayout = FrameLayout {
    name: "x86_64",
    word_size: 8,
    stack_align: 16,
    resume_block: 8,
    code_bit: 0,
    words: &[Resume, Lock, Entry, Arg, Exit, Pad],
};

/// sp must stay 16-byte aligned, so the resumption address has a full slot.
#[cfg(any(test, target_arch = "aarch64"))]
pub(crate) const AARCH64: FrameLayout = FrameLayout {
    name: "aarch64",
    word_size: 8,
    stack_align: 16,
    resume_block: 16,
    code_bit: 0,
    words: &[Resume, Pad, Lock, Entry, Arg, Exit],
};

/// `pop {pc}` pops one word.
#[cfg(any(test, target_arch = "arm"))]
pub(crate) const ARM_THUMB: FrameLayout = FrameLayout {
    name: "arm-thumb",
    word_size: 4,
    stack_align: 8,
    resume_block: 4,
    code_bit: 1,
    words: &[Resume, Lock, Entry, Arg, Exit, Pad],
};

#[cfg(any(test, target_arch = "riscv32"))]
pub(crate) const RISCV32: FrameLayout = FrameLayout {
    name: "riscv32",
    word_size: 4,
    stack_align: 16,
    resume_block: 16,
    code_bit: 0,
    words: &[Resume, Pad, Pad, Pad, Lock, Entry, Arg, Exit],
};

#[cfg(any(test, target_arch = "riscv64"))]
pub(crate) const RISCV64: FrameLayout = FrameLayout {
    name: "riscv64",
    word_size: 8,
    stack_align: 16,
    resume_block: 16,
    code_bit: 0,
    words: &[Resume, Pad, Lock, Entry, Arg, Exit],
};
