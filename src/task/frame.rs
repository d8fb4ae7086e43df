use core::fmt::{self, Display, Formatter};

use log::{trace, warn};

use super::context::TaskContext;
use crate::arch::{self, FRAME_WORDS, STACK_ALIGN, WORD};
use crate::config::MIN_TASK_STACK_SIZE;
use crate::sync::SchedulerLock;

/// Entry function of a task, called once with the frame's `arg`.
pub type TaskEntry = extern "C" fn(arg: *mut ());

/// Where a task lands if its entry function returns. Must never return.
pub type TaskExit = extern "C" fn() -> !;

/// Everything the trampoline needs to start a task.
#[derive(Copy, Clone, Debug)]
pub struct InitialFrame {
    pub entry: TaskEntry,
    pub arg: *mut (),
    pub exit: TaskExit,
    /// Lock the scheduler holds while switching to this task for the first
    /// time. The trampoline releases it before `entry` runs.
    pub lock: &'static SchedulerLock,
}

impl InitialFrame {
    pub fn new(
        entry: TaskEntry,
        arg: *mut (),
        exit: TaskExit,
        lock: &'static SchedulerLock,
    ) -> Self {
        Self {
            entry,
            arg,
            exit,
            lock,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// The stack region cannot hold the initial frame plus working space.
    StackTooSmall { len: usize, required: usize },
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::StackTooSmall { len, required } => write!(
                f,
                "task stack too small: {} bytes, at least {} required",
                len, required
            ),
        }
    }
}

impl core::error::Error for FrameError {}

/// Bytes a stack region must have to be accepted by [`init_task_stack`].
pub fn required_stack_size() -> usize {
    // worst case alignment loss at the top, then the frame itself
    MIN_TASK_STACK_SIZE.max(FRAME_WORDS * WORD + STACK_ALIGN)
}

/// Lay the synthetic initial frame at the top of `stack` and return the
/// context that resumes into the task-start trampoline.
///
/// The stack grows downward from the end of the slice. The caller keeps
/// ownership of the region; it must stay alive and untouched for as long as
/// the returned context may be switched to.
pub fn init_task_stack(stack: &mut [u8], frame: &InitialFrame) -> Result<TaskContext, FrameError> {
    let required = required_stack_size();
    if stack.len() < required {
        warn!(
            "task stack of {} bytes rejected, {} required",
            stack.len(),
            required
        );
        return Err(FrameError::StackTooSmall {
            len: stack.len(),
            required,
        });
    }

    let bottom = stack.as_mut_ptr() as usize;
    let top = (bottom + stack.len()) & !(STACK_ALIGN - 1);
    let sp = (top - FRAME_WORDS * WORD) & !(STACK_ALIGN - 1);
    debug_assert!(sp >= bottom);

    let words = arch::initial_frame_words(frame);
    // NOTE: derive the pointer from the slice so it keeps the slice's provenance
    let sp_ptr = unsafe { stack.as_mut_ptr().add(sp - bottom) }.cast::<usize>();
    unsafe {
        core::ptr::copy_nonoverlapping(words.as_ptr(), sp_ptr, FRAME_WORDS);
    }

    trace!(
        "[{}] task frame at sp={:#x}, entry={:#x}, arg={:#x}",
        arch::NAME,
        sp,
        frame.entry as usize,
        frame.arg as usize
    );
    Ok(TaskContext::from_stack_pointer(sp_ptr))
}

#[cfg(test)]
mod tests {
    use super::*;

    static LOCK: SchedulerLock = SchedulerLock::new();

    extern "C" fn never_entered(_arg: *mut ()) {}

    extern "C" fn never_exits() -> ! {
        loop {
            core::hint::spin_loop();
        }
    }

    fn frame() -> InitialFrame {
        InitialFrame::new(never_entered, 0x5a5a as *mut (), never_exits, &LOCK)
    }

    #[test]
    fn frame_is_aligned_inside_the_stack() {
        let mut stack = vec![0u8; 1024 + 3];
        // shift the slice off alignment on purpose
        let region = &mut stack[3..];
        let bottom = region.as_ptr() as usize;
        let end = bottom + region.len();

        let ctx = init_task_stack(region, &frame()).unwrap();
        let sp = ctx.stack_pointer();

        assert!(!ctx.is_empty());
        assert_eq!(sp % STACK_ALIGN, 0);
        assert!(sp >= bottom);
        assert!(sp + FRAME_WORDS * WORD <= end);
    }

    #[test]
    fn frame_resumes_into_the_trampoline() {
        let mut stack = vec![0u8; 1024];
        let f = frame();
        let ctx = init_task_stack(&mut stack, &f).unwrap();

        let words =
            unsafe { core::slice::from_raw_parts(ctx.as_raw() as *const usize, FRAME_WORDS) };
        assert_eq!(words[0], arch::trampoline_address());
        assert_eq!(words, &arch::initial_frame_words(&f)[..]);
        assert!(words.contains(&(&LOCK as *const SchedulerLock as usize)));
        assert!(words.contains(&0x5a5a));
    }

    #[test]
    fn small_stack_is_rejected() {
        let mut stack = vec![0u8; required_stack_size() - 1];
        let err = init_task_stack(&mut stack, &frame()).unwrap_err();
        assert_eq!(
            err,
            FrameError::StackTooSmall {
                len: required_stack_size() - 1,
                required: required_stack_size(),
            }
        );
    }

    #[test]
    fn smallest_accepted_stack_fits_the_frame() {
        let mut stack = vec![0u8; required_stack_size()];
        assert!(init_task_stack(&mut stack, &frame()).is_ok());
    }

    #[test]
    fn frame_error_message_names_both_sizes() {
        let err = FrameError::StackTooSmall {
            len: 10,
            required: 256,
        };
        assert_eq!(
            err.to_string(),
            "task stack too small: 10 bytes, at least 256 required"
        );
    }
}
