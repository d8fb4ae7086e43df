use super::context::TaskContext;
use crate::arch;
use crate::sync::{SchedulerLock, SchedulerLockGuard};

/// Suspend the running task and resume `next`.
///
/// The running task's stack pointer is stored into `*current`; control comes
/// back here, as from an ordinary call, once another task switches to that
/// stored context. `held` proves the scheduler lock is held across the
/// decision and the switch. On return the lock is held again, acquired by
/// whichever task switched back, and `held` is the release this flow owes.
///
/// # Safety
/// - `current` must be the calling task's own context slot, valid for writes,
///   and not read by anyone until this task has been switched away from.
/// - `next` must have been stored by `switch_task` or produced by
///   `init_task_stack`, on this core, and must not be running. Its stack must
///   still be alive.
pub unsafe fn switch_task(
    current: *mut TaskContext,
    next: TaskContext,
    held: &SchedulerLockGuard<'_>,
) {
    debug_assert!(held.lock().is_locked(), "switch without the scheduler lock");
    debug_assert!(!next.is_empty(), "switch to a context that was never saved");
    // NOTE: TaskContext is repr(transparent) over the saved stack pointer
    unsafe {
        arch::switch_task(current.cast::<*mut usize>(), next.as_raw());
    }
}

/// Called by every trampoline before the entry function of a new task runs.
///
/// The scheduler acquired `lock` before switching here. An already started
/// task releases it through its own guard when its switch returns, but a new
/// task has no such guard, so the release happens on its behalf.
pub(crate) extern "C" fn release_on_first_run(lock: *const SchedulerLock) {
    // SAFETY: init_task_stack stored a &'static SchedulerLock in the frame
    unsafe { (*lock).release_for_new_task() }
}
