use core::hint;
use core::sync::atomic::{AtomicBool, Ordering};

/// Lock a core's scheduler holds from choosing the next task until that task
/// runs.
///
/// Unlike an ordinary mutex it is routinely released by a different task than
/// the one that acquired it: the task that is switched to releases it, either
/// through the guard its own earlier switch left it with, or, for a task that
/// has never run, through the start trampoline.
///
/// Not reentrant. Acquiring it twice from the same core spins forever.
#[derive(Debug)]
pub struct SchedulerLock {
    locked: AtomicBool,
}

impl SchedulerLock {
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    /// Spin until the lock is acquired.
    pub fn lock(&self) -> SchedulerLockGuard<'_> {
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            hint::spin_loop();
        }
        SchedulerLockGuard { lock: self }
    }

    /// Acquire the lock if it is free.
    pub fn try_lock(&self) -> Option<SchedulerLockGuard<'_>> {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
            .then(|| SchedulerLockGuard { lock: self })
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    /// Release performed by the start trampoline for a task that never ran.
    pub(crate) fn release_for_new_task(&self) {
        self.unlock();
    }

    fn unlock(&self) {
        let was_locked = self.locked.swap(false, Ordering::Release);
        debug_assert!(was_locked, "scheduler lock released twice");
    }
}

impl Default for SchedulerLock {
    fn default() -> Self {
        Self::new()
    }
}

/// One pending release of a [`SchedulerLock`].
///
/// Dropping it releases the lock. When a guard is lent to `switch_task` the
/// lock may be released and re-acquired by other tasks meanwhile; it is held
/// again whenever the switch returns, so the drop is still owed.
#[must_use = "dropping the guard releases the scheduler lock"]
pub struct SchedulerLockGuard<'a> {
    lock: &'a SchedulerLock,
}

impl SchedulerLockGuard<'_> {
    pub fn lock(&self) -> &SchedulerLock {
        self.lock
    }

    /// Release the lock now.
    pub fn release(self) {}
}

impl Drop for SchedulerLockGuard<'_> {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}
