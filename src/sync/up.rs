use core::cell::{RefCell, RefMut};

/// Scheduler bookkeeping owned by the tasks of a single core.
///
/// Cooperative tasks on one core never run at the same time, so a `RefCell`
/// is enough. The borrow must be dropped before calling `switch_task`:
/// another task of the same core will take it while this one is suspended.
pub struct CoreCell<T> {
    inner: RefCell<T>,
}

// SAFETY: the creator promises only the tasks of one core ever touch it
unsafe impl<T> Sync for CoreCell<T> {}

impl<T> CoreCell<T> {
    /// # Safety
    /// The cell must only be accessed from tasks of a single core.
    pub const unsafe fn new(value: T) -> Self {
        Self {
            inner: RefCell::new(value),
        }
    }

    /// Borrow the contents mutably.
    ///
    /// Panics if the contents are already borrowed, which on one core means a
    /// borrow was carried across a switch.
    pub fn exclusive_access(&self) -> RefMut<'_, T> {
        self.inner.borrow_mut()
    }

    /// Like [`exclusive_access`](Self::exclusive_access), but `None` instead
    /// of a panic.
    pub fn try_exclusive_access(&self) -> Option<RefMut<'_, T>> {
        self.inner.try_borrow_mut().ok()
    }
}
