/// Saved execution context of a task that is not running.
///
/// Nothing but the stack pointer: the resumption address and every register
/// the calling convention preserves live on the task's own stack, below this
/// pointer. Owned by the scheduler, one per task, and only touched while the
/// task is suspended.
///
/// Deliberately not `Send`: a context resumes on the core that suspended it.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TaskContext {
    sp: *mut usize,
}

impl TaskContext {
    /// A context that has never been saved into.
    ///
    /// Used as the save slot of the flow that performs a core's first switch,
    /// which has no stack of its own to describe beforehand.
    pub const fn empty() -> Self {
        Self {
            sp: core::ptr::null_mut(),
        }
    }

    /// Whether no stack pointer has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.sp.is_null()
    }

    /// Saved stack pointer, as an address.
    pub fn stack_pointer(&self) -> usize {
        self.sp as usize
    }

    pub(crate) fn from_stack_pointer(sp: *mut usize) -> Self {
        Self { sp }
    }

    pub(crate) fn as_raw(&self) -> *mut usize {
        self.sp
    }
}

impl Default for TaskContext {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_has_null_stack_pointer() {
        let ctx = TaskContext::default();
        assert!(ctx.is_empty());
        assert_eq!(ctx.stack_pointer(), 0);
        assert_eq!(ctx, TaskContext::empty());
    }

    #[test]
    fn context_is_exactly_one_pointer_wide() {
        // switch_task writes through *mut TaskContext as if it were *mut *mut usize
        assert_eq!(
            core::mem::size_of::<TaskContext>(),
            core::mem::size_of::<*mut usize>()
        );
        assert_eq!(
            core::mem::align_of::<TaskContext>(),
            core::mem::align_of::<*mut usize>()
        );
    }
}
