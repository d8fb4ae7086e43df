/// Smallest stack region `init_task_stack` accepts, in bytes.
///
/// The initial frame itself is tiny; this leaves room for the trampoline's
/// lock release and the first few calls of the entry function.
pub const MIN_TASK_STACK_SIZE: usize = 256;

/// Log level used when `LOG` is unset at build time.
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
