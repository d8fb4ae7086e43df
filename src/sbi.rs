use crate::logging::Console;

/// Console backed by the legacy SBI putchar call.
pub(crate) struct SbiConsole;

impl Console for SbiConsole {
    fn write_str(&self, s: &str) {
        for c in s.bytes() {
            #[allow(deprecated)]
            sbi_rt::legacy::console_putchar(c as usize);
        }
    }
}
