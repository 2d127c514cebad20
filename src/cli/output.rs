//! Output helpers shared by the build tools
//!
//! Regular messages go to stdout. Diagnostics are opt-in with `--verbose`
//! and always go to stderr, so they never end up in captured output such as
//! a version string.

/// Output helper for consistent formatting
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    verbose: bool,
}

impl Output {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Prints a line to stdout
    pub fn info(&self, message: &str) {
        println!("{}", message);
    }

    /// Prints an error line to stderr
    pub fn error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}
