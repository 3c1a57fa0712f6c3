//! User-facing status lines: progress, skip notices, and the final summary.

/// Receives status lines as the run produces them.
pub trait StatusSink {
    fn line(&mut self, line: &str);
}

/// Prints status lines to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleStatus;

impl StatusSink for ConsoleStatus {
    fn line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Collects lines in memory.
impl StatusSink for Vec<String> {
    fn line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}
