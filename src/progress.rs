use std::io::{self, Write};
use std::time::Instant;

/// Stderr logger with elapsed timestamps. Quiet mode drops info lines but
/// keeps warnings.
pub struct ConsoleProgress {
    verbose: bool,
    t0: Instant,
}

impl ConsoleProgress {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            t0: Instant::now(),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if !self.verbose {
            return;
        }
        self.emit(msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.emit(&format!("warning: {}", msg.as_ref()));
    }

    fn emit(&self, line: &str) {
        let ts = fmt_elapsed(self.t0.elapsed().as_secs_f64());
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "[{ts}] {line}");
    }
}

fn fmt_elapsed(seconds: f64) -> String {
    let seconds = seconds.max(0.0) as u64;
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}
