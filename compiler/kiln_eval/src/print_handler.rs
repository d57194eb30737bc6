//! Where console output from host operations goes.
//!
//! `System.Console.WriteLine` and friends never write to stdout directly;
//! they go through the session's print handler so embedders can capture
//! output (tests, editors showing a live console) or drop it.

use std::sync::Arc;

use parking_lot::Mutex;

/// Output destination, dispatched by enum rather than trait object.
#[derive(Debug)]
pub enum PrintHandler {
    /// Writes to stdout (default).
    Stdout,
    /// Captures every line in memory.
    Buffer(Mutex<String>),
    /// Discards all output.
    Silent,
}

impl PrintHandler {
    /// Write `msg` followed by a newline.
    pub fn println(&self, msg: &str) {
        match self {
            Self::Stdout => println!("{msg}"),
            Self::Buffer(buf) => {
                let mut buf = buf.lock();
                buf.push_str(msg);
                buf.push('\n');
            }
            Self::Silent => {}
        }
    }

    /// Everything captured so far. Empty for handlers that don't capture.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(buf) => buf.lock().clone(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    /// Captured output split into lines.
    pub fn lines(&self) -> Vec<String> {
        self.output().lines().map(str::to_owned).collect()
    }

    /// Number of complete lines captured so far.
    pub fn line_count(&self) -> usize {
        match self {
            Self::Buffer(buf) => buf.lock().matches('\n').count(),
            Self::Stdout | Self::Silent => 0,
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(buf) = self {
            buf.lock().clear();
        }
    }
}

/// Print handler shared between a session and its host catalog.
pub type SharedPrintHandler = Arc<PrintHandler>;

/// Handler writing to stdout.
pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

/// Handler capturing output in memory.
pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(Mutex::new(String::new())))
}

/// Handler discarding all output.
pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_captures_lines() {
        let handler = buffer_handler();
        handler.println("Hello World");
        handler.println("Foo bar");
        assert_eq!(handler.output(), "Hello World\nFoo bar\n");
        assert_eq!(handler.lines(), vec!["Hello World", "Foo bar"]);
        assert_eq!(handler.line_count(), 2);
    }

    #[test]
    fn clear_empties_buffer() {
        let handler = buffer_handler();
        handler.println("x");
        handler.clear();
        assert_eq!(handler.output(), "");
        assert_eq!(handler.line_count(), 0);
    }

    #[test]
    fn silent_and_stdout_capture_nothing() {
        let silent = silent_handler();
        silent.println("dropped");
        assert_eq!(silent.output(), "");
        assert_eq!(stdout_handler().line_count(), 0);
    }

    #[test]
    fn buffer_is_shared_across_threads() {
        let handler = buffer_handler();
        let worker = Arc::clone(&handler);
        let t = std::thread::spawn(move || {
            for _ in 0..50 {
                worker.println("a");
            }
        });
        for _ in 0..50 {
            handler.println("b");
        }
        assert!(t.join().is_ok());
        assert_eq!(handler.line_count(), 100);
    }
}
