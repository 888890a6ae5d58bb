//! I/O handler for `вывод`, `ввод`, and `пауза`.
//!
//! The host decides where program text goes and where input comes from:
//! - Console: stdout and stdin (default for `kumir run`)
//! - Buffer: captured output and scripted input lines (tests, embedding)
//! - Silent: output discarded, input unavailable
//!
//! File redirection is layered on top by the host (e.g. a buffer handler
//! preloaded from a file); the engine only sees this interface.
//!
//! # Performance
//! Uses enum dispatch instead of trait objects on this frequently-used path.

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::sync::Arc;

use kumir_value::{input_unavailable, ErrorCategory, EvalError, EvalResult};
use parking_lot::Mutex;

/// Handler that talks to the process console.
#[derive(Default)]
pub struct ConsoleIoHandler;

impl ConsoleIoHandler {
    /// Write text as-is and flush, so partial lines appear before input.
    pub fn write_output(&self, text: &str) -> EvalResult<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| EvalError::new(ErrorCategory::Runtime, format!("output failed: {e}")))
    }

    /// Read one line from stdin without its line terminator.
    pub fn read_input_line(&self, prompt: &str) -> EvalResult<String> {
        if !prompt.is_empty() {
            self.write_output(prompt)?;
        }
        let mut line = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| input_unavailable(e.to_string()))?;
        if read == 0 {
            return Err(input_unavailable("end of input"));
        }
        Ok(strip_line_end(line))
    }

    /// Block until the user presses Enter.
    pub fn pause(&self) -> EvalResult<()> {
        self.read_input_line("").map(|_| ())
    }
}

/// Handler that captures output and serves scripted input.
pub struct BufferIoHandler {
    output: Mutex<String>,
    input: Mutex<VecDeque<String>>,
    pauses: Mutex<usize>,
}

impl BufferIoHandler {
    pub fn new() -> Self {
        BufferIoHandler {
            output: Mutex::new(String::new()),
            input: Mutex::new(VecDeque::new()),
            pauses: Mutex::new(0),
        }
    }

    /// A handler whose input yields `lines` in order.
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let handler = Self::new();
        handler
            .input
            .lock()
            .extend(lines.into_iter().map(Into::into));
        handler
    }

    pub fn write_output(&self, text: &str) {
        self.output.lock().push_str(text);
    }

    /// Next scripted line; an exhausted script is an input error.
    pub fn read_input_line(&self, _prompt: &str) -> EvalResult<String> {
        self.input
            .lock()
            .pop_front()
            .ok_or_else(|| input_unavailable("no more input lines"))
    }

    pub fn push_input(&self, line: impl Into<String>) {
        self.input.lock().push_back(line.into());
    }

    /// Pauses are acknowledged immediately and counted.
    pub fn pause(&self) {
        *self.pauses.lock() += 1;
    }

    pub fn get_output(&self) -> String {
        self.output.lock().clone()
    }

    pub fn clear(&self) {
        self.output.lock().clear();
    }

    pub fn pauses(&self) -> usize {
        *self.pauses.lock()
    }
}

impl Default for BufferIoHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// I/O handler implementation using enum dispatch.
pub enum IoHandlerImpl {
    /// Process stdout/stdin (default).
    Console(ConsoleIoHandler),
    /// Captured output, scripted input.
    Buffer(BufferIoHandler),
    /// Discards output; input is unavailable.
    Silent,
}

impl IoHandlerImpl {
    pub fn write_output(&self, text: &str) -> EvalResult<()> {
        match self {
            Self::Console(h) => h.write_output(text),
            Self::Buffer(h) => {
                h.write_output(text);
                Ok(())
            }
            Self::Silent => Ok(()),
        }
    }

    pub fn read_input_line(&self, prompt: &str) -> EvalResult<String> {
        match self {
            Self::Console(h) => h.read_input_line(prompt),
            Self::Buffer(h) => h.read_input_line(prompt),
            Self::Silent => Err(input_unavailable("input is disabled")),
        }
    }

    /// Wait for the host to acknowledge a `пауза`.
    pub fn pause(&self) -> EvalResult<()> {
        match self {
            Self::Console(h) => h.pause(),
            Self::Buffer(h) => {
                h.pause();
                Ok(())
            }
            Self::Silent => {
                tracing::warn!("pause under a silent I/O handler continues immediately");
                Ok(())
            }
        }
    }

    /// Captured output; empty for handlers that don't capture.
    pub fn get_output(&self) -> String {
        match self {
            Self::Buffer(h) => h.get_output(),
            Self::Console(_) | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

/// Shared I/O handler that can be passed around.
pub type SharedIoHandler = Arc<IoHandlerImpl>;

pub fn console_handler() -> SharedIoHandler {
    Arc::new(IoHandlerImpl::Console(ConsoleIoHandler))
}

pub fn buffer_handler() -> SharedIoHandler {
    Arc::new(IoHandlerImpl::Buffer(BufferIoHandler::new()))
}

/// Buffer handler preloaded with input lines.
pub fn buffer_handler_with_input<I, S>(lines: I) -> SharedIoHandler
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Arc::new(IoHandlerImpl::Buffer(BufferIoHandler::with_input(lines)))
}

pub fn silent_handler() -> SharedIoHandler {
    Arc::new(IoHandlerImpl::Silent)
}

fn strip_line_end(mut line: String) -> String {
    while line.ends_with(['\n', '\r']) {
        line.pop();
    }
    line
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use kumir_value::EvalErrorKind;

    use super::*;

    #[test]
    fn buffer_captures_output_verbatim() {
        let handler = BufferIoHandler::new();
        handler.write_output("a = ");
        handler.write_output("5\n");
        assert_eq!(handler.get_output(), "a = 5\n");
        handler.clear();
        assert!(handler.get_output().is_empty());
    }

    #[test]
    fn buffer_serves_input_in_order() {
        let handler = BufferIoHandler::with_input(["12", "да"]);
        handler.push_input("x");
        assert_eq!(handler.read_input_line("").unwrap(), "12");
        assert_eq!(handler.read_input_line("").unwrap(), "да");
        assert_eq!(handler.read_input_line("").unwrap(), "x");
        let err = handler.read_input_line("").unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::InputUnavailable { .. }));
    }

    #[test]
    fn buffer_counts_pauses() {
        let handler = buffer_handler();
        handler.pause().unwrap();
        handler.pause().unwrap();
        let IoHandlerImpl::Buffer(buffer) = &*handler else {
            unreachable!()
        };
        assert_eq!(buffer.pauses(), 2);
    }

    #[test]
    fn silent_discards_and_refuses_input() {
        let handler = silent_handler();
        handler.write_output("ignored").unwrap();
        assert_eq!(handler.get_output(), "");
        assert!(handler.read_input_line("?").is_err());
        assert!(handler.pause().is_ok());
    }

    #[test]
    fn factory_handlers_share_state() {
        let handler = buffer_handler_with_input(["1"]);
        let shared = Arc::clone(&handler);
        shared.write_output("out").unwrap();
        assert_eq!(handler.get_output(), "out");
        assert_eq!(handler.read_input_line("").unwrap(), "1");
    }

    #[test]
    fn line_terminators_are_stripped() {
        assert_eq!(strip_line_end("abc\r\n".to_string()), "abc");
        assert_eq!(strip_line_end("abc".to_string()), "abc");
        assert_eq!(strip_line_end("\n".to_string()), "");
    }

    #[test]
    fn buffer_is_thread_safe() {
        let handler = buffer_handler();
        let other = Arc::clone(&handler);
        let worker = std::thread::spawn(move || {
            for _ in 0..100 {
                other.write_output("a\n").unwrap();
            }
        });
        for _ in 0..100 {
            handler.write_output("b\n").unwrap();
        }
        worker.join().unwrap();
        assert_eq!(handler.get_output().lines().count(), 200);
    }
}
