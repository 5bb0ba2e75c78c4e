//! Output and input seams: output is written through a sink the driver
//! owns, and `readln` reads through a source the driver owns.
//!
//! The engine never touches stdio directly so that tests exercise
//! `print`/`println`/`nl`/`readln` deterministically.

use std::collections::VecDeque;

/// Where `print`/`println`/`nl` write.
pub trait OutputSink {
    fn write(&mut self, text: &str);

    fn newline(&mut self) {
        self.write("\n");
    }
}

/// Writes straight to the process's standard output.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write(&mut self, text: &str) {
        print!("{text}");
    }

    fn newline(&mut self) {
        println!();
    }
}

/// Collects output in memory, for tests and embedding.
///
/// Backed by `Rc<RefCell<String>>` rather than a bare `String` so a caller
/// can hand one clone to [`Engine::with_output`](crate::Engine::with_output)
/// while keeping another to read back afterwards — useful for a driver that
/// writes its own text (query bindings, `True`/`False`) to the same stream
/// the engine's `print`/`println` built-ins write to.
#[derive(Default, Clone)]
pub struct BufferSink {
    buffer: std::rc::Rc<std::cell::RefCell<String>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> std::cell::Ref<'_, str> {
        std::cell::Ref::map(self.buffer.borrow(), |s| s.as_str())
    }
}

impl OutputSink for BufferSink {
    fn write(&mut self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }
}

/// Where `readln` reads from.
pub trait InputSource {
    /// Returns the next line with its terminator stripped, or `None` at
    /// end of input.
    fn read_line(&mut self) -> Option<String>;
}

/// Reads from the process's standard input.
pub struct StdinSource;

impl InputSource for StdinSource {
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
            Err(_) => None,
        }
    }
}

/// Replays a fixed sequence of lines, for tests.
#[derive(Default)]
pub struct FixedInput {
    lines: VecDeque<String>,
}

impl FixedInput {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        FixedInput {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputSource for FixedInput {
    fn read_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}
