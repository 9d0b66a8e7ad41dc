//! Interactive console port: a pluggable line source and sink, so the
//! loop can be driven by scripted input in tests instead of a real
//! terminal.

use std::io;

/// Outcome of one read from the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadEvent {
    Line(String),
    /// The user interrupted the pending prompt (Ctrl-C).
    Interrupted,
    /// End of input (Ctrl-D, or an exhausted script).
    Eof,
}

pub trait ConsolePort {
    /// Display `prompt` and block for one line of already-decoded text.
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadEvent>;

    /// Like `read_line`, but the input must not be echoed.
    fn read_secret(&mut self, prompt: &str) -> io::Result<ReadEvent>;

    fn write_line(&mut self, text: &str);

    /// Diagnostics channel, kept apart from regular output.
    fn write_error(&mut self, text: &str);
}
