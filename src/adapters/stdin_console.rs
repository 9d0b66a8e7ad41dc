//! Stdin/stdout console adapter. Locale/encoding handling happens
//! before lines reach the core; password entry is read without echo.

use std::io::{self, BufRead, Write};

use crate::ports::console_port::{ConsolePort, ReadEvent};

#[derive(Debug, Default)]
pub struct StdinConsole;

impl StdinConsole {
    pub fn new() -> Self {
        Self
    }
}

fn classify(err: io::Error) -> io::Result<ReadEvent> {
    match err.kind() {
        io::ErrorKind::Interrupted => Ok(ReadEvent::Interrupted),
        io::ErrorKind::UnexpectedEof => Ok(ReadEvent::Eof),
        _ => Err(err),
    }
}

impl ConsolePort for StdinConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadEvent> {
        let mut stdout = io::stdout();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => Ok(ReadEvent::Eof),
            Ok(_) => {
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Ok(ReadEvent::Line(line))
            }
            Err(err) => classify(err),
        }
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<ReadEvent> {
        match rpassword::prompt_password(prompt) {
            Ok(password) => Ok(ReadEvent::Line(password)),
            Err(err) => classify(err),
        }
    }

    fn write_line(&mut self, text: &str) {
        println!("{text}");
    }

    fn write_error(&mut self, text: &str) {
        eprintln!("{text}");
    }
}
