//! Read-eval-print loop: reads one line, tokenizes, parses, resolves
//! each command against the registry, checks arity and invokes the
//! handler. Every per-command failure is reported and contained; only
//! end of input or an `exit` command ends the loop.

use crate::domain::error::{ExchangeError, ShellError};
use crate::domain::parser::{self, ParsedCommand};
use crate::domain::registry::CommandRegistry;
use crate::ports::console_port::{ConsolePort, ReadEvent};
use crate::ports::exchange_port::ExchangePort;

/// The active exchange client and console for one running shell.
/// Lives as long as the process.
pub struct Session {
    pub exchange: Box<dyn ExchangePort>,
    pub console: Box<dyn ConsolePort>,
}

/// Whether the loop should keep reading after a command.
/// End of input is a value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Repl {
    session: Session,
    registry: CommandRegistry,
}

impl Repl {
    pub fn new(session: Session, registry: CommandRegistry) -> Self {
        Self { session, registry }
    }

    /// Run until end of input or an `exit` command.
    pub fn run(&mut self) {
        while self.prompt_once() == Flow::Continue {}
    }

    /// One read-eval-print iteration. The prompt shows the logged-in
    /// username, or nothing when logged out.
    pub fn prompt_once(&mut self) -> Flow {
        let prompt = format!("{}$ ", self.session.exchange.username().unwrap_or(""));
        match self.session.console.read_line(&prompt) {
            Ok(ReadEvent::Line(line)) => self.run_line(&line),
            Ok(ReadEvent::Interrupted) => {
                self.session.console.write_line("");
                Flow::Continue
            }
            Ok(ReadEvent::Eof) => {
                self.session.console.write_line("exit");
                Flow::Exit
            }
            Err(err) => {
                self.session
                    .console
                    .write_error(&format!("input error: {err}"));
                Flow::Exit
            }
        }
    }

    /// Execute every command on one already-read line. A failing
    /// command is reported without aborting its siblings; a malformed
    /// line executes nothing.
    pub fn run_line(&mut self, line: &str) -> Flow {
        let commands = match parser::parse_line(line) {
            Ok(commands) => commands,
            Err(err) => {
                self.session
                    .console
                    .write_line(&err.display_with_context(line));
                return Flow::Continue;
            }
        };
        for command in commands {
            match self.run_command(&command) {
                Ok(Flow::Exit) => return Flow::Exit,
                Ok(Flow::Continue) => {}
                Err(err) => self.report(err),
            }
        }
        Flow::Continue
    }

    fn run_command(&mut self, command: &ParsedCommand) -> Result<Flow, ShellError> {
        let Some(descriptor) = self.registry.get(&command.name) else {
            // unknown commands report and continue, with no arity check
            self.session
                .console
                .write_line(&format!("{}: Unknown command.", command.name));
            return Ok(Flow::Continue);
        };
        descriptor.arity.check(command.args.len())?;
        (descriptor.handler)(&mut self.session, &self.registry, &command.args)
    }

    fn report(&mut self, err: ShellError) {
        let console = &mut self.session.console;
        match err {
            ShellError::Exchange(ExchangeError::Remote(message)) => {
                console.write_line(&format!("Exchange error: {message}"));
            }
            ShellError::Exchange(ExchangeError::NoCredentials) => {
                console.write_line("No login credentials entered. Use the login command first.");
            }
            ShellError::Exchange(ExchangeError::LoginRejected) => {
                console.write_line(
                    "The exchange rejected the login credentials. Maybe you made a typo?",
                );
            }
            ShellError::Arity(err) => console.write_line(&err.to_string()),
            ShellError::Command(message) => console.write_line(&message),
            // Anything else is unexpected: surface the full diagnostic
            // but keep the session alive.
            err @ (ShellError::Exchange(ExchangeError::Transport(_)) | ShellError::Io(_)) => {
                console.write_error(&format!("unexpected error: {err:?}"));
            }
        }
    }
}
