//! Error types for the shell core and its ports.

use std::process::ExitCode;

/// A tokenization error carrying the byte offset of the first
/// character no rule could consume.
#[derive(Debug, Clone, thiserror::Error)]
#[error("syntax error at position {position}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub position: usize,
}

impl SyntaxError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// Wrong argument count for a resolved command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArityError {
    /// Rendered expected range: `"2"`, `"1+"` or `"1-2"`.
    pub expected: String,
    pub actual: usize,
}

impl std::fmt::Display for ArityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let noun = if self.expected == "1" {
            "argument"
        } else {
            "arguments"
        };
        write!(
            f,
            "Expected {} {}, got {}.",
            self.expected, noun, self.actual
        )
    }
}

impl std::error::Error for ArityError {}

/// Failures reported by an exchange client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExchangeError {
    /// An operation required credentials but none are set.
    #[error("no login credentials")]
    NoCredentials,

    /// The remote endpoint refused the supplied credentials.
    #[error("login rejected")]
    LoginRejected,

    /// A business error reported by the exchange, message verbatim.
    #[error("{0}")]
    Remote(String),

    /// Network, protocol or decoding failure. Not a reported business
    /// error; the loop surfaces the full diagnostic.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Everything that can go wrong while executing one parsed command.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Arity(#[from] ArityError),

    /// User-facing validation error from a handler, printed verbatim.
    #[error("{0}")]
    Command(String),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Startup-level error type for coinsh.
#[derive(Debug, thiserror::Error)]
pub enum CoinshError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("unknown exchange: {name}")]
    UnknownExchange { name: String },

    #[error("http client error: {reason}")]
    Client { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CoinshError> for ExitCode {
    fn from(err: &CoinshError) -> Self {
        let code: u8 = match err {
            CoinshError::Io(_) | CoinshError::Client { .. } => 1,
            CoinshError::ConfigParse { .. } | CoinshError::UnknownExchange { .. } => 2,
        };
        ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_caret_points_at_position() {
        let err = SyntaxError {
            message: "unterminated string".to_string(),
            position: 4,
        };
        let ctx = err.display_with_context("say \"oops");
        let lines: Vec<&str> = ctx.lines().collect();
        assert_eq!(lines[0], "say \"oops");
        assert_eq!(lines[1], "    ^");
        assert!(lines[2].contains("position 4"));
    }

    #[test]
    fn arity_error_pluralizes() {
        let err = ArityError {
            expected: "1".to_string(),
            actual: 2,
        };
        assert_eq!(err.to_string(), "Expected 1 argument, got 2.");

        let err = ArityError {
            expected: "1+".to_string(),
            actual: 0,
        };
        assert_eq!(err.to_string(), "Expected 1+ arguments, got 0.");

        let err = ArityError {
            expected: "1-2".to_string(),
            actual: 3,
        };
        assert_eq!(err.to_string(), "Expected 1-2 arguments, got 3.");
    }

    #[test]
    fn command_error_displays_verbatim() {
        let err = ShellError::Command("nope: Invalid order kind.".to_string());
        assert_eq!(err.to_string(), "nope: Invalid order kind.");
    }

    #[test]
    fn exchange_remote_displays_message_only() {
        let err = ExchangeError::Remote("insufficient funds".to_string());
        assert_eq!(err.to_string(), "insufficient funds");
    }
}
