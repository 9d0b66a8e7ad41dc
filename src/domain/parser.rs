//! Command grammar: groups a token stream into (name, arguments) pairs.

use crate::domain::error::SyntaxError;
use crate::domain::tokenizer::{self, Token};

/// A command name with its ordered, still-unparsed arguments.
/// Argument interpretation is up to the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

/// Group tokens into commands, splitting on separators.
///
/// A separator with no pending command is a no-op, which tolerates
/// leading, trailing and doubled separators as well as blank lines.
/// A pending command at end of stream is emitted, so no trailing
/// separator is required.
pub fn group(tokens: impl IntoIterator<Item = Token>) -> Vec<ParsedCommand> {
    let mut commands = Vec::new();
    let mut pending: Option<ParsedCommand> = None;
    for token in tokens {
        match token {
            Token::Separator => {
                if let Some(command) = pending.take() {
                    commands.push(command);
                }
            }
            Token::Word(word) => match pending.as_mut() {
                None => {
                    pending = Some(ParsedCommand {
                        name: word,
                        args: Vec::new(),
                    });
                }
                Some(command) => command.args.push(word),
            },
        }
    }
    if let Some(command) = pending {
        commands.push(command);
    }
    commands
}

/// Tokenize and group one raw input line.
pub fn parse_line(line: &str) -> Result<Vec<ParsedCommand>, SyntaxError> {
    Ok(group(tokenizer::tokenize(line)?))
}
