//! Line tokenizer for the shell input language.
//!
//! A line is cut into naked words, quoted strings and `;` separators.
//! Whitespace and `#`-to-end-of-line comments separate tokens without
//! producing any. Tokenization fails on the first character no rule
//! can consume, reporting its byte offset; a failed line yields no
//! partial token list.

use crate::domain::error::SyntaxError;

/// A lexical unit of one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text: a naked word or the unquoted content of a string.
    Word(String),
    /// The `;` command separator.
    Separator,
}

/// Cursor over one line of input. Yields tokens lazily via
/// [`Iterator`]; the first error ends the stream.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume whitespace and `#`-to-end-of-line comments.
    fn skip_blank(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '#' {
                self.pos = self.input.len();
            } else if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// A maximal run of characters outside the special set, where a
    /// backslash escapes the following character (making it transparent
    /// to the other token classes). A backslash with nothing after it
    /// is an error at the backslash's offset.
    fn naked_word(&mut self) -> Result<String, SyntaxError> {
        let mut word = String::new();
        while let Some(ch) = self.peek() {
            match ch {
                '\\' => {
                    let escape_pos = self.pos;
                    self.advance();
                    match self.advance() {
                        Some(escaped) => word.push(escaped),
                        None => {
                            return Err(SyntaxError {
                                message: "stray backslash at end of input".to_string(),
                                position: escape_pos,
                            });
                        }
                    }
                }
                '"' | '\'' | ';' | '#' => break,
                ch if ch.is_whitespace() => break,
                ch => {
                    word.push(ch);
                    self.advance();
                }
            }
        }
        Ok(word)
    }

    /// Quoted string content with the surrounding quotes stripped.
    /// `\\` and an escaped delimiter are the only recognized escapes;
    /// any other escape, or a missing closing quote, fails at the
    /// opening quote's offset (nothing from the string is consumed).
    fn quoted(&mut self, delimiter: char) -> Result<String, SyntaxError> {
        let start = self.pos;
        self.advance();
        let mut content = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(SyntaxError {
                        message: "unterminated string".to_string(),
                        position: start,
                    });
                }
                Some(ch) if ch == delimiter => return Ok(content),
                Some('\\') => match self.advance() {
                    Some(escaped) if escaped == delimiter || escaped == '\\' => {
                        content.push(escaped);
                    }
                    _ => {
                        return Err(SyntaxError {
                            message: "invalid escape in string".to_string(),
                            position: start,
                        });
                    }
                },
                Some(ch) => content.push(ch),
            }
        }
    }

    /// Produce the next token, or `None` at end of line.
    pub fn next_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        self.skip_blank();
        match self.peek() {
            None => Ok(None),
            Some(';') => {
                self.advance();
                Ok(Some(Token::Separator))
            }
            Some('"') => self.quoted('"').map(|word| Some(Token::Word(word))),
            Some('\'') => self.quoted('\'').map(|word| Some(Token::Word(word))),
            Some(_) => self.naked_word().map(|word| Some(Token::Word(word))),
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) => token.map(Ok),
            Err(err) => {
                // stop after the first error
                self.pos = self.input.len();
                Some(Err(err))
            }
        }
    }
}

/// Tokenize a whole line. Fails without any partial result.
pub fn tokenize(line: &str) -> Result<Vec<Token>, SyntaxError> {
    Tokenizer::new(line).collect()
}
