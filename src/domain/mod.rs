//! Shell core: tokenizer, command grammar, registry, REPL and the
//! built-in command set.

pub mod tokenizer;
pub mod parser;
pub mod registry;
pub mod repl;
pub mod commands;
pub mod market;
pub mod credentials;
pub mod error;
