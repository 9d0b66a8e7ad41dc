//! Command registry: maps command names to handler descriptors with
//! arity bounds and documentation. Built once at startup from an
//! explicit registration table; immutable thereafter.

use std::collections::BTreeMap;

use crate::domain::error::{ArityError, ShellError};
use crate::domain::repl::{Flow, Session};

/// Allowed argument count for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    /// `None` means variadic: no upper bound.
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn accepts(&self, count: usize) -> bool {
        self.min <= count && self.max.is_none_or(|max| count <= max)
    }

    /// Render the expected range: `"2"`, `"1+"` or `"1-2"`.
    pub fn expected_text(&self) -> String {
        match self.max {
            Some(max) if max == self.min => format!("{}", self.min),
            Some(max) => format!("{}-{}", self.min, max),
            None => format!("{}+", self.min),
        }
    }

    pub fn check(&self, count: usize) -> Result<(), ArityError> {
        if self.accepts(count) {
            Ok(())
        } else {
            Err(ArityError {
                expected: self.expected_text(),
                actual: count,
            })
        }
    }
}

/// A command implementation. Receives the live session, the registry
/// (for help-style commands) and the raw argument list.
pub type Handler = fn(&mut Session, &CommandRegistry, &[String]) -> Result<Flow, ShellError>;

/// A registered command.
pub struct CommandDescriptor {
    pub name: &'static str,
    /// Usage rendering of the parameters, e.g. `<amount> <price>`.
    pub params: &'static str,
    pub arity: Arity,
    pub doc: &'static str,
    pub handler: Handler,
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, CommandDescriptor>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Names are unique within a registry; a
    /// duplicate is a defect in the startup table.
    pub fn register(&mut self, descriptor: CommandDescriptor) {
        let name = descriptor.name;
        let previous = self.commands.insert(name, descriptor);
        assert!(previous.is_none(), "duplicate command: {name}");
    }

    /// Case-sensitive exact lookup.
    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(name)
    }

    /// All command names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    /// Command names starting with `prefix`, in sorted order.
    pub fn names_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'static str> + 'a {
        self.names().filter(move |name| name.starts_with(prefix))
    }
}
