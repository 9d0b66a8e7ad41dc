//! coinsh — interactive command shell for cryptocurrency exchange accounts.
//!
//! Hexagonal architecture: shell core in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
