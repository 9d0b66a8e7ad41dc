//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod mtgox_adapter;
pub mod stdin_console;
