//! Capability traits consumed by the shell core.

pub mod config_port;
pub mod console_port;
pub mod exchange_port;
