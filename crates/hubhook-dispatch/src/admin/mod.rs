//! Administrative text-command surface over the dispatcher.

pub mod command;
pub mod handler;

pub use command::{AdminCommand, AdminParseError};
pub use handler::{AdminHandler, MASTER_CLASS};
