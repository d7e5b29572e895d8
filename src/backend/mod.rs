//! Surface backends.

pub mod terminal;

pub use terminal::{Screen, SharedScreen, TerminalBackend, TerminalSession};
