//! Simulated git: classifies terminal input and computes the next repository state.

pub mod error;
pub mod interpreter;
pub mod shell;
pub mod table;
pub mod verbs;

pub use error::GitError;
pub use interpreter::Interpreter;
pub use shell::SHELL_HELP;
pub use verbs::help::{similar_command, USAGE_BANNER};
