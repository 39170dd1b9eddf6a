//! A tiny shell core: pipelines of built-in commands with captured output.
//!
//! One input line is split on `|` into stages. Each stage is resolved by name
//! in a [`Registry`] and executed with the previous stage's captured output;
//! the last stage's output is what the line prints. Stages run one after
//! another on the calling thread, so every buffer is fully materialized
//! before the next stage starts.
//!
//! Built-ins: `cd`, `pwd`, `echo`, `ps`, `kill`, `exec`, `fork`, `exit`.
//! External programs are only reachable through `exec` and `fork`. Any other
//! name is silently ignored.
//!
//! The main entry point is [`Interpreter`]. The public modules [`command`],
//! [`env`] and [`process`] expose the traits and types needed to plug in
//! custom commands or a different process backend.

mod builtin;
pub mod command;
pub mod env;
pub mod error;
mod interpreter;
pub mod parser;
pub mod process;
mod registry;
#[cfg(test)]
mod testing;

pub use error::{Result, ShellError};
pub use interpreter::Interpreter;
pub use registry::Registry;
