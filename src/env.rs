use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Session state owned by the interpreter and handed to every command.
///
/// The environment contains:
/// - `vars`: variables visible to spawned programs; `PATH` drives program lookup.
/// - `current_dir`: the session working directory. Only `cd` writes it, `pwd`
///   reads it, and spawned programs start in it. The shell process' own cwd is
///   never touched.
/// - `should_exit`: set by `exit` and `exec`; the executor stops at the stage
///   that set it and the read-loop ends the process.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, HOME).
    pub vars: HashMap<String, String>,
    /// The session working directory.
    pub current_dir: PathBuf,
    /// When set, the shell must terminate before running anything else.
    pub should_exit: bool,
}

impl Environment {
    /// Capture the current process state into a new session.
    ///
    /// Copies variables from `std::env::vars()` and initializes `current_dir`
    /// from `std::env::current_dir()`.
    pub fn new() -> Self {
        let vars = stdenv::vars().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_dir(vars, current_dir)
    }

    /// Build a session from explicit parts.
    pub fn with_dir(vars: HashMap<String, String>, current_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars,
            current_dir: current_dir.into(),
            should_exit: false,
        }
    }

    /// Get the value of a session variable.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set or override a session variable.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
