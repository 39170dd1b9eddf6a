use crate::command::{Buffer, Context};
use crate::env::Environment;
use crate::error::Result;
use crate::parser::Pipeline;
use crate::process::{ProcessSupervisor, SystemSupervisor};
use crate::registry::Registry;
use log::{debug, warn};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, Write};

/// A minimal shell-like interpreter running pipelines of built-in commands.
///
/// The interpreter owns the session [`Environment`], a [`Registry`] that
/// resolves command names and the [`ProcessSupervisor`] used by `exec`, `fork`,
/// `ps` and `kill`.
///
/// Example
/// ```
/// use pipesh::Interpreter;
/// let mut sh = Interpreter::default();
/// let out = sh.execute_line("echo a | echo hello").unwrap();
/// assert_eq!(out.as_deref(), Some(&b"hello\n"[..]));
/// ```
pub struct Interpreter {
    env: Environment,
    registry: Registry,
    processes: Box<dyn ProcessSupervisor>,
}

impl Interpreter {
    /// Create an interpreter with a custom registry and process supervisor.
    pub fn new(registry: Registry, processes: Box<dyn ProcessSupervisor>) -> Self {
        Self::with_env(Environment::new(), registry, processes)
    }

    /// Like [`Interpreter::new`], starting from an explicit session.
    pub fn with_env(
        env: Environment,
        registry: Registry,
        processes: Box<dyn ProcessSupervisor>,
    ) -> Self {
        Self {
            env,
            registry,
            processes,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// True once `exit` or `exec` asked the shell to terminate.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Execute one line and return the last stage's buffer.
    ///
    /// Stages run strictly left to right; each one receives the previous
    /// stage's buffer. The first error aborts the line and discards every
    /// buffer produced so far. An unknown command name or an empty stage is a
    /// no-op yielding no buffer. Once a stage requests termination nothing
    /// else runs and nothing is returned.
    pub fn execute_line(&mut self, line: &str) -> Result<Option<Buffer>> {
        let pipeline = Pipeline::parse(line);
        let in_pipeline = pipeline.is_multi_stage();
        let mut buffer: Option<Buffer> = None;

        for (i, stage) in pipeline.stages().iter().enumerate() {
            let Some(command) = stage.name().and_then(|name| self.registry.lookup(name)) else {
                debug!("stage {}: {:?} is not a command, skipping", i, stage.name());
                buffer = None;
                continue;
            };

            let mut ctx = Context {
                env: &mut self.env,
                processes: self.processes.as_ref(),
                in_pipeline,
            };
            buffer = command
                .execute(stage.args(), buffer.take(), &mut ctx)
                .inspect_err(|e| debug!("stage {}: aborting pipeline: {}", i, e))?;

            if self.env.should_exit {
                debug!("stage {}: shell termination requested", i);
                return Ok(None);
            }
        }

        Ok(buffer)
    }

    /// Execute one line and write a non-empty final buffer to `out`, once.
    pub fn run_line(&mut self, line: &str, out: &mut dyn Write) -> anyhow::Result<()> {
        if let Some(buf) = self.execute_line(line)?.filter(|b| !b.is_empty()) {
            out.write_all(&buf)?;
            out.flush()?;
        }
        Ok(())
    }

    /// Interactive read-eval-print loop.
    ///
    /// The prompt shows the session directory. Errors are reported on stderr
    /// and the loop keeps reading. Returns on Ctrl-D or once the shell was
    /// asked to terminate.
    pub fn repl(&mut self, history: bool) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;

        while !self.env.should_exit {
            let prompt = format!("{}$ ", self.env.current_dir.display());
            match rl.readline(&prompt) {
                Ok(line) => {
                    if history && !line.trim().is_empty() {
                        if let Err(err) = rl.add_history_entry(line.as_str()) {
                            warn!("failed to record history entry: {}", err);
                        }
                    }
                    if let Err(err) = self.run_line(&line, &mut io::stdout()) {
                        eprintln!("{err:#}");
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// The built-in registry backed by the host OS.
    fn default() -> Self {
        Self::new(Registry::default(), Box::new(SystemSupervisor))
    }
}
