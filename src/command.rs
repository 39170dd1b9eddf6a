use crate::env::Environment;
use crate::error::Result;
use crate::process::ProcessSupervisor;

/// Captured standard output of one stage.
///
/// Moved from stage to stage; `None` at a call site means the previous stage
/// produced nothing, which is different from an empty buffer.
pub type Buffer = Vec<u8>;

/// Everything a command may touch besides its arguments and input.
pub struct Context<'a> {
    /// Session state. `cd` is the only command writing `current_dir`.
    pub env: &'a mut Environment,
    /// Spawns, lists and signals OS processes.
    pub processes: &'a dyn ProcessSupervisor,
    /// True when the current line has more than one stage.
    pub in_pipeline: bool,
}

/// Object-safe capability implemented by every command the shell can run.
pub trait Command {
    /// Runs the command with `args` (command name excluded) and the previous
    /// stage's buffer. Returns the buffer to hand to the next stage, if any.
    fn execute(
        &self,
        args: &[String],
        input: Option<Buffer>,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Buffer>>;
}

/// Factory that tries to create a command from its name.
///
/// Returns `None` when the factory doesn't recognize the `name`.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name.
    fn try_create(&self, name: &str) -> Option<Box<dyn Command>>;
}
