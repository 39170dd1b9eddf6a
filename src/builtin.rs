use crate::command::{Buffer, Command, Context};
use crate::error::{Result, ShellError};
use log::{debug, info};
use std::fs;
use std::io;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are executed in-process; `exec` and `fork` delegate the actual
/// work to the [`ProcessSupervisor`](crate::process::ProcessSupervisor).
pub(crate) trait BuiltinCommand: Default + 'static {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name() -> &'static str;

    /// Executes the command. See [`Command::execute`].
    fn run(
        &self,
        args: &[String],
        input: Option<Buffer>,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Buffer>>;
}

impl<T: BuiltinCommand> Command for T {
    fn execute(
        &self,
        args: &[String],
        input: Option<Buffer>,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Buffer>> {
        debug!(
            "{} {:?} (input: {:?} bytes, in pipeline: {})",
            T::name(),
            args,
            input.as_ref().map(Vec::len),
            ctx.in_pipeline
        );
        self.run(args, input, ctx)
    }
}

/// Change the session working directory.
///
/// Does nothing inside a multi-stage pipeline or without a target.
#[derive(Default)]
pub struct Cd;

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn run(
        &self,
        args: &[String],
        _input: Option<Buffer>,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Buffer>> {
        if ctx.in_pipeline {
            return Ok(None);
        }
        let Some(target) = args.first() else {
            return Ok(None);
        };
        if target.contains('\0') {
            return Err(ShellError::InvalidArgument(format!(
                "cd: path contains a NUL byte: {target:?}"
            )));
        }

        let new_dir = ctx.env.current_dir.join(target);
        let canonical = fs::canonicalize(&new_dir).map_err(|source| ShellError::DirectoryChange {
            path: new_dir.clone(),
            source,
        })?;
        if !canonical.is_dir() {
            return Err(ShellError::DirectoryChange {
                path: new_dir,
                source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
            });
        }

        info!("cd: {} -> {}", ctx.env.current_dir.display(), canonical.display());
        ctx.env.current_dir = canonical;
        Ok(None)
    }
}

/// Print the session working directory. Arguments are ignored.
#[derive(Default)]
pub struct Pwd;

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn run(
        &self,
        _args: &[String],
        _input: Option<Buffer>,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Buffer>> {
        let dir = &ctx.env.current_dir;
        fs::metadata(dir).map_err(ShellError::WorkingDirectory)?;
        Ok(Some(format!("{}\n", dir.to_string_lossy()).into_bytes()))
    }
}

/// Print the first argument followed by a newline.
#[derive(Default)]
pub struct Echo;

impl BuiltinCommand for Echo {
    fn name() -> &'static str {
        "echo"
    }

    fn run(
        &self,
        args: &[String],
        _input: Option<Buffer>,
        _ctx: &mut Context<'_>,
    ) -> Result<Option<Buffer>> {
        let text = args.first().map_or("", String::as_str);
        Ok(Some(format!("{text}\n").into_bytes()))
    }
}

const PS_HEADER: &str = "PID NAME\n";

/// List live processes as `pid name` lines, ascending by pid.
#[derive(Default)]
pub struct Ps;

impl BuiltinCommand for Ps {
    fn name() -> &'static str {
        "ps"
    }

    fn run(
        &self,
        _args: &[String],
        _input: Option<Buffer>,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Buffer>> {
        let mut procs = ctx.processes.enumerate()?;
        procs.sort_by_key(|p| p.pid);

        let mut out = String::from(PS_HEADER);
        for p in procs {
            out.push_str(&format!("{} {}\n", p.pid, p.name));
        }
        Ok(Some(out.into_bytes()))
    }
}

/// Forcefully terminate the process with the given id.
///
/// Without an argument this is a no-op. Fire-and-forget: success means the
/// signal was delivered to the OS.
#[derive(Default)]
pub struct Kill;

impl BuiltinCommand for Kill {
    fn name() -> &'static str {
        "kill"
    }

    fn run(
        &self,
        args: &[String],
        _input: Option<Buffer>,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Buffer>> {
        let Some(arg) = args.first() else {
            return Ok(None);
        };
        let pid = arg
            .parse::<i32>()
            .ok()
            .filter(|pid| *pid > 0)
            .ok_or_else(|| ShellError::InvalidArgument(format!("kill: {arg}: not a process id")))?;
        ctx.processes.signal(pid)?;
        Ok(None)
    }
}

fn spawn_from_args(
    command: &str,
    args: &[String],
    input: Option<Buffer>,
    ctx: &mut Context<'_>,
) -> Result<Buffer> {
    let (program, rest) = args
        .split_first()
        .ok_or_else(|| ShellError::InvalidArgument(format!("{command}: missing program name")))?;
    ctx.processes.spawn(ctx.env, program, rest, input)
}

/// Run an external program, then end the shell.
///
/// The shell terminates even inside a pipeline: no later stage runs and the
/// captured output is never printed.
#[derive(Default)]
pub struct Exec;

impl BuiltinCommand for Exec {
    fn name() -> &'static str {
        "exec"
    }

    fn run(
        &self,
        args: &[String],
        input: Option<Buffer>,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Buffer>> {
        let output = spawn_from_args(Self::name(), args, input, ctx)?;
        ctx.env.should_exit = true;
        Ok(Some(output))
    }
}

/// Run an external program and capture its output. The shell keeps running.
#[derive(Default)]
pub struct Fork;

impl BuiltinCommand for Fork {
    fn name() -> &'static str {
        "fork"
    }

    fn run(
        &self,
        args: &[String],
        input: Option<Buffer>,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Buffer>> {
        spawn_from_args(Self::name(), args, input, ctx).map(Some)
    }
}

/// Exit shell process. Ignored inside a multi-stage pipeline.
#[derive(Default)]
pub struct Exit;

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn run(
        &self,
        _args: &[String],
        _input: Option<Buffer>,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Buffer>> {
        if !ctx.in_pipeline {
            ctx.env.should_exit = true;
        }
        Ok(None)
    }
}
