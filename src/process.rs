//! Process supervision: spawning external programs, listing the host process
//! table and sending termination signals.

use crate::command::Buffer;
use crate::env::Environment;
use crate::error::{Result, ShellError};
use log::{debug, info};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{self, Stdio};
use std::thread;

/// One entry of the live process table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub name: String,
    pub pid: u32,
}

/// Operating-system side of `exec`, `fork`, `ps` and `kill`.
pub trait ProcessSupervisor {
    /// Run `program` with `args` to completion inside the session directory.
    ///
    /// `input`, when present, becomes the program's stdin; otherwise stdin is
    /// empty. Returns everything the program wrote to stdout. A non-zero exit
    /// status is not an error.
    fn spawn(
        &self,
        env: &Environment,
        program: &str,
        args: &[String],
        input: Option<Buffer>,
    ) -> Result<Buffer>;

    /// Snapshot of the live process table, in no particular order.
    fn enumerate(&self) -> Result<Vec<ProcessInfo>>;

    /// Send a forceful termination signal. Does not wait for the target to exit.
    fn signal(&self, pid: i32) -> Result<()>;
}

/// [`ProcessSupervisor`] backed by the host OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSupervisor;

impl ProcessSupervisor for SystemSupervisor {
    fn spawn(
        &self,
        env: &Environment,
        program: &str,
        args: &[String],
        input: Option<Buffer>,
    ) -> Result<Buffer> {
        let path = resolve_program(env, program).ok_or_else(|| {
            ShellError::spawn(
                program,
                io::Error::new(io::ErrorKind::NotFound, "command not found"),
            )
        })?;
        debug!("spawning {} {:?}", path.display(), args);

        let mut child = process::Command::new(&path)
            .args(args)
            .env_clear()
            .envs(&env.vars)
            .current_dir(&env.current_dir)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ShellError::spawn(program, e))?;

        // Feed stdin from another thread: a child that fills its stdout pipe
        // before draining stdin would otherwise block us both.
        let writer = match (input, child.stdin.take()) {
            (Some(buf), Some(mut stdin)) => Some(thread::spawn(move || stdin.write_all(&buf))),
            _ => None,
        };

        let output = child
            .wait_with_output()
            .map_err(|e| ShellError::spawn(program, e))?;

        if let Some(Ok(Err(e))) = writer.map(|w| w.join()) {
            // The child may legitimately exit without reading its input.
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(ShellError::spawn(program, e));
            }
        }

        if !output.status.success() {
            debug!("{} exited with {}", program, output.status);
        }
        Ok(output.stdout)
    }

    fn enumerate(&self) -> Result<Vec<ProcessInfo>> {
        use sysinfo::{ProcessRefreshKind, RefreshKind, System};

        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ShellError::ProcessEnumeration(
                "process table is not available on this platform".to_string(),
            ));
        }

        let system = System::new_with_specifics(
            RefreshKind::nothing().with_processes(ProcessRefreshKind::nothing()),
        );
        Ok(system
            .processes()
            .iter()
            .filter(|(_, p)| p.thread_kind().is_none())
            .map(|(pid, p)| ProcessInfo {
                name: p.name().to_string_lossy().into_owned(),
                pid: pid.as_u32(),
            })
            .collect())
    }

    #[cfg(unix)]
    fn signal(&self, pid: i32) -> Result<()> {
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        kill(Pid::from_raw(pid), Signal::SIGKILL).map_err(|errno| ShellError::ProcessSignal {
            pid,
            source: io::Error::from(errno),
        })?;
        info!("sent SIGKILL to {}", pid);
        Ok(())
    }

    #[cfg(not(unix))]
    fn signal(&self, pid: i32) -> Result<()> {
        use sysinfo::{Pid, ProcessesToUpdate, System};

        let target = Pid::from_u32(pid as u32);
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::Some(&[target]), true);
        let killed = system.process(target).map(|p| p.kill());
        match killed {
            Some(true) => {
                info!("terminated {}", pid);
                Ok(())
            }
            Some(false) => Err(ShellError::ProcessSignal {
                pid,
                source: io::Error::other("termination refused"),
            }),
            None => Err(ShellError::ProcessSignal {
                pid,
                source: io::Error::new(io::ErrorKind::NotFound, "no such process"),
            }),
        }
    }
}

/// Locate the executable a stage names, the way a typical shell would.
///
/// - A name with a path separator resolves against the session directory
///   (absolute paths are taken as-is).
/// - A bare name is searched in the session `PATH`; relative `PATH` entries
///   resolve against the session directory.
/// - An empty name resolves to nothing.
pub fn resolve_program(env: &Environment, name: &str) -> Option<PathBuf> {
    let path = Path::new(name);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(_), None) if !path.is_absolute() => {
            let search_paths = env.get_var("PATH")?;
            std::env::split_paths(search_paths)
                .map(|dir| env.current_dir.join(dir).join(path))
                .find(|candidate| candidate.is_file())
        }
        _ => {
            let candidate = env.current_dir.join(path);
            candidate.is_file().then_some(candidate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    fn env_with_path(path: &str, dir: impl Into<PathBuf>) -> Environment {
        let mut vars = HashMap::new();
        vars.insert("PATH".to_string(), path.to_string());
        Environment::with_dir(vars, dir)
    }

    #[test]
    fn test_resolve_empty_name_is_none() {
        let env = env_with_path("/bin", "/");
        assert_eq!(resolve_program(&env, ""), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_bare_name_searches_path() {
        let env = env_with_path("/nonexistent_dir_for_pipesh:/bin:/usr/bin", "/");
        let found = resolve_program(&env, "sh").expect("sh should be on PATH");
        assert!(found.ends_with("sh"));
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_without_path_var_is_none() {
        let env = Environment::with_dir(HashMap::new(), "/");
        assert_eq!(resolve_program(&env, "sh"), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_absolute_and_relative_paths() {
        let env = env_with_path("", "/bin");
        assert_eq!(resolve_program(&env, "/bin/sh"), Some(PathBuf::from("/bin/sh")));
        assert_eq!(resolve_program(&env, "./sh"), Some(PathBuf::from("/bin/./sh")));
        assert_eq!(resolve_program(&env, "/bin/nonexisting_pipesh"), None);
    }

    #[test]
    fn test_resolve_directory_is_not_a_program() {
        let tmp = std::env::temp_dir();
        let name = format!("pipesh_resolve_dir_{}", std::process::id());
        fs::create_dir_all(tmp.join(&name)).unwrap();

        let env = env_with_path(tmp.to_str().unwrap(), &tmp);
        assert_eq!(resolve_program(&env, &name), None);

        let _ = fs::remove_dir_all(tmp.join(&name));
    }

    #[test]
    #[cfg(unix)]
    fn test_spawn_captures_stdout() {
        let env = Environment::new();
        let out = SystemSupervisor
            .spawn(&env, "echo", &["hi".to_string()], None)
            .unwrap();
        assert_eq!(out, b"hi\n");
    }

    #[test]
    #[cfg(unix)]
    fn test_spawn_feeds_input_to_stdin() {
        let env = Environment::new();
        let out = SystemSupervisor
            .spawn(&env, "cat", &[], Some(b"from previous stage\n".to_vec()))
            .unwrap();
        assert_eq!(out, b"from previous stage\n");
    }

    #[test]
    #[cfg(unix)]
    fn test_spawn_large_input_does_not_deadlock() {
        let env = Environment::new();
        let input = vec![b'x'; 1 << 20];
        let out = SystemSupervisor
            .spawn(&env, "cat", &[], Some(input.clone()))
            .unwrap();
        assert_eq!(out.len(), input.len());
    }

    #[test]
    #[cfg(unix)]
    fn test_spawn_runs_in_session_directory() {
        let env = Environment::with_dir(Environment::new().vars, "/");
        let out = SystemSupervisor.spawn(&env, "pwd", &[], None).unwrap();
        assert_eq!(out, b"/\n");
    }

    #[test]
    #[cfg(unix)]
    fn test_spawn_ignores_unread_input() {
        let env = Environment::new();
        let out = SystemSupervisor
            .spawn(&env, "echo", &["b".to_string()], Some(b"a\n".to_vec()))
            .unwrap();
        assert_eq!(out, b"b\n");
    }

    #[test]
    #[cfg(unix)]
    fn test_spawn_nonzero_exit_is_not_an_error() {
        let env = Environment::new();
        let out = SystemSupervisor.spawn(&env, "false", &[], None).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_spawn_unknown_program_fails() {
        let env = Environment::new();
        let err = SystemSupervisor
            .spawn(&env, "definitely_not_a_program_pipesh", &[], None)
            .unwrap_err();
        match err {
            ShellError::ProcessSpawn { program, source } => {
                assert_eq!(program, "definitely_not_a_program_pipesh");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_enumerate_contains_current_process() {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return;
        }
        let procs = SystemSupervisor.enumerate().unwrap();
        let me = std::process::id();
        assert!(procs.iter().any(|p| p.pid == me));
    }

    #[test]
    #[cfg(unix)]
    fn test_signal_kills_child() {
        use std::os::unix::process::ExitStatusExt;

        let mut child = std::process::Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("spawn sleep");
        SystemSupervisor.signal(child.id() as i32).unwrap();
        let status = child.wait().unwrap();
        assert_eq!(status.signal(), Some(9));
    }

    #[test]
    #[cfg(unix)]
    fn test_signal_missing_process_fails() {
        // Above the default Linux pid_max, so it can't name a live process.
        let err = SystemSupervisor.signal(i32::MAX).unwrap_err();
        assert!(matches!(err, ShellError::ProcessSignal { pid, .. } if pid == i32::MAX));
    }
}
