//! Test doubles shared by the unit tests.

use crate::command::Buffer;
use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::process::{ProcessInfo, ProcessSupervisor};
use std::cell::RefCell;
use std::io;

/// Records every request instead of touching the OS.
///
/// `spawn` answers with the program name and arguments joined by spaces,
/// followed by whatever input it was handed.
#[derive(Default)]
pub(crate) struct FakeSupervisor {
    pub table: Vec<ProcessInfo>,
    pub fail_enumerate: bool,
    pub spawned: RefCell<Vec<(String, Vec<String>, Option<Buffer>)>>,
    pub signalled: RefCell<Vec<i32>>,
}

impl FakeSupervisor {
    pub fn with_table(entries: &[(u32, &str)]) -> Self {
        Self {
            table: entries
                .iter()
                .map(|&(pid, name)| ProcessInfo {
                    name: name.to_string(),
                    pid,
                })
                .collect(),
            ..Self::default()
        }
    }
}

impl ProcessSupervisor for FakeSupervisor {
    fn spawn(
        &self,
        _env: &Environment,
        program: &str,
        args: &[String],
        input: Option<Buffer>,
    ) -> Result<Buffer> {
        if program == "missing" {
            return Err(ShellError::ProcessSpawn {
                program: program.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "command not found"),
            });
        }
        self.spawned
            .borrow_mut()
            .push((program.to_string(), args.to_vec(), input.clone()));

        let mut out = std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
            .into_bytes();
        out.push(b'\n');
        out.extend(input.unwrap_or_default());
        Ok(out)
    }

    fn enumerate(&self) -> Result<Vec<ProcessInfo>> {
        if self.fail_enumerate {
            return Err(ShellError::ProcessEnumeration("no table".to_string()));
        }
        Ok(self.table.clone())
    }

    fn signal(&self, pid: i32) -> Result<()> {
        self.signalled.borrow_mut().push(pid);
        Ok(())
    }
}

/// Lets a test keep a handle on the fake after handing it to an interpreter.
impl<T: ProcessSupervisor + ?Sized> ProcessSupervisor for std::rc::Rc<T> {
    fn spawn(
        &self,
        env: &Environment,
        program: &str,
        args: &[String],
        input: Option<Buffer>,
    ) -> Result<Buffer> {
        (**self).spawn(env, program, args, input)
    }

    fn enumerate(&self) -> Result<Vec<ProcessInfo>> {
        (**self).enumerate()
    }

    fn signal(&self, pid: i32) -> Result<()> {
        (**self).signal(pid)
    }
}
