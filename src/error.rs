use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors a pipeline stage can abort with.
///
/// An unknown command name is deliberately absent: it resolves to a silent no-op.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cd: {}", .path.display())]
    DirectoryChange {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("pwd: cannot read working directory")]
    WorkingDirectory(#[source] io::Error),

    #[error("{program}")]
    ProcessSpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("kill: ({pid})")]
    ProcessSignal {
        pid: i32,
        #[source]
        source: io::Error,
    },

    #[error("ps: {0}")]
    ProcessEnumeration(String),
}

impl ShellError {
    pub(crate) fn spawn(program: impl Into<String>, source: io::Error) -> Self {
        ShellError::ProcessSpawn {
            program: program.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;
