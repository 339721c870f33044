/// The main error enum for this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to start '{}'", program.display())]
    Spawn {
        program: std::path::PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("source directory does not exist: {}", path.display())]
    MissingSource { path: std::path::PathBuf },
    #[error("Command '{command}' exited with status {status}\n{stderr}")]
    Subprocess {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("archiver finished but no package was written to {}", path.display())]
    PackageNotCreated { path: std::path::PathBuf },
}

impl Error {
    pub(crate) fn spawn<P: Into<std::path::PathBuf>>(program: P, err: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            err,
        }
    }
}
