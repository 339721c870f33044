//! Building a package from a source directory with an external archiver.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use crate::error::Error;
use crate::process;

#[cfg(windows)]
const DEFAULT_ARCHIVER: &str = r"C:\Program Files\7-Zip\7z.exe";
#[cfg(not(windows))]
const DEFAULT_ARCHIVER: &str = "7z";

const DEFAULT_SOURCE: &str = "../../pk3";

/// The external archiver and how it is driven.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ArchiverSpec {
    /// Path to the archiver, or a bare name to look up on `PATH`.
    pub program: PathBuf,
    /// Archive type, passed to the archiver as `-t<format>`.
    pub format: String,
    /// Wait for the archiver to finish (and check that it succeeded) before launching the game.
    pub wait: bool,
}

impl Default for ArchiverSpec {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_ARCHIVER),
            format: "zip".to_string(),
            wait: false,
        }
    }
}

/// Where the package contents come from and where the package is written.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PackageSpec {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl Default for PackageSpec {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            destination: crate::game::default_working_dir()
                .join("Addons")
                .join("Self")
                .join("VL_foxBot.pk3"),
        }
    }
}

impl PackageSpec {
    /// The wildcard handed to the archiver. The archiver expands it itself, so the contents of
    /// the source directory (and not the directory) end up at the root of the package.
    pub fn source_glob(&self) -> PathBuf {
        self.source.join("*")
    }
}

impl ArchiverSpec {
    /// Build `<archiver> a -t<format> <destination> <source>/*`.
    pub fn command(&self, package: &PackageSpec) -> Command {
        let mut archiver = Command::new(&self.program);
        archiver
            .arg("a")
            .arg(format!("-t{}", self.format))
            .arg(&package.destination)
            .arg(package.source_glob());
        archiver.stdin(Stdio::null());
        archiver
    }

    /// Remove any existing package and start the archiver.
    ///
    /// The source directory is checked before anything is deleted. The archiver's output is
    /// captured when [`wait`](Self::wait) is set so that it can be reported on failure, otherwise
    /// it goes straight to the terminal.
    pub fn package(&self, package: &PackageSpec) -> Result<ArchiveTask, Error> {
        if !package.source.is_dir() {
            return Err(Error::MissingSource {
                path: package.source.clone(),
            });
        }
        remove_existing(&package.destination)?;
        let mut archiver = self.command(package);
        if self.wait {
            archiver.stdout(Stdio::piped()).stderr(Stdio::piped());
        }
        let child = process::spawn(&mut archiver)?;
        tracing::info!(pid = child.id(), "started archiver");
        Ok(ArchiveTask {
            child,
            command: process::describe(&archiver),
            destination: package.destination.clone(),
        })
    }
}

/// Delete the package at `destination`. Returns `false` if there was nothing to delete.
pub fn remove_existing<P: AsRef<Path>>(destination: P) -> Result<bool, std::io::Error> {
    let destination = destination.as_ref();
    match std::fs::remove_file(destination) {
        Ok(()) => {
            tracing::debug!(path = %destination.display(), "removed existing package");
            Ok(true)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// A running archiver process.
#[derive(Debug)]
pub struct ArchiveTask {
    child: Child,
    command: String,
    destination: PathBuf,
}

impl ArchiveTask {
    /// OS process id of the archiver.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// The package the archiver is writing.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// The archiver command line, for display.
    pub fn command_line(&self) -> &str {
        &self.command
    }

    /// Block until the archiver exits. Fails if it exited unsuccessfully or did not write the
    /// package. Returns the package path.
    pub fn wait(self) -> Result<PathBuf, Error> {
        let output = self.child.wait_with_output()?;
        if !output.status.success() {
            return Err(Error::Subprocess {
                command: self.command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        if !self.destination.is_file() {
            return Err(Error::PackageNotCreated {
                path: self.destination,
            });
        }
        tracing::debug!(path = %self.destination.display(), "package written");
        Ok(self.destination)
    }

    /// Stop tracking the archiver and leave it running.
    pub fn detach(self) {
        tracing::debug!(pid = self.child.id(), "not waiting for archiver");
    }
}
