//! Packaging and launching in one go.

use std::path::PathBuf;
use std::process::Child;

use crate::archive::ArchiveTask;
use crate::error::Error;
use crate::profile::Profile;

/// What became of the archiver by the time the game was started.
#[derive(Debug)]
pub enum Archiving {
    /// The archiver was not waited on and may still be writing the package.
    Running(ArchiveTask),
    /// The archiver finished and wrote the package at this path.
    Finished(PathBuf),
}

/// The processes started by [`Profile::run`].
#[derive(Debug)]
pub struct Session {
    pub archiving: Archiving,
    pub game: Child,
}

impl Profile {
    /// Remove the old package and start the archiver.
    pub fn pack(&self) -> Result<ArchiveTask, Error> {
        self.archiver.package(&self.package)
    }

    /// Start the game with the package loaded.
    pub fn launch(&self) -> Result<Child, Error> {
        self.game.launch(&self.package.destination)
    }

    /// Build the package, then start the game with it.
    ///
    /// Unless `archiver.wait` is set the game is started immediately after the archiver, so the
    /// two race. If the archiver cannot be started the game is not started either.
    pub fn run(&self) -> Result<Session, Error> {
        self.run_with(ArchiveTask::wait)
    }

    /// Like [`run`](Self::run), but waiting on the archiver is delegated to `wait`, which is only
    /// called when `archiver.wait` is set. This lets callers report progress while they wait.
    pub fn run_with<F>(&self, wait: F) -> Result<Session, Error>
    where
        F: FnOnce(ArchiveTask) -> Result<PathBuf, Error>,
    {
        let task = self.pack()?;
        let archiving = if self.archiver.wait {
            Archiving::Finished(wait(task)?)
        } else {
            Archiving::Running(task)
        };
        let game = self.launch()?;
        Ok(Session { archiving, game })
    }
}

impl Session {
    /// Stop tracking both processes and leave them running.
    pub fn detach(self) {
        if let Archiving::Running(task) = self.archiving {
            task.detach();
        }
        tracing::debug!(pid = self.game.id(), "not waiting for game");
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn archiver_that_cannot_start_is_never_waited_on() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pk3")).unwrap();
        let mut profile = Profile::default().resolve(dir.path());
        profile.package.source = dir.path().join("pk3");
        profile.package.destination = dir.path().join("mod.pk3");
        profile.archiver.program = dir.path().join("missing-archiver");
        profile.archiver.wait = true;
        let mut called = false;
        let result = profile.run_with(|task| {
            called = true;
            task.wait()
        });
        assert!(matches!(result, Err(Error::Spawn { .. })), "{result:?}");
        assert!(!called);
    }
}
