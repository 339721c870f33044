//! Launching the game with a package loaded.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use crate::error::Error;
use crate::process;

#[cfg(windows)]
const DEFAULT_WORKING_DIR: &str = r"D:\Games\Sonic Robo Blast 2\";
#[cfg(windows)]
const DEFAULT_PROGRAM: &str = "srb2win.exe";

#[cfg(not(windows))]
const DEFAULT_WORKING_DIR: &str = "/usr/games/srb2";
#[cfg(not(windows))]
const DEFAULT_PROGRAM: &str = "lsdl2srb2";

pub(crate) fn default_working_dir() -> PathBuf {
    PathBuf::from(DEFAULT_WORKING_DIR)
}

/// The game executable and how a package is handed to it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GameSpec {
    /// The game executable. Relative paths are taken from the working directory.
    pub program: PathBuf,
    /// The game's installation directory.
    pub working_dir: PathBuf,
    /// Flag that precedes the package path on the game's command line.
    pub load_flag: String,
}

impl Default for GameSpec {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            working_dir: default_working_dir(),
            load_flag: "-file".to_string(),
        }
    }
}

impl GameSpec {
    /// Move the game to another installation directory. A program that lives under the old
    /// directory moves with it; one installed elsewhere is kept as is.
    pub fn set_working_dir(&mut self, working_dir: PathBuf) {
        if let Ok(relative) = self.program.strip_prefix(&self.working_dir) {
            self.program = working_dir.join(relative);
        }
        self.working_dir = working_dir;
    }

    /// Build `<game> <load-flag> <package>`, run from the game's installation directory.
    pub fn command<P: AsRef<Path>>(&self, package: P) -> Command {
        let mut game = Command::new(&self.program);
        game.arg(&self.load_flag)
            .arg(package.as_ref())
            .current_dir(&self.working_dir)
            .stdin(Stdio::null());
        game
    }

    /// Start the game with `package` loaded. The game is never waited on.
    pub fn launch<P: AsRef<Path>>(&self, package: P) -> Result<Child, Error> {
        let child = process::spawn(&mut self.command(package))?;
        tracing::info!(pid = child.id(), "started game");
        Ok(child)
    }
}
