//! Loading a [`Profile`] and resolving the paths in it.

use std::path::{Path, PathBuf};

use crate::archive::{ArchiverSpec, PackageSpec};
use crate::game::GameSpec;

/// Conventional file name for a profile.
pub const PROFILE_FILE_NAME: &str = "packlaunch.toml";

/// Errors encountered when loading a profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// The profile file could not be read.
    #[error("failed to read profile {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// The location of the running executable could not be determined.
    #[error("could not determine the directory of the running executable")]
    ExecutableDir(#[source] std::io::Error),

    /// A toml deserialisation error occurred.
    #[error(transparent)]
    TomlInvalid(#[from] toml::de::Error),
}

/// Everything needed to build a package and launch the game with it.
///
/// Every table and key is optional in toml; missing values take the compiled-in defaults:
///
/// ```toml
/// [archiver]
/// program = '/usr/bin/7z'
/// format = "zip"
/// wait = false
///
/// [package]
/// source = "pk3"
/// destination = '/home/me/.srb2/addons/mod.pk3'
///
/// [game]
/// program = "lsdl2srb2"
/// working-dir = '/usr/games/srb2'
/// load-flag = "-file"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    pub archiver: ArchiverSpec,
    pub package: PackageSpec,
    pub game: GameSpec,
}

impl Profile {
    /// Parse a profile from a toml document. Paths are left as written.
    pub fn try_parse_toml(document: &str) -> Result<Self, ProfileError> {
        Ok(toml::from_str(document)?)
    }

    /// Read a profile from `path`, resolving relative paths against the directory containing it.
    /// The resolved paths are absolute even when `path` is relative.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let read_failed = |err| ProfileError::Read {
            path: path.to_path_buf(),
            err,
        };
        let document = std::fs::read_to_string(path).map_err(read_failed)?;
        let absolute = std::path::absolute(path).map_err(read_failed)?;
        let base = absolute.parent().unwrap_or(Path::new(""));
        Ok(Self::try_parse_toml(&document)?.resolve(base))
    }

    /// The compiled-in profile, with relative paths resolved against the directory holding the
    /// running executable.
    pub fn compiled_in() -> Result<Self, ProfileError> {
        let exe = std::env::current_exe().map_err(ProfileError::ExecutableDir)?;
        let base = exe.parent().ok_or_else(|| {
            ProfileError::ExecutableDir(std::io::Error::other(format!(
                "{} has no parent directory",
                exe.display()
            )))
        })?;
        Ok(Self::default().resolve(base))
    }

    /// Make relative paths absolute with respect to `base`.
    ///
    /// The game executable is resolved against the game's working directory instead, and the
    /// archiver is left alone so that a bare program name is still looked up on `PATH`.
    pub fn resolve<P: AsRef<Path>>(mut self, base: P) -> Self {
        let base = base.as_ref();
        self.package.source = join_relative(base, &self.package.source);
        self.package.destination = join_relative(base, &self.package.destination);
        self.game.working_dir = join_relative(base, &self.game.working_dir);
        self.game.program = join_relative(&self.game.working_dir, &self.game.program);
        self
    }
}

fn join_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
