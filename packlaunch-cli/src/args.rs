use std::path::{Path, PathBuf};

use clap::Parser;

use packlaunch::{PROFILE_FILE_NAME, Profile};

use crate::error::AppError;

// Shamelessly borrowed from https://github.com/crate-ci/clap-cargo/blob/0378657ffdf2b67bcd6f1ab56e04a1322b92dd0e/src/style.rs
// thanks to https://stackoverflow.com/a/79614957
use anstyle::AnsiColor::*;
use anstyle::Effects;
use anstyle::Style;

const HEADER: Style = Green.on_default().effects(Effects::BOLD);
const USAGE: Style = Green.on_default().effects(Effects::BOLD);
const LITERAL: Style = Cyan.on_default().effects(Effects::BOLD);
const PLACEHOLDER: Style = Cyan.on_default();
const ERROR: Style = Red.on_default().effects(Effects::BOLD);
const VALID: Style = Cyan.on_default().effects(Effects::BOLD);
const INVALID: Style = Yellow.on_default().effects(Effects::BOLD);

const APP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(HEADER)
    .usage(USAGE)
    .literal(LITERAL)
    .placeholder(PLACEHOLDER)
    .error(ERROR)
    .valid(VALID)
    .invalid(INVALID);

/// Environment variable naming a profile to use when `--config` is not given.
pub const CONFIG_ENV: &str = "PACKLAUNCH_CONFIG";

#[derive(Debug, Parser)]
#[command(name = "packlaunch", version)]
#[command(about = "Package a mod directory with an external archiver and launch the game with it")]
#[command(long_about = None)]
#[command(styles = APP_STYLING)]
#[command(term_width = 80)]
pub struct Args {
    /// What to do. Defaults to `run`.
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    overrides: Overrides,

    /// Print the commands that would be run without running them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Log more detail. `RUST_LOG` takes precedence when set.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Debug, clap::Args)]
struct Overrides {
    /// Profile to load. If omitted, check the `PACKLAUNCH_CONFIG` environment variable, then look
    /// for `packlaunch.toml` in the current and parent directories, then in the user's config
    /// directory, and finally fall back to the built-in profile.
    #[arg(long, short = 'c', value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Archiver executable (a bare name is looked up on PATH)
    #[arg(long, value_name = "PATH", global = true)]
    archiver: Option<PathBuf>,

    /// Directory whose contents are packaged
    #[arg(long, short = 's', value_name = "DIR", global = true)]
    source: Option<PathBuf>,

    /// Package file to write and load
    #[arg(long, short = 'o', value_name = "FILE", global = true)]
    output: Option<PathBuf>,

    /// Game executable
    #[arg(long, short = 'g', value_name = "PATH", global = true)]
    game: Option<PathBuf>,

    /// Game installation directory, used as the game's working directory
    #[arg(long, value_name = "DIR", global = true)]
    game_dir: Option<PathBuf>,

    /// Wait for the archiver to finish, and check it succeeded, before launching the game
    #[arg(long, short = 'w', global = true)]
    wait: bool,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Build the package, then launch the game with it
    Run,
    /// Build the package and wait for the archiver to finish
    Pack,
    /// Launch the game with the existing package
    Launch,
    /// Print the resolved profile
    Show {
        /// Output format
        #[arg(long, short = 'f', value_enum, value_name = "FORMAT", default_value = "toml")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Output in JSON format
    Json,
    /// Output in TOML format
    Toml,
}

/// Where the profile in use came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOrigin {
    File(PathBuf),
    BuiltIn,
}

impl std::fmt::Display for ProfileOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::BuiltIn => write!(f, "built-in profile"),
        }
    }
}

#[derive(Debug)]
pub struct ValidatedArgs {
    pub command: ValidatedCommand,
    pub profile: Profile,
    pub origin: ProfileOrigin,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatedCommand {
    Run,
    Pack,
    Launch,
    Show { format: OutputFormat },
}

impl From<Option<Command>> for ValidatedCommand {
    fn from(command: Option<Command>) -> Self {
        match command {
            None | Some(Command::Run) => Self::Run,
            Some(Command::Pack) => Self::Pack,
            Some(Command::Launch) => Self::Launch,
            Some(Command::Show { format }) => Self::Show { format },
        }
    }
}

impl ValidatedArgs {
    /// Find the profile to load, or `None` to use the built-in one.
    fn detect_profile_file(arg: Option<PathBuf>) -> Result<Option<PathBuf>, AppError> {
        if let Some(path) = arg {
            return Ok(Some(path));
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(Some(PathBuf::from(path)));
        }
        let mut current_dir = std::env::current_dir()?;
        loop {
            let candidate = current_dir.join(PROFILE_FILE_NAME);
            if candidate.is_file() {
                return Ok(Some(candidate));
            }
            if !current_dir.pop() {
                break;
            }
        }
        Ok(directories::ProjectDirs::from("", "", "packlaunch")
            .map(|dirs| dirs.config_dir().join(PROFILE_FILE_NAME))
            .filter(|candidate| candidate.is_file()))
    }

    fn load_profile(file: Option<PathBuf>) -> Result<(Profile, ProfileOrigin), AppError> {
        match file {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading profile");
                let profile = Profile::load(&path)
                    .map_err(|err| AppError::profile(ProfileOrigin::File(path.clone()), err))?;
                Ok((profile, ProfileOrigin::File(path)))
            }
            None => {
                tracing::debug!("no profile found, using the built-in profile");
                let profile = Profile::compiled_in()
                    .map_err(|err| AppError::profile(ProfileOrigin::BuiltIn, err))?;
                Ok((profile, ProfileOrigin::BuiltIn))
            }
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf, AppError> {
    std::path::absolute(path).map_err(|err| {
        AppError::arg_validation(format!("invalid path {}: {err}", path.display()))
    })
}

impl Overrides {
    /// Apply command-line overrides. Paths given on the command line are relative to the current
    /// directory, except the archiver which may be a bare name. `--game-dir` carries along a game
    /// executable installed under the profile's game directory unless `--game` is also given.
    fn apply(self, profile: &mut Profile) -> Result<(), AppError> {
        if let Some(archiver) = self.archiver {
            profile.archiver.program = archiver;
        }
        if let Some(source) = self.source {
            profile.package.source = absolute(&source)?;
        }
        if let Some(output) = self.output {
            profile.package.destination = absolute(&output)?;
        }
        if let Some(game_dir) = self.game_dir {
            profile.game.set_working_dir(absolute(&game_dir)?);
        }
        if let Some(game) = self.game {
            profile.game.program = absolute(&game)?;
        }
        if self.wait {
            profile.archiver.wait = true;
        }
        Ok(())
    }
}

impl TryFrom<Args> for ValidatedArgs {
    type Error = AppError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let Args {
            command,
            overrides,
            dry_run,
            ..
        } = args;
        let file = ValidatedArgs::detect_profile_file(overrides.config.clone())?;
        let (mut profile, origin) = ValidatedArgs::load_profile(file)?;
        overrides.apply(&mut profile)?;
        let command = ValidatedCommand::from(command);
        // Packing on its own is only useful if we know how it went
        if command == ValidatedCommand::Pack {
            profile.archiver.wait = true;
        }
        if profile.package.destination.as_os_str().is_empty() {
            return Err(AppError::arg_validation(
                "package destination must not be empty".to_string(),
            ));
        }
        Ok(ValidatedArgs {
            command,
            profile,
            origin,
            dry_run,
        })
    }
}

pub fn parse() -> Args {
    Args::parse()
}
