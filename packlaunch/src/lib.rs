//! Package a directory of game-modification files and launch the game with the package loaded.
//!
//! Packaging is delegated to an external archiver (7-Zip by default), which is asked to zip the
//! contents of a source directory into a single package file. The game is then started with a
//! load flag pointing at that package, from its own installation directory.
//!
//! # Usage
//!
//! ```rust,no_run
//! use packlaunch::Profile;
//!
//! let profile = Profile::try_parse_toml(r#"
//! [archiver]
//! program = "7z"
//! wait = true
//!
//! [package]
//! source = "/home/me/mod/pk3"
//! destination = "/home/me/.srb2/addons/mod.pk3"
//!
//! [game]
//! program = "lsdl2srb2"
//! working-dir = "/usr/games/srb2"
//! "#)?;
//!
//! let session = profile.run()?;
//! session.detach();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Behaviour
//!
//! - Any existing package is deleted before the archiver starts.
//! - The archiver is invoked as `<archiver> a -tzip <destination> <source>/*`.
//! - The game is invoked as `<game> -file <destination>`.
//! - By default the game is started without waiting for the archiver, as a fire-and-forget pair
//!   of processes. Set `archiver.wait` to wait for the archiver and check its result first.
//!

pub mod archive;
mod error;
pub mod game;
pub mod process;
pub mod profile;
pub mod session;

#[doc(inline)]
pub use crate::archive::{ArchiveTask, ArchiverSpec, PackageSpec};
#[doc(inline)]
pub use crate::error::Error;
#[doc(inline)]
pub use crate::game::GameSpec;
#[doc(inline)]
pub use crate::profile::{PROFILE_FILE_NAME, Profile, ProfileError};
#[doc(inline)]
pub use crate::session::{Archiving, Session};
