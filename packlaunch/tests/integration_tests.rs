//! Integration tests for the packlaunch library.
//!
//! The archiver and game are stood in for by the shell scripts in `tests/fixtures`, which record
//! how they were invoked. `zipping-archiver.sh` writes a real zip file so package contents can be
//! checked. Tests against a real `7z` are ignored by default; run them with `--ignored`.

#![cfg(unix)]

use std::path::{Path, PathBuf};

use packlaunch::{Archiving, Error, Profile};

fn fixture(name: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make fixture executable");
    path
}

/// A profile rooted in `dir`, with a `pk3` source directory and an `install` game directory.
fn profile_in(dir: &Path, archiver: &str) -> Profile {
    std::fs::create_dir_all(dir.join("pk3")).unwrap();
    std::fs::create_dir_all(dir.join("install/addons")).unwrap();
    let document = format!(
        r#"
[archiver]
program = "{archiver}"

[package]
source = "pk3"
destination = "install/addons/mod.pk3"

[game]
program = "{game}"
working-dir = "install"
"#,
        archiver = fixture(archiver).display(),
        game = fixture("fake-game.sh").display(),
    );
    Profile::try_parse_toml(&document)
        .expect("Failed to parse profile")
        .resolve(dir)
}

fn recorded_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
        .lines()
        .map(str::to_string)
        .collect()
}

fn game_record(package: &Path) -> PathBuf {
    let mut record = package.as_os_str().to_owned();
    record.push(".game");
    PathBuf::from(record)
}

fn archiver_record(package: &Path) -> PathBuf {
    let mut record = package.as_os_str().to_owned();
    record.push(".args");
    PathBuf::from(record)
}

/// Wait for both processes of a session. Returns the package path.
fn finish(session: packlaunch::Session) -> PathBuf {
    let package = match session.archiving {
        Archiving::Running(task) => task.wait().expect("Archiver failed"),
        Archiving::Finished(path) => path,
    };
    let mut game = session.game;
    assert!(game.wait().unwrap().success(), "Game stand-in failed");
    package
}

#[test]
fn test_run_invokes_archiver_and_game_with_the_same_package() {
    let temp_dir = tempfile::tempdir().unwrap();
    let profile = profile_in(temp_dir.path(), "fake-archiver.sh");
    let package = finish(profile.run().expect("Failed to run"));
    assert_eq!(package, profile.package.destination);

    let archiver_args = recorded_lines(&archiver_record(&package));
    assert_eq!(
        archiver_args,
        [
            "a".to_string(),
            "-tzip".to_string(),
            package.display().to_string(),
            temp_dir.path().join("pk3/*").display().to_string(),
        ]
    );

    let game = recorded_lines(&game_record(&package));
    assert_eq!(game.len(), 3, "{game:?}");
    assert_eq!(
        Path::new(&game[0]).canonicalize().unwrap(),
        temp_dir.path().join("install").canonicalize().unwrap()
    );
    assert_eq!(game[1], "-file");
    assert_eq!(game[2], archiver_args[2]);
}

#[test]
fn test_run_replaces_an_existing_package() {
    let temp_dir = tempfile::tempdir().unwrap();
    let profile = profile_in(temp_dir.path(), "fake-archiver.sh");
    std::fs::write(&profile.package.destination, "stale package").unwrap();

    let package = finish(profile.run().expect("Failed to run"));
    let contents = std::fs::read_to_string(package).unwrap();
    assert_eq!(contents, "packaged by fake-archiver\n");
}

#[test]
fn test_run_with_missing_archiver_does_not_start_the_game() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut profile = profile_in(temp_dir.path(), "fake-archiver.sh");
    profile.archiver.program = temp_dir.path().join("7-Zip/7z");

    match profile.run() {
        Err(Error::Spawn { program, .. }) => assert_eq!(program, profile.archiver.program),
        other => panic!("Expected the archiver to fail to start, got {other:?}"),
    }
    assert!(!game_record(&profile.package.destination).exists());
}

#[test]
fn test_run_with_missing_game_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut profile = profile_in(temp_dir.path(), "fake-archiver.sh");
    profile.archiver.wait = true;
    profile.game.program = temp_dir.path().join("install/not-the-game");

    let err = profile.run().unwrap_err();
    assert!(matches!(err, Error::Spawn { .. }), "{err:?}");
    // The package was still built
    assert!(profile.package.destination.is_file());
}

#[test]
fn test_run_waits_for_the_archiver_when_asked() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut profile = profile_in(temp_dir.path(), "fake-archiver.sh");
    profile.archiver.wait = true;

    let session = profile.run().expect("Failed to run");
    assert!(
        matches!(&session.archiving, Archiving::Finished(path) if path == &profile.package.destination)
    );
    // The package is complete before the game is started
    assert!(profile.package.destination.is_file());
    finish(session);
}

#[test]
fn test_failing_archiver_reports_stderr_and_skips_the_game() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut profile = profile_in(temp_dir.path(), "failing-archiver.sh");
    profile.archiver.wait = true;

    match profile.run() {
        Err(Error::Subprocess {
            command,
            status,
            stderr,
        }) => {
            assert!(command.contains("failing-archiver.sh"), "{command}");
            assert_eq!(status.code(), Some(2));
            assert!(stderr.contains("no space left on device"), "{stderr}");
        }
        other => panic!("Expected the archiver to fail, got {other:?}"),
    }
    assert!(!game_record(&profile.package.destination).exists());
}

#[test]
fn test_archiver_that_writes_nothing_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let profile = profile_in(temp_dir.path(), "silent-archiver.sh");

    let task = profile.pack().expect("Failed to start archiver");
    match task.wait() {
        Err(Error::PackageNotCreated { path }) => assert_eq!(path, profile.package.destination),
        other => panic!("Expected no package, got {other:?}"),
    }
}

#[test]
fn test_missing_source_leaves_existing_package_alone() {
    let temp_dir = tempfile::tempdir().unwrap();
    let profile = profile_in(temp_dir.path(), "fake-archiver.sh");
    std::fs::remove_dir(&profile.package.source).unwrap();
    std::fs::write(&profile.package.destination, "previous package").unwrap();

    let err = profile.run().unwrap_err();
    assert!(matches!(err, Error::MissingSource { .. }), "{err:?}");
    assert_eq!(
        std::fs::read_to_string(&profile.package.destination).unwrap(),
        "previous package"
    );
}

#[test]
fn test_launch_only_uses_the_package_path() {
    let temp_dir = tempfile::tempdir().unwrap();
    let profile = profile_in(temp_dir.path(), "fake-archiver.sh");

    let mut game = profile.launch().expect("Failed to launch");
    assert!(game.wait().unwrap().success());
    let record = recorded_lines(&game_record(&profile.package.destination));
    let package = profile.package.destination.display().to_string();
    assert_eq!(record[1..], ["-file", package.as_str()]);
}

/// Look for an executable called `name` on `PATH`.
fn find_on_path(name: &str) -> Option<PathBuf> {
    std::env::split_paths(&std::env::var_os("PATH")?)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

fn seven_zip() -> PathBuf {
    find_on_path("7z").expect("7z is not on PATH")
}

fn archive_entries(package: &Path) -> Vec<String> {
    let file = std::fs::File::open(package).expect("Failed to open package");
    let mut archive = zip::ZipArchive::new(file).expect("Package is not a zip archive");
    // Directory entries are optional in zip files, so only files are compared
    let mut names = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .filter(|name| !name.ends_with('/'))
        .collect::<Vec<_>>();
    names.sort();
    names
}

/// Put `init.lua` and `Lua/think.lua` in the profile's source directory.
fn populate_source(profile: &Profile) {
    let source = &profile.package.source;
    std::fs::write(source.join("init.lua"), "-- bot").unwrap();
    std::fs::create_dir(source.join("Lua")).unwrap();
    std::fs::write(source.join("Lua/think.lua"), "-- think").unwrap();
}

#[test]
fn test_package_holds_exactly_the_source_contents() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut profile = profile_in(temp_dir.path(), "zipping-archiver.sh");
    profile.archiver.wait = true;
    populate_source(&profile);
    std::fs::write(&profile.package.destination, "not a zip").unwrap();

    let package = finish(profile.run().expect("Failed to run"));
    assert_eq!(archive_entries(&package), ["Lua/think.lua", "init.lua"]);
    let game = recorded_lines(&game_record(&package));
    assert_eq!(game[2], package.display().to_string());
}

#[test]
fn test_repacking_drops_files_removed_from_the_source() {
    let temp_dir = tempfile::tempdir().unwrap();
    let profile = profile_in(temp_dir.path(), "zipping-archiver.sh");
    populate_source(&profile);
    std::fs::write(profile.package.source.join("old.lua"), "-- old").unwrap();
    profile.pack().unwrap().wait().expect("Archiver failed");
    assert_eq!(
        archive_entries(&profile.package.destination),
        ["Lua/think.lua", "init.lua", "old.lua"]
    );

    std::fs::remove_file(profile.package.source.join("old.lua")).unwrap();
    let package = profile.pack().unwrap().wait().expect("Archiver failed");
    assert_eq!(archive_entries(&package), ["Lua/think.lua", "init.lua"]);
}

#[test]
fn test_empty_source_gives_empty_package() {
    let temp_dir = tempfile::tempdir().unwrap();
    let profile = profile_in(temp_dir.path(), "zipping-archiver.sh");

    let package = profile.pack().unwrap().wait().expect("Archiver failed");
    assert!(archive_entries(&package).is_empty());
}

#[test]
#[ignore = "needs 7z on PATH"]
fn test_real_archiver_packages_the_source_contents() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut profile = profile_in(temp_dir.path(), "fake-archiver.sh");
    profile.archiver.program = seven_zip();
    profile.archiver.wait = true;
    populate_source(&profile);
    std::fs::write(&profile.package.destination, "not a zip").unwrap();

    let package = finish(profile.run().expect("Failed to run"));
    assert_eq!(archive_entries(&package), ["Lua/think.lua", "init.lua"]);
}

#[test]
#[ignore = "needs 7z on PATH"]
fn test_real_archiver_with_empty_source_gives_empty_package() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut profile = profile_in(temp_dir.path(), "fake-archiver.sh");
    profile.archiver.program = seven_zip();

    let task = profile.pack().expect("Failed to start archiver");
    let package = task.wait().expect("Archiver failed");
    assert!(archive_entries(&package).is_empty());
}
