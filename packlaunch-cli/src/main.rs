use std::process::ExitCode;

use packlaunch::process::describe;
use packlaunch::{Archiving, Profile};

use crate::args::{OutputFormat, ValidatedArgs, ValidatedCommand};
use crate::error::AppError;

mod args;
mod error;
mod logging;
mod progress;

fn main() -> ExitCode {
    let args = args::parse();
    logging::init(args.verbose);
    match ValidatedArgs::try_from(args).and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let code = ExitCode::from(error.exit_status());
            eprintln!("❌ {:?}", anyhow::Error::from(error));
            code
        }
    }
}

fn run(args: ValidatedArgs) -> Result<(), AppError> {
    tracing::debug!(profile = %args.origin, "using profile");
    let profile = &args.profile;
    if args.dry_run {
        return dry_run(args.command, profile);
    }
    match args.command {
        ValidatedCommand::Show { format } => {
            print!("{}", render(profile, format)?);
        }
        ValidatedCommand::Pack => {
            let package = progress::wait_for_archiver(profile.pack()?)?;
            println!(
                "✅ 📦 Packaged {} into {}",
                profile.package.source.display(),
                package.display()
            );
        }
        ValidatedCommand::Launch => {
            let game = profile.launch()?;
            println!(
                "✅ 🎮 Started {} (pid {}) with {}",
                profile.game.program.display(),
                game.id(),
                profile.package.destination.display()
            );
        }
        ValidatedCommand::Run => {
            let session = profile.run_with(progress::wait_for_archiver)?;
            match &session.archiving {
                Archiving::Running(task) => println!(
                    "🚀 📦 Started archiver (pid {}) for {}",
                    task.id(),
                    task.destination().display()
                ),
                Archiving::Finished(package) => {
                    println!("✅ 📦 Packaged {}", package.display())
                }
            }
            println!(
                "✅ 🎮 Started {} (pid {})",
                profile.game.program.display(),
                session.game.id()
            );
            session.detach();
        }
    }
    Ok(())
}

fn render(profile: &Profile, format: OutputFormat) -> Result<String, AppError> {
    match format {
        OutputFormat::Toml => toml::to_string_pretty(profile).map_err(AppError::render),
        OutputFormat::Json => serde_json::to_string_pretty(profile)
            .map(|json| json + "\n")
            .map_err(AppError::render),
    }
}

fn dry_run(command: ValidatedCommand, profile: &Profile) -> Result<(), AppError> {
    let packs = matches!(command, ValidatedCommand::Run | ValidatedCommand::Pack);
    let launches = matches!(command, ValidatedCommand::Run | ValidatedCommand::Launch);
    if packs {
        println!("rm {}", profile.package.destination.display());
        println!("{}", describe(&profile.archiver.command(&profile.package)));
    }
    if launches {
        let game = profile.game.command(&profile.package.destination);
        println!("cd {}", profile.game.working_dir.display());
        println!("{}", describe(&game));
    }
    if let ValidatedCommand::Show { format } = command {
        print!("{}", render(profile, format)?);
    }
    Ok(())
}
