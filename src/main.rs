use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use colored::Colorize;
use inquire::Confirm;
use tracing::{Level, debug, warn};

use crate::{
    cli::{Cli, Commands},
    error::AppError,
    git::{CredentialStore, IdentityBackend},
    profile::{Identity, ProfileCollection},
    session::{Session, Status},
    storage::{ProfileStore, get_home_profile_path},
    validation::validate_profile_name,
};

mod cli;
mod error;
mod git;
mod menu;
mod profile;
mod session;
mod storage;
mod validation;

/// Menu entry for leaving a selection list; never a valid profile name
pub const BACK_OPTION: &str = "back";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            ExitCode::FAILURE
        }
    }
}

/// Installs the stderr log subscriber for the requested verbosity
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    let profiles_path: PathBuf = if cli.home { get_home_profile_path()? } else { cli.file };
    let store = ProfileStore::new(profiles_path);
    let backend = CredentialStore::new().with_program(cli.git);
    debug!(path = %store.path().display(), "using profiles file");

    match cli.command {
        Some(Commands::Current) => show_current_identity(&backend),
        Some(Commands::Set { name, email }) => {
            set_identity(&backend, &name, &email);
        }
        Some(Commands::List) => list_profiles(&store.load()?),
        Some(Commands::Show { profile }) => show_profile(&store.load()?, &profile)?,
        Some(Commands::Save { profile, name, email }) => {
            save_profile(&backend, &store, &profile, name, email)?;
        }
        Some(Commands::Use { profile }) => use_profile(backend, store, &profile)?,
        Some(Commands::Delete { profile, yes }) => delete_profile(backend, store, &profile, yes)?,
        None => menu::run_menu(&mut Session::open(backend, store)?)?,
    }

    Ok(())
}

/// Prints a status line, green for success and red for failure
pub fn print_status(status: Option<&Status>) {
    match status {
        Some(status) if status.is_error() => println!("{}", status.to_string().red()),
        Some(status) => println!("{}", status.to_string().green()),
        None => {}
    }
}

/// Shows the current global Git identity
fn show_current_identity<B: IdentityBackend>(backend: &B) {
    match backend.try_get_identity() {
        Ok(identity) => println!("{} {}", "current user:".blue(), identity),
        Err(_) => println!("{}", "git not configured".red()),
    }
}

/// Overwrites the global Git identity. A rejected write is reported, not returned.
fn set_identity<B: IdentityBackend>(backend: &B, name: &str, email: &str) -> Status {
    let status = match backend.set_identity(name, email) {
        Ok(()) => Status::Info("credentials updated".to_string()),
        Err(err) => {
            warn!(error = %err, "could not write git identity");
            Status::Error("failed to update credentials".to_string())
        }
    };
    print_status(Some(&status));
    status
}

/// Lists every saved profile
pub fn list_profiles(profiles: &ProfileCollection) {
    if profiles.is_empty() {
        println!("{}", "no profiles to show".red());
        return;
    }

    for (profile_name, identity) in profiles.iter() {
        println!("{} {}", format!("{profile_name}:").blue(), identity);
    }
}

/// Shows a single saved profile
fn show_profile(profiles: &ProfileCollection, profile_name: &str) -> Result<(), AppError> {
    let identity = profiles
        .get(profile_name)
        .ok_or_else(|| AppError::ProfileNotFound(profile_name.to_string()))?;
    println!("{} {}", format!("{profile_name}:").blue(), identity);
    Ok(())
}

/// Saves a profile from the current identity, with optional field overrides.
/// Fields git has no value for are stored empty.
fn save_profile<B: IdentityBackend>(
    backend: &B,
    store: &ProfileStore,
    profile_name: &str,
    name: Option<String>,
    email: Option<String>,
) -> Result<Identity, AppError> {
    validate_profile_name(profile_name)?;
    let identity: Identity = match (name, email) {
        (Some(name), Some(email)) => Identity { name, email },
        (name, email) => {
            let current: Identity = backend.get_identity();
            Identity {
                name: name.unwrap_or(current.name),
                email: email.unwrap_or(current.email),
            }
        }
    };

    let mut profiles: ProfileCollection = store.load()?;
    profiles.insert(profile_name, identity.clone());
    store.save(&profiles)?;
    print_status(Some(&Status::Info(format!("saved profile '{profile_name}'"))));
    Ok(identity)
}

/// Switches the global Git identity to a saved profile
fn use_profile<B: IdentityBackend>(backend: B, store: ProfileStore, profile_name: &str) -> Result<(), AppError> {
    let mut session = Session::open(backend, store)?;
    session.use_profile(profile_name)?;
    print_status(session.status());
    Ok(())
}

/// Deletes a saved profile, asking first unless `assume_yes`
fn delete_profile<B: IdentityBackend>(
    backend: B,
    store: ProfileStore,
    profile_name: &str,
    assume_yes: bool,
) -> Result<(), AppError> {
    let mut session = Session::open(backend, store)?;
    if !session.profiles().contains(profile_name) {
        return Err(AppError::ProfileNotFound(profile_name.to_string()));
    }

    let confirmed: bool = assume_yes
        || Confirm::new(&format!("delete profile '{profile_name}'?"))
            .with_default(false)
            .prompt()?;
    if !confirmed {
        println!("{}", "cancelled".yellow());
        return Ok(());
    }

    session.delete_profile(profile_name)?;
    print_status(session.status());
    Ok(())
}
