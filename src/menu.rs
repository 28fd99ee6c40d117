use colored::Colorize;
use inquire::{Confirm, Select, Text};

use crate::{
    BACK_OPTION,
    error::AppError,
    git::IdentityBackend,
    list_profiles, print_status,
    profile::{Identity, ProfileCollection},
    session::Session,
    validation::{check_if_profiles_exist, prompt_until_valid, validate_profile_name},
};

/// Runs interactive menu interface
pub fn run_menu<B: IdentityBackend>(session: &mut Session<B>) -> Result<(), AppError> {
    println!("{} {}", "profiles file:".blue(), session.store().path().display());
    show_form(session);
    print_status(session.status());

    loop {
        let actions: Vec<&'static str> = vec![
            "edit credentials",
            "save credentials",
            "refresh",
            "select profile",
            "load profile",
            "save profile",
            "delete profile",
            "show all profiles",
            "quit",
        ];

        let action_selected: &'static str = Select::new(&format!("{}", "select action".blue()), actions)
            .prompt()?;

        let outcome = match action_selected {
            "edit credentials" => menu_edit_credentials(session),
            "save credentials" => {
                session.save_credentials();
                Ok(())
            }
            "refresh" => {
                session.refresh();
                Ok(())
            }
            "select profile" => menu_select_profile(session),
            "load profile" => {
                session.load_selected();
                Ok(())
            }
            "save profile" => menu_save_profile(session),
            "delete profile" => match menu_delete_profile(session) {
                Ok(false) => {
                    println!("{}", "cancelled".yellow());
                    continue;
                }
                outcome => outcome.map(|_| ()),
            },
            "show all profiles" => {
                list_profiles(session.profiles());
                continue;
            }
            "quit" => {
                println!("{}", "quitting".yellow());
                break Ok(());
            }
            _ => unreachable!("unexpected input"),
        };

        match outcome {
            Ok(()) => {
                show_form(session);
                print_status(session.status());
            }
            Err(AppError::Validation(msg)) => println!("{}", msg.red()),
            Err(err @ AppError::ProfileNotFound(_)) => println!("{}", err.to_string().red()),
            Err(err) => return Err(err),
        }
    }
}

/// Prints the form fields and the selected profile
fn show_form<B: IdentityBackend>(session: &Session<B>) {
    let selection: &str = session.selection().unwrap_or("none");
    println!(
        "{} {} {} {}",
        "identity:".blue(),
        session.form(),
        "profile:".blue(),
        selection
    );
}

/// Menu for editing the form fields
fn menu_edit_credentials<B: IdentityBackend>(session: &mut Session<B>) -> Result<(), AppError> {
    let name: String = Text::new(&format!("{}", "git username:".blue()))
        .with_initial_value(&session.form().name)
        .prompt()?;
    let email: String = Text::new(&format!("{}", "git email:".blue()))
        .with_initial_value(&session.form().email)
        .prompt()?;

    session.set_form(Identity { name, email });
    Ok(())
}

/// Menu for choosing the selected profile
fn menu_select_profile<B: IdentityBackend>(session: &mut Session<B>) -> Result<(), AppError> {
    let Some(profile_name) = choose_profile(session.profiles(), "select profile:")? else {
        session.clear_selection();
        return Ok(());
    };
    session.select(&profile_name)
}

/// Menu for saving the form as a profile
fn menu_save_profile<B: IdentityBackend>(session: &mut Session<B>) -> Result<(), AppError> {
    let profile_name: String = prompt_until_valid(
        &format!("{}", "enter profile name:".blue()),
        validate_profile_name,
    )?;
    session.save_profile(&profile_name)
}

/// Menu for deleting a profile after confirmation. Returns whether it was deleted.
fn menu_delete_profile<B: IdentityBackend>(session: &mut Session<B>) -> Result<bool, AppError> {
    let Some(profile_name) = choose_profile(session.profiles(), "select profile to delete:")? else {
        return Ok(false);
    };

    let confirmed: bool = Confirm::new(&format!("delete profile '{profile_name}'?"))
        .with_default(false)
        .prompt()?;
    if confirmed {
        session.delete_profile(&profile_name)?;
    }
    Ok(confirmed)
}

/// Lets the user pick a profile name; `None` when they go back
fn choose_profile(profiles: &ProfileCollection, prompt: &str) -> Result<Option<String>, AppError> {
    check_if_profiles_exist(profiles)?;

    let profile_names: Vec<String> = build_profile_list(profiles);
    let chosen: String = Select::new(&format!("{}", prompt.blue()), profile_names).prompt()?;

    Ok((chosen != BACK_OPTION).then_some(chosen))
}

/// Builds list of profile names for menu to display
pub fn build_profile_list(profiles: &ProfileCollection) -> Vec<String> {
    let mut profile_names: Vec<String> = profiles.names();
    profile_names.push(BACK_OPTION.to_string());
    profile_names
}
