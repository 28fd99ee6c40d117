use colored::Colorize;
use inquire::Text;

use crate::{BACK_OPTION, error::AppError, profile::ProfileCollection};

/// Maximum length for a profile name
const MAX_PROFILE_NAME_LENGTH: usize = 64;

/// Prompts user for input until valid input is provided
pub fn prompt_until_valid<F>(prompt_message: &str, input_validation: F) -> Result<String, AppError>
where
    F: Fn(&str) -> Result<(), AppError>,
{
    loop {
        let input: String = Text::new(prompt_message).prompt()?;
        match input_validation(&input) {
            Ok(_) => break Ok(input),
            Err(AppError::Validation(msg)) => println!("{}", msg.red()),
            Err(e) => return Err(e),
        }
    }
}

/// Validates a profile name.
///
/// Name and email are stored as given; only the key the profile is saved
/// under is checked.
pub fn validate_profile_name(profile_name: &str) -> Result<(), AppError> {
    if profile_name.trim().is_empty() {
        Err(AppError::Validation("Profile name cannot be empty".to_string()))
    } else if profile_name.chars().count() > MAX_PROFILE_NAME_LENGTH {
        Err(AppError::Validation(format!(
            "Profile name too long (max {} characters)",
            MAX_PROFILE_NAME_LENGTH
        )))
    } else if profile_name == BACK_OPTION {
        Err(AppError::Validation(format!("Profile name cannot be '{}'", BACK_OPTION)))
    } else {
        Ok(())
    }
}

/// Checks if any profiles exist
pub fn check_if_profiles_exist(profiles: &ProfileCollection) -> Result<(), AppError> {
    if profiles.is_empty() {
        return Err(AppError::Validation("no profiles found".to_string()));
    }
    Ok(())
}
