use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{error::AppError, profile::ProfileCollection};

/// Profiles file name, relative to the working or home directory
pub const PROFILES_FILE: &str = "profiles.json";

/// Gets the path to the profiles file in the user's home directory
pub fn get_home_profile_path() -> Result<PathBuf, AppError> {
    let home_dir: PathBuf = dirs::home_dir().ok_or(AppError::HomeDirNotFound)?;
    Ok(home_dir.join(PROFILES_FILE))
}

/// Reads and overwrites the profiles file as a whole
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the profiles from the JSON file.
    ///
    /// A missing or blank file is an empty collection; anything else that
    /// does not parse is an error.
    pub fn load(&self) -> Result<ProfileCollection, AppError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "profiles file absent");
            return Ok(ProfileCollection::new());
        }

        let file_contents: String = fs::read_to_string(&self.path)?;
        if file_contents.trim().is_empty() {
            return Ok(ProfileCollection::new());
        }

        let profiles: ProfileCollection = serde_json::from_str(&file_contents)?;
        debug!(path = %self.path.display(), count = profiles.len(), "loaded profiles");
        Ok(profiles)
    }

    /// Saves the whole collection, replacing the file
    ///
    /// # Arguments
    /// * `profiles` - Collection of profiles to save
    pub fn save(&self, profiles: &ProfileCollection) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json: String = serde_json::to_string_pretty(profiles)?;
        fs::write(&self.path, json)?;
        info!(path = %self.path.display(), count = profiles.len(), "saved profiles");
        Ok(())
    }
}
