use std::{
    ffi::OsString,
    path::PathBuf,
    process::{Command, ExitStatus, Output, Stdio},
};

use tracing::{debug, info, warn};

use crate::{error::AppError, profile::Identity};

const GIT_PROGRAM: &str = "git";
const USER_NAME_KEY: &str = "user.name";
const USER_EMAIL_KEY: &str = "user.email";

/// Source and sink of the active Git identity
pub trait IdentityBackend {
    /// Reads the identity, reporting why it could not be read
    fn try_get_identity(&self) -> Result<Identity, AppError>;

    /// Writes both fields of the identity
    fn set_identity(&self, name: &str, email: &str) -> Result<(), AppError>;

    /// Reads the identity, falling back to empty fields when it is not configured
    fn get_identity(&self) -> Identity {
        match self.try_get_identity() {
            Ok(identity) => identity,
            Err(err) => {
                warn!(error = %err, "git identity unavailable");
                Identity::default()
            }
        }
    }
}

/// Reads and writes user.name / user.email through `git config`
#[derive(Debug, Clone)]
pub struct CredentialStore {
    program: OsString,
    current_dir: Option<PathBuf>,
    envs: Vec<(OsString, OsString)>,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    pub fn new() -> Self {
        Self {
            program: GIT_PROGRAM.into(),
            current_dir: None,
            envs: Vec::new(),
        }
    }

    /// Uses another executable in place of `git`
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Runs Git commands from `dir`
    #[cfg(test)]
    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Sets an environment variable for every Git command
    #[cfg(test)]
    pub fn with_env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command.envs(self.envs.iter().map(|(key, value)| (key, value)));
        command
    }

    /// Executes Git config get command
    ///
    /// # Arguments
    /// * `key` - Git config key (user.name or user.email)
    fn get_config_value(&self, key: &str) -> Result<String, AppError> {
        debug!(key, "reading git config");
        let git_command_output: Output = self
            .command()
            .args(["config", key])
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit())
            .output()?;

        if !git_command_output.status.success() {
            debug!(key, status = %git_command_output.status, "git config value unset");
            return Err(AppError::GitNotConfigured);
        }

        Ok(String::from_utf8(git_command_output.stdout)?.trim().to_string())
    }

    /// Executes a global Git config set command
    ///
    /// # Arguments
    /// * `key` - Git config key to set (user.name or user.email)
    /// * `value` - Value to set for key (username or email)
    fn set_config_value(&self, key: &str, value: &str) -> Result<(), AppError> {
        debug!(key, value, "writing global git config");
        let status: ExitStatus = self
            .command()
            .args(["config", "--global", key, value])
            .status()?;

        if !status.success() {
            return Err(AppError::GitCommand(format!(
                "`git config --global {key}` exited with {status}"
            )));
        }

        Ok(())
    }
}

impl IdentityBackend for CredentialStore {
    fn try_get_identity(&self) -> Result<Identity, AppError> {
        let name = self.get_config_value(USER_NAME_KEY)?;
        let email = self.get_config_value(USER_EMAIL_KEY)?;
        Ok(Identity { name, email })
    }

    fn set_identity(&self, name: &str, email: &str) -> Result<(), AppError> {
        self.set_config_value(USER_NAME_KEY, name)?;
        self.set_config_value(USER_EMAIL_KEY, email)?;
        info!(name, email, "updated global git identity");
        Ok(())
    }
}
