use std::{ffi::OsString, path::PathBuf};

use clap::{ArgAction, Parser, Subcommand};

use crate::storage::PROFILES_FILE;

/// CLI arguments parser using `clap`
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Profiles file to read and write
    #[arg(long, global = true, value_name = "PATH", default_value = PROFILES_FILE, conflicts_with = "home")]
    pub file: PathBuf,

    /// Keep the profiles file in the home directory
    #[arg(long, global = true)]
    pub home: bool,

    /// Git executable used to read and write the identity
    #[arg(long, global = true, value_name = "PROGRAM", default_value = "git")]
    pub git: OsString,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand chosen to execute; the interactive menu runs when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Displays the current global Git identity
    Current,
    /// Sets the global Git identity
    Set {
        /// Git username (user.name)
        name: String,
        /// Git email (user.email)
        email: String,
    },
    /// Displays all saved profiles
    List,
    /// Displays one saved profile
    Show {
        /// Name of the profile
        profile: String,
    },
    /// Saves a profile, defaulting to the current Git identity
    Save {
        /// Name of the profile; an existing profile is replaced
        profile: String,
        /// Git username to store instead of the current one
        #[arg(long)]
        name: Option<String>,
        /// Git email to store instead of the current one
        #[arg(long)]
        email: Option<String>,
    },
    /// Switches the global Git identity to a saved profile
    Use {
        /// Name of the profile to switch to
        profile: String,
    },
    /// Deletes a saved profile
    Delete {
        /// Name of the profile to delete
        profile: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
