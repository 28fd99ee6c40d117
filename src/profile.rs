use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Git identity: the values of user.name and user.email
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Git username (user.name)
    pub name: String,
    /// Git email address (user.email)
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// All saved profiles, keyed by profile name.
///
/// Serialized as a plain JSON object so files written by older versions
/// of the tool load unchanged. Keys are kept sorted, which makes the
/// written file stable across load/save cycles.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ProfileCollection {
    profiles: BTreeMap<String, Identity>,
}

impl ProfileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, profile_name: &str) -> Option<&Identity> {
        self.profiles.get(profile_name)
    }

    /// Stores `identity` under `profile_name`, returning the identity it replaced
    pub fn insert(&mut self, profile_name: impl Into<String>, identity: Identity) -> Option<Identity> {
        self.profiles.insert(profile_name.into(), identity)
    }

    /// Removes a profile. A name that is not present is left alone and yields `None`.
    pub fn remove(&mut self, profile_name: &str) -> Option<Identity> {
        self.profiles.remove(profile_name)
    }

    pub fn contains(&self, profile_name: &str) -> bool {
        self.profiles.contains_key(profile_name)
    }

    /// Profile names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Identity)> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
