use std::fmt;

use tracing::{debug, warn};

use crate::{
    error::AppError,
    git::IdentityBackend,
    profile::{Identity, ProfileCollection},
    storage::ProfileStore,
    validation::validate_profile_name,
};

/// Outcome of the last user action, shown on the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

impl Status {
    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Info(msg) | Status::Error(msg) => f.write_str(msg),
        }
    }
}

/// Front-end state: the editable identity form, the selected profile and
/// the profiles loaded at startup.
///
/// Every mutation of the collection is written straight back to the store.
pub struct Session<B: IdentityBackend> {
    backend: B,
    store: ProfileStore,
    profiles: ProfileCollection,
    form: Identity,
    selection: Option<String>,
    status: Option<Status>,
}

impl<B: IdentityBackend> Session<B> {
    /// Loads the profiles and fills the form from the current identity
    pub fn open(backend: B, store: ProfileStore) -> Result<Self, AppError> {
        let profiles = store.load()?;
        let mut session = Self {
            backend,
            store,
            profiles,
            form: Identity::default(),
            selection: None,
            status: None,
        };
        session.refresh();
        Ok(session)
    }

    pub fn form(&self) -> &Identity {
        &self.form
    }

    pub fn set_form(&mut self, identity: Identity) {
        self.form = identity;
    }

    pub fn profiles(&self) -> &ProfileCollection {
        &self.profiles
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Re-reads the current identity into the form
    pub fn refresh(&mut self) {
        match self.backend.try_get_identity() {
            Ok(identity) => {
                self.form = identity;
                self.status = Some(Status::Info("display refreshed".to_string()));
            }
            Err(err) => {
                warn!(error = %err, "could not read git identity");
                self.form = Identity::default();
                self.status = Some(Status::Error("git not configured".to_string()));
            }
        }
    }

    /// Writes the form as the global identity. Returns whether git accepted it.
    pub fn save_credentials(&mut self) -> bool {
        match self.backend.set_identity(&self.form.name, &self.form.email) {
            Ok(()) => {
                self.status = Some(Status::Info("credentials updated".to_string()));
                true
            }
            Err(err) => {
                warn!(error = %err, "could not write git identity");
                self.status = Some(Status::Error("failed to update credentials".to_string()));
                false
            }
        }
    }

    /// Selects a profile and copies it into the form
    pub fn select(&mut self, profile_name: &str) -> Result<(), AppError> {
        let identity = self
            .profiles
            .get(profile_name)
            .ok_or_else(|| AppError::ProfileNotFound(profile_name.to_string()))?;
        self.form = identity.clone();
        self.selection = Some(profile_name.to_string());
        self.status = Some(Status::Info(format!("selected profile '{profile_name}'")));
        Ok(())
    }

    /// Copies the selected profile into the form, if there is one
    pub fn load_selected(&mut self) {
        let Some(profile_name) = self.selection.as_deref() else {
            debug!("no profile selected");
            self.status = Some(Status::Error("no profile selected".to_string()));
            return;
        };
        if let Some(identity) = self.profiles.get(profile_name) {
            self.form = identity.clone();
            self.status = Some(Status::Info(format!("loaded profile '{profile_name}'")));
        }
    }

    /// Selects a profile and makes it the global identity
    pub fn use_profile(&mut self, profile_name: &str) -> Result<bool, AppError> {
        self.select(profile_name)?;
        let updated = self.save_credentials();
        if updated {
            self.status = Some(Status::Info(format!("switched to profile '{profile_name}'")));
        }
        Ok(updated)
    }

    /// Stores the form under `profile_name`, replacing any profile of that name
    pub fn save_profile(&mut self, profile_name: &str) -> Result<(), AppError> {
        validate_profile_name(profile_name)?;
        self.profiles.insert(profile_name, self.form.clone());
        self.store.save(&self.profiles)?;
        self.status = Some(Status::Info(format!("saved profile '{profile_name}'")));
        Ok(())
    }

    /// Deletes a profile. Unknown names are rejected and nothing is written.
    pub fn delete_profile(&mut self, profile_name: &str) -> Result<(), AppError> {
        if self.profiles.remove(profile_name).is_none() {
            return Err(AppError::ProfileNotFound(profile_name.to_string()));
        }
        self.store.save(&self.profiles)?;
        if self.selection.as_deref() == Some(profile_name) {
            self.selection = None;
        }
        self.status = Some(Status::Info(format!("deleted profile '{profile_name}'")));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, fs};

    use tempfile::{TempDir, tempdir};

    use super::*;
    use crate::storage::PROFILES_FILE;

    /// In-memory identity; `None` means unset
    #[derive(Default)]
    struct MemoryBackend {
        identity: RefCell<Option<Identity>>,
        reject_writes: bool,
    }

    impl MemoryBackend {
        fn with_identity(name: &str, email: &str) -> Self {
            Self {
                identity: RefCell::new(Some(Identity::new(name, email))),
                reject_writes: false,
            }
        }
    }

    impl IdentityBackend for &MemoryBackend {
        fn try_get_identity(&self) -> Result<Identity, AppError> {
            self.identity.borrow().clone().ok_or(AppError::GitNotConfigured)
        }

        fn set_identity(&self, name: &str, email: &str) -> Result<(), AppError> {
            if self.reject_writes {
                return Err(AppError::GitCommand("rejected".to_string()));
            }
            *self.identity.borrow_mut() = Some(Identity::new(name, email));
            Ok(())
        }
    }

    fn scratch_store() -> (TempDir, ProfileStore) {
        let dir = tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join(PROFILES_FILE));
        (dir, store)
    }

    #[test]
    fn open_fills_form_from_git() {
        let backend = MemoryBackend::with_identity("Jane", "jane@x.com");
        let (_dir, store) = scratch_store();

        let session = Session::open(&backend, store).unwrap();
        assert_eq!(session.form(), &Identity::new("Jane", "jane@x.com"));
        assert_eq!(session.status(), Some(&Status::Info("display refreshed".to_string())));
        assert!(session.profiles().is_empty());
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn unconfigured_git_clears_form_with_error_status() {
        let backend = MemoryBackend::default();
        let (_dir, store) = scratch_store();

        let mut session = Session::open(&backend, store).unwrap();
        session.set_form(Identity::new("stale", "stale@x.com"));
        session.refresh();

        assert_eq!(session.form(), &Identity::default());
        assert!(session.status().unwrap().is_error());
    }

    #[test]
    fn open_propagates_malformed_profiles_file() {
        let backend = MemoryBackend::default();
        let (_dir, store) = scratch_store();
        fs::write(store.path(), "not json").unwrap();

        assert!(matches!(Session::open(&backend, store), Err(AppError::SerdeJson(_))));
    }

    #[test]
    fn save_credentials_writes_form() {
        let backend = MemoryBackend::default();
        let (_dir, store) = scratch_store();

        let mut session = Session::open(&backend, store).unwrap();
        session.set_form(Identity::new("a", "b"));
        assert!(session.save_credentials());

        session.refresh();
        assert_eq!(session.form(), &Identity::new("a", "b"));
    }

    #[test]
    fn rejected_write_is_reported_not_fatal() {
        let backend = MemoryBackend {
            identity: RefCell::new(Some(Identity::new("Jane", "jane@x.com"))),
            reject_writes: true,
        };
        let (_dir, store) = scratch_store();

        let mut session = Session::open(&backend, store).unwrap();
        session.set_form(Identity::new("a", "b"));
        assert!(!session.save_credentials());
        assert_eq!(
            session.status(),
            Some(&Status::Error("failed to update credentials".to_string()))
        );
        assert_eq!((&backend).get_identity(), Identity::new("Jane", "jane@x.com"));
    }

    #[test]
    fn saved_profile_reloads_in_fresh_session() {
        let backend = MemoryBackend::with_identity("Jane", "jane@x.com");
        let (dir, store) = scratch_store();

        let mut session = Session::open(&backend, store).unwrap();
        session.save_profile("work").unwrap();
        drop(session);

        let other = MemoryBackend::with_identity("someone", "else@y.org");
        let mut fresh = Session::open(&other, ProfileStore::new(dir.path().join(PROFILES_FILE))).unwrap();
        fresh.select("work").unwrap();
        fresh.load_selected();
        assert_eq!(fresh.form(), &Identity::new("Jane", "jane@x.com"));
    }

    #[test]
    fn save_profile_overwrites_existing_name() {
        let backend = MemoryBackend::with_identity("Jane", "jane@x.com");
        let (_dir, store) = scratch_store();

        let mut session = Session::open(&backend, store).unwrap();
        session.save_profile("work").unwrap();
        session.set_form(Identity::new("Jane Doe", "jd@corp.com"));
        session.save_profile("work").unwrap();

        let on_disk = session.store().load().unwrap();
        assert_eq!(on_disk.len(), 1);
        assert_eq!(on_disk.get("work"), Some(&Identity::new("Jane Doe", "jd@corp.com")));
    }

    #[test]
    fn save_profile_rejects_blank_name() {
        let backend = MemoryBackend::default();
        let (_dir, store) = scratch_store();

        let mut session = Session::open(&backend, store).unwrap();
        assert!(matches!(session.save_profile(" "), Err(AppError::Validation(_))));
        assert!(!session.store().path().exists());
    }

    #[test]
    fn select_unknown_profile_is_rejected() {
        let backend = MemoryBackend::default();
        let (_dir, store) = scratch_store();

        let mut session = Session::open(&backend, store).unwrap();
        assert!(matches!(session.select("work"), Err(AppError::ProfileNotFound(_))));
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn load_without_selection_keeps_form() {
        let backend = MemoryBackend::with_identity("Jane", "jane@x.com");
        let (_dir, store) = scratch_store();

        let mut session = Session::open(&backend, store).unwrap();
        session.load_selected();
        assert_eq!(session.form(), &Identity::new("Jane", "jane@x.com"));
        assert_eq!(session.status(), Some(&Status::Error("no profile selected".to_string())));
    }

    #[test]
    fn use_profile_switches_identity() {
        let backend = MemoryBackend::with_identity("Jane", "jane@x.com");
        let (_dir, store) = scratch_store();

        let mut session = Session::open(&backend, store).unwrap();
        session.set_form(Identity::new("jane", "jane@home.org"));
        session.save_profile("home").unwrap();
        session.refresh();

        assert!(session.use_profile("home").unwrap());
        assert_eq!((&backend).get_identity(), Identity::new("jane", "jane@home.org"));
        assert_eq!(session.selection(), Some("home"));
    }

    #[test]
    fn delete_missing_profile_leaves_file_untouched() {
        let backend = MemoryBackend::with_identity("Jane", "jane@x.com");
        let (_dir, store) = scratch_store();

        let mut session = Session::open(&backend, store).unwrap();
        session.save_profile("work").unwrap();
        let before = fs::read(session.store().path()).unwrap();

        assert!(matches!(session.delete_profile("home"), Err(AppError::ProfileNotFound(_))));
        assert_eq!(fs::read(session.store().path()).unwrap(), before);
    }

    #[test]
    fn delete_selected_profile_clears_selection() {
        let backend = MemoryBackend::with_identity("Jane", "jane@x.com");
        let (_dir, store) = scratch_store();

        let mut session = Session::open(&backend, store).unwrap();
        session.save_profile("work").unwrap();
        session.select("work").unwrap();
        session.delete_profile("work").unwrap();

        assert_eq!(session.selection(), None);
        assert!(session.store().load().unwrap().is_empty());
    }
}
