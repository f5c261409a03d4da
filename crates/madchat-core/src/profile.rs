//! User profile persistence: login, logout and lookup.

use tracing::{info, warn};

use madchat_types::error::{PersistenceError, SessionError, ValidationError};
use madchat_types::profile::UserProfile;

use crate::storage::persisted::{PROFILE_KEY, PersistedStore, load_json, save_json};

/// Stores the single logged-in [`UserProfile`] under [`PROFILE_KEY`].
pub struct ProfileStore<S: PersistedStore> {
    store: S,
}

impl<S: PersistedStore> ProfileStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create and persist a profile, replacing any existing one.
    ///
    /// The name is required; blank optional fields are stored as absent.
    pub fn login(
        &self,
        name: &str,
        gender: Option<&str>,
        age: Option<u32>,
    ) -> Result<UserProfile, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let profile = UserProfile {
            name: name.to_string(),
            gender: gender
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string),
            age,
        };
        save_json(&self.store, PROFILE_KEY, &profile)?;
        info!(name = %profile.name, "User logged in");
        Ok(profile)
    }

    /// The logged-in profile, if any.
    ///
    /// An unreadable profile is discarded with a diagnostic and treated as
    /// logged out.
    pub fn current(&self) -> Option<UserProfile> {
        match load_json(&self.store, PROFILE_KEY) {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable user profile");
                None
            }
        }
    }

    /// Forget the logged-in profile.
    pub fn logout(&self) -> Result<(), PersistenceError> {
        self.store.remove(PROFILE_KEY)?;
        info!("User logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_login_persists_profile() {
        let profiles = ProfileStore::new(MemoryStore::new());
        let profile = profiles.login("  Sam ", Some("  "), Some(28)).unwrap();
        assert_eq!(profile.name, "Sam");
        assert_eq!(profile.gender, None);
        assert_eq!(profiles.current(), Some(profile));
    }

    #[test]
    fn test_login_rejects_empty_name() {
        let profiles = ProfileStore::new(MemoryStore::new());
        let err = profiles.login("   ", None, None).unwrap_err();
        assert!(matches!(err, SessionError::Validation(ValidationError::EmptyName)));
        assert!(profiles.current().is_none());
    }

    #[test]
    fn test_relogin_replaces_profile() {
        let profiles = ProfileStore::new(MemoryStore::new());
        profiles.login("First", None, None).unwrap();
        profiles.login("Second", Some("m"), None).unwrap();
        assert_eq!(profiles.current().unwrap().name, "Second");
    }

    #[test]
    fn test_logout_clears_profile() {
        let profiles = ProfileStore::new(MemoryStore::new());
        profiles.login("Sam", None, None).unwrap();
        profiles.logout().unwrap();
        assert!(profiles.current().is_none());
    }

    #[test]
    fn test_corrupt_profile_is_discarded() {
        let backing = MemoryStore::new();
        backing.set(PROFILE_KEY, "not json").unwrap();
        let profiles = ProfileStore::new(backing);
        assert!(profiles.current().is_none());
    }
}
