use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use keyring::Entry;
use tempfile::NamedTempFile;

use crate::api::models::Identity;

const KEYRING_SERVICE: &str = "fraga";
const KEYRING_USER: &str = "api-token";
const IDENTITY_FILE: &str = "session.json";

/// Persistence seam for the bearer token and the identity it belongs to.
///
/// The session holder is the only writer. Splitting this behind a trait
/// keeps [`crate::session::SessionManager`] testable without a real
/// keyring or filesystem.
pub trait CredentialStore {
    fn store_token(&self, token: &str) -> Result<(), Box<dyn Error>>;
    fn get_token(&self) -> Result<Option<String>, Box<dyn Error>>;
    fn clear_token(&self) -> Result<(), Box<dyn Error>>;
    fn store_identity(&self, identity: &Identity) -> Result<(), Box<dyn Error>>;
    fn get_identity(&self) -> Result<Option<Identity>, Box<dyn Error>>;
    fn clear_identity(&self) -> Result<(), Box<dyn Error>>;
}

/// Token in the system keyring, identity as JSON next to the config file.
pub struct KeyringStore {
    identity_path: PathBuf,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            identity_path: crate::core::config::Config::state_dir().join(IDENTITY_FILE),
        }
    }

    fn entry() -> Result<Entry, Box<dyn Error>> {
        Ok(Entry::new(KEYRING_SERVICE, KEYRING_USER)?)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn store_token(&self, token: &str) -> Result<(), Box<dyn Error>> {
        Self::entry()?.set_password(token)?;
        Ok(())
    }

    fn get_token(&self) -> Result<Option<String>, Box<dyn Error>> {
        match Self::entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    fn clear_token(&self) -> Result<(), Box<dyn Error>> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(Box::new(e)),
        }
    }

    fn store_identity(&self, identity: &Identity) -> Result<(), Box<dyn Error>> {
        let parent = self
            .identity_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir)?;
        }

        let contents = serde_json::to_string_pretty(identity)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };
        temp_file.write_all(contents.as_bytes())?;
        temp_file.as_file_mut().sync_all()?;
        temp_file
            .persist(&self.identity_path)
            .map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
        Ok(())
    }

    fn get_identity(&self) -> Result<Option<Identity>, Box<dyn Error>> {
        if !self.identity_path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.identity_path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn clear_identity(&self) -> Result<(), Box<dyn Error>> {
        match fs::remove_file(&self.identity_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Box::new(e)),
        }
    }
}

/// In-memory store for tests and for running against throwaway backends.
#[derive(Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
    identity: Mutex<Option<Identity>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn store_token(&self, token: &str) -> Result<(), Box<dyn Error>> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn get_token(&self) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn clear_token(&self) -> Result<(), Box<dyn Error>> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }

    fn store_identity(&self, identity: &Identity) -> Result<(), Box<dyn Error>> {
        *self.identity.lock().unwrap() = Some(identity.clone());
        Ok(())
    }

    fn get_identity(&self) -> Result<Option<Identity>, Box<dyn Error>> {
        Ok(self.identity.lock().unwrap().clone())
    }

    fn clear_identity(&self) -> Result<(), Box<dyn Error>> {
        *self.identity.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_identity() -> Identity {
        Identity {
            id: 1,
            email: "anna@example.com".to_string(),
            name: "Anna".to_string(),
            plan: Some("start".to_string()),
            created_at: None,
        }
    }

    #[test]
    fn memory_store_round_trips_token_and_identity() {
        let store = MemoryStore::new();
        assert!(store.get_token().unwrap().is_none());
        assert!(store.get_identity().unwrap().is_none());

        store.store_token("tok-1").unwrap();
        store.store_identity(&test_identity()).unwrap();
        assert_eq!(store.get_token().unwrap().as_deref(), Some("tok-1"));
        assert_eq!(
            store.get_identity().unwrap().map(|i| i.email),
            Some("anna@example.com".to_string())
        );

        store.clear_token().unwrap();
        store.clear_identity().unwrap();
        assert!(store.get_token().unwrap().is_none());
        assert!(store.get_identity().unwrap().is_none());
    }

    #[test]
    fn keyring_store_identity_file_round_trips() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = KeyringStore {
            identity_path: dir.path().join("nested").join("session.json"),
        };

        assert!(store.get_identity().unwrap().is_none());
        store.store_identity(&test_identity()).unwrap();
        let loaded = store.get_identity().unwrap().expect("identity present");
        assert_eq!(loaded.id, 1);
        assert_eq!(loaded.name, "Anna");

        store.clear_identity().unwrap();
        assert!(store.get_identity().unwrap().is_none());
        // Clearing twice is not an error.
        store.clear_identity().unwrap();
    }
}
