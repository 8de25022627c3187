//! Session credential lookup
//!
//! The upload session authenticates with a username and password that the
//! host application keeps in its credential store. The username is looked up
//! under a list of identity keys in priority order (the current identity key
//! first, legacy keys after it); the password under a single key.
//!
//! The default store is the platform keyring via `keyring-core`. The host
//! application must install a keyring store before use:
//!
//! ```ignore
//! keyring_core::set_default_store(AppleStore::new());
//! ```

use keyring_core::{Entry, Error as KeyringError};

use crate::pack::types::PackError;
use crate::secret::Secret;

/// Username and password for one upload session
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account identifier
    pub username: String,
    /// Session password
    pub password: Secret<String>,
}

/// Read access to the host's credential store
pub trait CredentialStore: Send + Sync {
    /// Value stored under `key`, or `None` if there is no entry
    fn get(&self, key: &str) -> Result<Option<String>, PackError>;
}

/// [`CredentialStore`] backed by the platform keyring
#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    service_id: String,
}

impl KeyringCredentialStore {
    /// Create a store reading entries of `service_id`
    pub fn new<S>(service_id: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            service_id: service_id.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, PackError> {
        Entry::new(&self.service_id, key).map_err(|e| PackError::CredentialStore {
            reason: format!(
                "Failed to create keyring entry for service='{}', key='{}': {}",
                self.service_id, key, e
            ),
        })
    }

    /// Store `value` under `key`
    pub fn set(&self, key: &str, value: &str) -> Result<(), PackError> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| keyring_error("store", e))
    }

    /// Remove the entry under `key`; succeeds if there is none
    pub fn delete(&self, key: &str) -> Result<(), PackError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(KeyringError::NoEntry) => Ok(()),
            Err(e) => Err(keyring_error("delete", e)),
        }
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, PackError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(KeyringError::NoEntry) => Ok(None),
            Err(e) => Err(keyring_error("read", e)),
        }
    }
}

fn keyring_error(action: &str, err: KeyringError) -> PackError {
    let reason = match err {
        KeyringError::NoStorageAccess(err) => format!("Keyring not initialized: {}", err),
        other => format!("Failed to {} keyring entry: {}", action, other),
    };
    PackError::CredentialStore { reason }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Resolve the session credentials
///
/// The first identity key with a non-empty value wins. Missing values are an
/// `Authentication` error; a failing store is a `CredentialStore` error.
pub fn resolve_credentials(
    store: &dyn CredentialStore,
    identity_keys: &[String],
    password_key: &str,
) -> Result<Credentials, PackError> {
    let mut username = None;
    for key in identity_keys {
        if let Some(value) = non_empty(store.get(key)?) {
            tracing::debug!(
                target: "sticker_core::pack::credentials",
                key = key.as_str(),
                "Resolved username"
            );
            username = Some(value);
            break;
        }
    }

    let username = username.ok_or_else(|| PackError::Authentication {
        reason: format!("No username stored under any of {:?}", identity_keys),
    })?;

    let password =
        non_empty(store.get(password_key)?).ok_or_else(|| PackError::Authentication {
            reason: format!("No password stored under '{}'", password_key),
        })?;

    Ok(Credentials {
        username,
        password: Secret::new(password),
    })
}
