// Session credential storage
//
// The access/refresh pair lives behind an injectable store so the session
// client never touches process-global state. Persistent backends (file,
// OS keyring) live in `aadhar-config`; the in-memory store here serves
// tests and embedders.

use std::collections::HashMap;
use std::sync::RwLock;

use secrecy::SecretString;

use crate::error::Error;

/// The two credential slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    /// Short-lived token sent with every authenticated request.
    Access,
    /// Longer-lived token used only to mint a new access token.
    Refresh,
}

impl TokenKey {
    /// Fixed storage name of this slot.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

/// An access + refresh token pair, as issued by `/login`.
#[derive(Debug, Clone)]
pub struct CredentialPair {
    pub access: SecretString,
    pub refresh: SecretString,
}

/// Key-value storage for session credentials.
///
/// A session is authenticated when both keys are present and logged out
/// when both are absent. Implementations should make [`set_pair`] and
/// [`clear`] write both keys as a unit.
///
/// [`set_pair`]: SessionStore::set_pair
/// [`clear`]: SessionStore::clear
pub trait SessionStore: Send + Sync {
    fn get(&self, key: TokenKey) -> Result<Option<SecretString>, Error>;

    fn set(&self, key: TokenKey, value: SecretString) -> Result<(), Error>;

    /// Remove both credentials.
    fn clear(&self) -> Result<(), Error>;

    fn set_pair(&self, pair: CredentialPair) -> Result<(), Error> {
        self.set(TokenKey::Access, pair.access)?;
        self.set(TokenKey::Refresh, pair.refresh)
    }

    /// Both credentials present.
    fn is_authenticated(&self) -> Result<bool, Error> {
        Ok(self.get(TokenKey::Access)?.is_some() && self.get(TokenKey::Refresh)?.is_some())
    }
}

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tokens: RwLock<HashMap<TokenKey, SecretString>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding a session.
    pub fn with_pair(access: &str, refresh: &str) -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(TokenKey::Access, SecretString::from(access));
        tokens.insert(TokenKey::Refresh, SecretString::from(refresh));
        Self {
            tokens: RwLock::new(tokens),
        }
    }
}

fn poisoned() -> Error {
    Error::Store {
        message: "memory store lock poisoned".into(),
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: TokenKey) -> Result<Option<SecretString>, Error> {
        let guard = self.tokens.read().map_err(|_| poisoned())?;
        Ok(guard.get(&key).cloned())
    }

    fn set(&self, key: TokenKey, value: SecretString) -> Result<(), Error> {
        self.tokens
            .write()
            .map_err(|_| poisoned())?
            .insert(key, value);
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        self.tokens.write().map_err(|_| poisoned())?.clear();
        Ok(())
    }

    fn set_pair(&self, pair: CredentialPair) -> Result<(), Error> {
        let mut guard = self.tokens.write().map_err(|_| poisoned())?;
        guard.insert(TokenKey::Access, pair.access);
        guard.insert(TokenKey::Refresh, pair.refresh);
        Ok(())
    }
}
