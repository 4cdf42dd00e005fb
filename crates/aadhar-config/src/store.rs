// Persistent session stores
//
// Both implement `aadhar_api::SessionStore` so the session client can
// read and rotate tokens without knowing where they live.

use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use aadhar_api::{CredentialPair, Error, SessionStore, TokenKey};

fn store_error(context: &str, err: impl std::fmt::Display) -> Error {
    Error::Store {
        message: format!("{context}: {err}"),
    }
}

// ── File ────────────────────────────────────────────────────────────

/// On-disk layout of `session.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh: Option<String>,
}

impl SessionFile {
    fn slot(&mut self, key: TokenKey) -> &mut Option<String> {
        match key {
            TokenKey::Access => &mut self.access,
            TokenKey::Refresh => &mut self.refresh,
        }
    }
}

/// Tokens in a JSON file, readable only by the owner on Unix.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<SessionFile, Error> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| store_error(&format!("corrupt {}", self.path.display()), e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(SessionFile::default()),
            Err(e) => Err(store_error(&format!("read {}", self.path.display()), e)),
        }
    }

    /// Replace the file atomically: write a sibling temp file, force owner-only
    /// permissions, then rename over the old one.
    fn write(&self, file: &SessionFile) -> Result<(), Error> {
        let context = format!("write {}", self.path.display());
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| store_error(&context, e))?;

        let json = serde_json::to_vec_pretty(file).map_err(|e| store_error(&context, e))?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| store_error(&context, e))?;
        tmp.write_all(&json).map_err(|e| store_error(&context, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| store_error(&context, e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| store_error(&context, e))?;
        }
        tmp.persist(&self.path)
            .map_err(|e| store_error(&context, e.error))?;

        debug!(path = %self.path.display(), "session file written");
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut SessionFile)) -> Result<(), Error> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| store_error("session file", "lock poisoned"))?;
        let mut file = self.read()?;
        apply(&mut file);
        self.write(&file)
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: TokenKey) -> Result<Option<SecretString>, Error> {
        let mut file = self.read()?;
        Ok(file.slot(key).take().map(SecretString::from))
    }

    fn set(&self, key: TokenKey, value: SecretString) -> Result<(), Error> {
        self.update(|file| *file.slot(key) = Some(value.expose_secret().to_owned()))
    }

    fn clear(&self) -> Result<(), Error> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| store_error("session file", "lock poisoned"))?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(store_error(&format!("remove {}", self.path.display()), e)),
        }
    }

    fn set_pair(&self, pair: CredentialPair) -> Result<(), Error> {
        self.update(|file| {
            file.access = Some(pair.access.expose_secret().to_owned());
            file.refresh = Some(pair.refresh.expose_secret().to_owned());
        })
    }
}

// ── Keyring ─────────────────────────────────────────────────────────

const KEYRING_SERVICE: &str = "aadhar";

/// Tokens in the OS keyring under `aadhar` / `<profile>/<key>`.
pub struct KeyringStore {
    profile: String,
}

impl KeyringStore {
    pub fn new(profile: &str) -> Self {
        Self {
            profile: profile.to_owned(),
        }
    }

    fn entry(&self, key: TokenKey) -> Result<keyring::Entry, Error> {
        let user = format!("{}/{}", self.profile, key.as_str());
        keyring::Entry::new(KEYRING_SERVICE, &user).map_err(|e| store_error("keyring", e))
    }
}

impl SessionStore for KeyringStore {
    fn get(&self, key: TokenKey) -> Result<Option<SecretString>, Error> {
        match self.entry(key)?.get_password() {
            Ok(secret) => Ok(Some(SecretString::from(secret))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(store_error("keyring", e)),
        }
    }

    fn set(&self, key: TokenKey, value: SecretString) -> Result<(), Error> {
        self.entry(key)?
            .set_password(value.expose_secret())
            .map_err(|e| store_error("keyring", e))
    }

    fn clear(&self) -> Result<(), Error> {
        for key in [TokenKey::Access, TokenKey::Refresh] {
            match self.entry(key)?.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => {}
                Err(e) => return Err(store_error("keyring", e)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn secret(store: &FileStore, key: TokenKey) -> Option<String> {
        store
            .get(key)
            .unwrap()
            .map(|s| s.expose_secret().to_owned())
    }

    #[test]
    fn absent_file_reads_as_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        assert_eq!(secret(&store, TokenKey::Access), None);
        assert!(!store.is_authenticated().unwrap());
    }

    #[test]
    fn tokens_survive_a_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("session.json");

        FileStore::new(&path)
            .set_pair(CredentialPair {
                access: "a1".into(),
                refresh: "r1".into(),
            })
            .unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(secret(&reopened, TokenKey::Access).as_deref(), Some("a1"));
        assert_eq!(secret(&reopened, TokenKey::Refresh).as_deref(), Some("r1"));
    }

    #[test]
    fn rotating_access_keeps_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        store
            .set_pair(CredentialPair {
                access: "a1".into(),
                refresh: "r1".into(),
            })
            .unwrap();

        store.set(TokenKey::Access, "a2".into()).unwrap();
        assert_eq!(secret(&store, TokenKey::Access).as_deref(), Some("a2"));
        assert_eq!(secret(&store, TokenKey::Refresh).as_deref(), Some("r1"));
    }

    #[test]
    fn clear_removes_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        store.set(TokenKey::Refresh, "r1".into()).unwrap();
        assert!(store.path().exists());

        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let err = FileStore::new(&path).get(TokenKey::Access).unwrap_err();
        assert!(matches!(err, Error::Store { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        store.set(TokenKey::Access, "a1".into()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_tightens_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"access":"a0","refresh":"r0"}"#).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileStore::new(&path);
        store.set(TokenKey::Access, "a1".into()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(secret(&store, TokenKey::Refresh).as_deref(), Some("r0"));
    }

    #[test]
    fn write_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        store
            .set_pair(CredentialPair {
                access: "a1".into(),
                refresh: "r1".into(),
            })
            .unwrap();
        store.set(TokenKey::Access, "a2".into()).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("session.json")]);
    }
}
