use super::{Role, Session, SessionError, SessionStore};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};
use tracing::{debug, warn};

const SESSION_FILE_NAME: &str = "session.json";

/// On-disk layout: two optional string fields.
#[derive(Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

impl StoredSession {
    fn into_session(self) -> Session {
        let role = self.role.and_then(|value| match value.parse::<Role>() {
            Ok(role) => Some(role),
            Err(err) => {
                warn!("ignoring stored role: {err}");
                None
            }
        });

        Session {
            token: self.token.map(SecretString::from),
            role,
        }
    }

    fn from_session(session: &Session) -> Self {
        Self {
            token: session
                .token
                .as_ref()
                .map(|token| token.expose_secret().to_string()),
            role: session.role.map(|role| role.as_str().to_string()),
        }
    }
}

/// Session store persisted as JSON so it survives restarts.
///
/// The file is loaded once when the store is opened and rewritten on every
/// change. A write goes to a sibling temporary file first and is then renamed
/// over the old one; clearing removes the file.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    state: Mutex<Session>,
}

impl FileSessionStore {
    /// Open the store at `path`. A missing file is an empty session.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let session = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<StoredSession>(&bytes)
                .map_err(|source| SessionError::Format {
                    path: path.clone(),
                    source,
                })?
                .into_session(),
            Err(err) if err.kind() == ErrorKind::NotFound => Session::default(),
            Err(source) => return Err(SessionError::Io { path, source }),
        };

        debug!(
            path = %path.display(),
            authenticated = session.is_authenticated(),
            "session loaded"
        );

        Ok(Self {
            path,
            state: Mutex::new(session),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn persist(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let payload = serde_json::to_vec_pretty(&StoredSession::from_session(session)).map_err(
            |source| SessionError::Format {
                path: self.path.clone(),
                source,
            },
        )?;

        let tmp_path = self.path.with_extension("json.tmp");
        let mut file = open_private(&tmp_path).map_err(|err| self.io_error(err))?;
        file.write_all(&payload)
            .and_then(|()| file.sync_all())
            .map_err(|err| self.io_error(err))?;
        fs::rename(&tmp_path, &self.path).map_err(|err| self.io_error(err))?;

        Ok(())
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

impl SessionStore for FileSessionStore {
    fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    fn set_session(&self, token: SecretString, role: Option<Role>) -> Result<(), SessionError> {
        let mut state = self.lock();
        let session = Session::new(token, role);
        self.persist(&session)?;
        *state = session;
        Ok(())
    }

    fn set_role(&self, role: Role) -> Result<(), SessionError> {
        let mut state = self.lock();
        if !state.is_authenticated() {
            return Err(SessionError::NoSession);
        }
        let session = Session {
            token: state.token.clone(),
            role: Some(role),
        };
        self.persist(&session)?;
        *state = session;
        Ok(())
    }

    fn clear_session(&self) -> Result<(), SessionError> {
        let mut state = self.lock();
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(self.io_error(err)),
        }
        *state = Session::default();
        Ok(())
    }
}

/// Default location of the session file in the platform config directory.
#[must_use]
pub fn default_session_path() -> PathBuf {
    directories::ProjectDirs::from("dev", "bookdesk", "bookdesk").map_or_else(
        || PathBuf::from(".bookdesk").join(SESSION_FILE_NAME),
        |dirs| dirs.config_dir().join(SESSION_FILE_NAME),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn missing_file_is_empty_session() {
        let temp = TempDir::new().unwrap();
        let store = FileSessionStore::open(temp.path().join("session.json")).unwrap();
        assert!(store.token().is_none());
        assert!(store.role().is_none());
    }

    #[test]
    fn session_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("session.json");

        let store = FileSessionStore::open(&path).unwrap();
        store.set_session(secret("abc"), Some(Role::Admin)).unwrap();
        drop(store);

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(
            reopened.token().map(|t| t.expose_secret().to_string()),
            Some("abc".to_string())
        );
        assert_eq!(reopened.role(), Some(Role::Admin));
    }

    #[test]
    fn set_role_rewrites_only_role() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("session.json");

        let store = FileSessionStore::open(&path).unwrap();
        store.set_session(secret("abc"), None).unwrap();
        store.set_role(Role::User).unwrap();

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.role(), Some(Role::User));
        assert!(reopened.token().is_some());
    }

    #[test]
    fn clear_removes_file_and_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("session.json");

        let store = FileSessionStore::open(&path).unwrap();
        store.set_session(secret("abc"), Some(Role::User)).unwrap();
        assert!(path.exists());

        store.clear_session().unwrap();
        assert!(!path.exists());
        assert!(store.token().is_none());
        assert!(store.role().is_none());
        store.clear_session().unwrap();
    }

    #[test]
    fn unknown_role_is_dropped_on_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("session.json");
        fs::write(&path, r#"{"token":"abc","role":"LIBRARIAN"}"#).unwrap();

        let store = FileSessionStore::open(&path).unwrap();
        assert!(store.token().is_some());
        assert!(store.role().is_none());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let result = FileSessionStore::open(&path);
        assert!(matches!(result, Err(SessionError::Format { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("session.json");
        let store = FileSessionStore::open(&path).unwrap();
        store.set_session(secret("abc"), None).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn default_path_ends_with_session_file() {
        assert!(default_session_path().ends_with(SESSION_FILE_NAME));
    }
}
