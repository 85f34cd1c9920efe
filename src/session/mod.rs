//! Session/token store shared by every authenticated operation.
//!
//! The store is the single source of truth for "is a user signed in, and with
//! which role". Login writes both fields, a role refresh rewrites the role, and
//! logout clears everything in one transition. Tokens are opaque; nothing here
//! inspects or validates their shape, and they must never be logged.

mod file;
mod memory;

pub use file::{FileSessionStore, default_session_path};
pub use memory::MemorySessionStore;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};
use thiserror::Error;

/// Coarse authorization tag controlling which screens are offered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Authenticated identity held by the client.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub token: Option<SecretString>,
    pub role: Option<Role>,
}

impl Session {
    #[must_use]
    pub fn new(token: SecretString, role: Option<Role>) -> Self {
        Self {
            token: Some(token),
            role,
        }
    }

    /// An empty token counts as no token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|token| !token.expose_secret().is_empty())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no active session")]
    NoSession,
    #[error("session file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {} is not valid JSON: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persisted session state. Reads are synchronous and never fail; writes
/// replace the whole record so observers never see a half-updated session.
pub trait SessionStore: Send + Sync {
    /// Current token and role.
    fn snapshot(&self) -> Session;

    /// Store a new session, overwriting any previous one.
    ///
    /// # Errors
    /// Returns an error if the session cannot be persisted.
    fn set_session(&self, token: SecretString, role: Option<Role>) -> Result<(), SessionError>;

    /// Replace the role of the current session.
    ///
    /// # Errors
    /// Returns [`SessionError::NoSession`] when no token is stored, or an error
    /// if the session cannot be persisted.
    fn set_role(&self, role: Role) -> Result<(), SessionError>;

    /// Remove token and role. Clearing an empty store succeeds.
    ///
    /// # Errors
    /// Returns an error if persisted state cannot be removed.
    fn clear_session(&self) -> Result<(), SessionError>;

    fn token(&self) -> Option<SecretString> {
        let session = self.snapshot();
        if session.is_authenticated() {
            session.token
        } else {
            None
        }
    }

    fn role(&self) -> Option<Role> {
        self.snapshot().role
    }
}
