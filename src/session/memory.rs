use super::{Role, Session, SessionError, SessionStore};
use secrecy::SecretString;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Process-local session store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    state: Mutex<Session>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session(token: &str, role: Option<Role>) -> Self {
        Self {
            state: Mutex::new(Session::new(SecretString::from(token.to_string()), role)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    fn set_session(&self, token: SecretString, role: Option<Role>) -> Result<(), SessionError> {
        *self.lock() = Session::new(token, role);
        Ok(())
    }

    fn set_role(&self, role: Role) -> Result<(), SessionError> {
        let mut state = self.lock();
        if !state.is_authenticated() {
            return Err(SessionError::NoSession);
        }
        state.role = Some(role);
        Ok(())
    }

    fn clear_session(&self) -> Result<(), SessionError> {
        *self.lock() = Session::default();
        Ok(())
    }
}
