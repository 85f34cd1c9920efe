//! Typed operations of the library front end, one per user action.
//!
//! Every call goes through the shared [`Gateway`]. Role checks here only
//! decide whether an action is offered; the service authorizes each call.

mod auth;
mod books;
mod comments;
mod types;
mod users;

pub use books::sort_books;
pub use comments::visible_comments;
pub use types::{
    Book, BookComment, BookCriteria, CommentRequest, NewBook, ProfileUpdate, Registration,
    RentRequest, RentedBook, SortDirection, SortKey, UserCriteria, UserProfile, UserSummary,
};

use crate::{
    gateway::{Gateway, GatewayError},
    navigation::{self, Access, Gate, Screen},
    session::{Role, Session, SessionError},
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("{0}")]
    Validation(String),
    #[error("{screen} requires the {required} role")]
    Forbidden { screen: Screen, required: Role },
    #[error("Book {book_id} was added, but its cover was not uploaded: {source}")]
    CoverNotUploaded { book_id: i64, source: GatewayError },
}

impl LibraryError {
    /// True when the caller should send the user to the login screen.
    #[must_use]
    pub fn needs_login(&self) -> bool {
        match self {
            Self::Gateway(err) => navigation::redirect_for(err) == Some(Screen::Login),
            Self::Session(SessionError::NoSession) => true,
            _ => false,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[derive(Clone, Debug)]
pub struct LibraryClient {
    gateway: Gateway,
}

impl LibraryClient {
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.gateway.session().snapshot()
    }

    /// Gate `screen` for the current session. A role screen opened with an
    /// unknown role triggers one role refresh first, as the home page does.
    ///
    /// # Errors
    /// [`GatewayError::NoSession`] when logged out, [`LibraryError::Forbidden`]
    /// when the role does not match.
    pub async fn require(&self, screen: Screen) -> Result<(), LibraryError> {
        let mut session = self.session();

        if let Access::Role(_) = screen.access()
            && session.is_authenticated()
            && session.role.is_none()
        {
            debug!(%screen, "role unknown, refreshing");
            if let Err(err) = self.refresh_role().await {
                debug!("role refresh failed: {err}");
            }
            session = self.session();
        }

        match navigation::gate(screen, &session) {
            Gate::Allow => Ok(()),
            Gate::RedirectToLogin => Err(GatewayError::NoSession.into()),
            Gate::Forbidden => Err(forbidden(screen)),
        }
    }
}

fn forbidden(screen: Screen) -> LibraryError {
    match screen.access() {
        Access::Role(required) => LibraryError::Forbidden { screen, required },
        Access::Public | Access::Authenticated => LibraryError::Forbidden {
            screen,
            required: Role::User,
        },
    }
}
