//! Role-gated navigation contract.
//!
//! Each screen of the library front end declares the session it needs. The
//! gate only decides what to offer; the REST service still authorizes every
//! call on its own.

use crate::{gateway::GatewayError, session::Role, session::Session};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    Home,
    BookSearch,
    Login,
    Register,
    UserInfo,
    AddBook,
    UserSearch,
    MyBooks,
    MyComments,
}

/// Session requirement of a screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(Role),
}

/// Outcome of opening a screen with a given session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    Allow,
    RedirectToLogin,
    Forbidden,
}

impl Screen {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::BookSearch => "/book-search",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::UserInfo => "/user-info",
            Self::AddBook => "/add-book",
            Self::UserSearch => "/user-search",
            Self::MyBooks => "/my-books",
            Self::MyComments => "/my-comments",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::BookSearch => "Book search",
            Self::Login => "Login",
            Self::Register => "Register",
            Self::UserInfo => "User info",
            Self::AddBook => "Add book",
            Self::UserSearch => "User search",
            Self::MyBooks => "My books",
            Self::MyComments => "My comments",
        }
    }

    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::Home | Self::Login | Self::Register => Access::Public,
            Self::BookSearch | Self::UserInfo | Self::MyBooks => Access::Authenticated,
            Self::AddBook | Self::UserSearch => Access::Role(Role::Admin),
            Self::MyComments => Access::Role(Role::User),
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Decide whether `session` may open `screen`.
#[must_use]
pub fn gate(screen: Screen, session: &Session) -> Gate {
    match screen.access() {
        Access::Public => Gate::Allow,
        _ if !session.is_authenticated() => Gate::RedirectToLogin,
        Access::Authenticated => Gate::Allow,
        Access::Role(required) if session.role == Some(required) => Gate::Allow,
        Access::Role(_) => Gate::Forbidden,
    }
}

/// Screens offered on the home page for `session`.
#[must_use]
pub fn menu(session: &Session) -> Vec<Screen> {
    if !session.is_authenticated() {
        return vec![Screen::Login, Screen::Register];
    }

    let mut screens = vec![Screen::BookSearch];
    match session.role {
        Some(Role::Admin) => screens.extend([Screen::UserSearch, Screen::AddBook]),
        Some(Role::User) => screens.push(Screen::MyComments),
        None => {}
    }
    screens.extend([Screen::UserInfo, Screen::MyBooks]);
    screens
}

/// Where a caller should go after a failed call, if anywhere.
#[must_use]
pub const fn redirect_for(err: &GatewayError) -> Option<Screen> {
    match err {
        GatewayError::NoSession => Some(Screen::Login),
        GatewayError::RequestFailed(_) => None,
    }
}
