//! # Bookdesk (Library Management Client)
//!
//! `bookdesk` is the client side of a library management service. Users search,
//! rent, return and comment on books; administrators manage stock and accounts.
//! Every business rule lives in the remote REST service, so this crate only
//! keeps a session, issues authenticated calls and renders the results.
//!
//! ## Session & Gateway
//!
//! The [`session::SessionStore`] holds an opaque bearer token and the `USER` /
//! `ADMIN` role. It is written at login, read by every authenticated call and
//! cleared at logout. The [`gateway::Gateway`] receives the store at
//! construction time and:
//!
//! 1. **Fails fast** with [`gateway::GatewayError::NoSession`] when no token is
//!    stored, without touching the network.
//! 2. **Injects** `Authorization: Bearer <token>` and `Content-Type: application/json`.
//!    Caller headers can never replace the `Authorization` header.
//! 3. **Normalizes** every response into either the decoded JSON body or
//!    [`gateway::GatewayError::RequestFailed`] carrying the server `message`.
//!
//! ## Navigation
//!
//! [`navigation`] maps each screen of the library front end to the session it
//! needs. The gate is a UX aid only; the REST service enforces authorization.
//!
//! ## Library operations
//!
//! [`library::LibraryClient`] wraps the gateway with one typed call per user
//! action (search, rent, return, comment, user lookup). The `bookdesk` binary
//! in [`cli`] exposes each of them as a subcommand.

pub mod cli;
pub mod gateway;
pub mod library;
pub mod navigation;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
