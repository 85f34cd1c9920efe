pub mod account;
pub mod book;
pub mod comment;
pub mod user;

// Internal "interpreter" for `Action`.
mod run;

use crate::library::LibraryError;

#[derive(Debug)]
pub enum Action {
    Account(account::Args),
    Book(book::Args),
    Comment(comment::Args),
    User(user::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

/// Turn a library failure into the message shown to the user.
pub(crate) fn report(err: LibraryError) -> anyhow::Error {
    if err.needs_login() {
        anyhow::anyhow!("Please log in first (run `bookdesk login`)")
    } else {
        anyhow::Error::new(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;

    #[test]
    fn no_session_asks_for_login() {
        let err = report(GatewayError::NoSession.into());
        assert_eq!(
            err.to_string(),
            "Please log in first (run `bookdesk login`)"
        );
    }

    #[test]
    fn server_message_is_kept() {
        let err = report(GatewayError::RequestFailed("Book not found".to_string()).into());
        assert_eq!(err.to_string(), "Book not found");
    }
}
