use crate::cli::actions::{Action, account, book, comment, user};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Account(args) => account::execute(args).await,
        Action::Book(args) => book::execute(args).await,
        Action::Comment(args) => comment::execute(args).await,
        Action::User(args) => user::execute(args).await,
    }
}
