use crate::{
    cli::{
        actions::{book::rentals_table, comment::print_comments, report},
        globals::GlobalArgs,
        output::{self, Table, cell},
    },
    library::{UserCriteria, UserSummary},
};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub operation: Operation,
}

#[derive(Debug)]
pub enum Operation {
    Search(UserCriteria),
    Books { user_id: i64 },
    Comments { user_id: i64, all: bool },
}

/// Execute a user lookup action.
/// # Errors
/// Returns an error if the session cannot be opened or the service call fails.
pub async fn execute(args: Args) -> Result<()> {
    let Args { globals, operation } = args;
    let client = globals.client()?;

    match operation {
        Operation::Search(criteria) => {
            let users = client.search_users(criteria).await.map_err(report)?;
            output::emit(globals.json, &users, || users_table(&users))
        }
        Operation::Books { user_id } => {
            let rentals = client.user_books(user_id).await.map_err(report)?;
            output::emit(globals.json, &rentals, || rentals_table(&rentals))
        }
        Operation::Comments { user_id, all } => {
            let comments = client.user_comments(user_id).await.map_err(report)?;
            print_comments(globals.json, &comments, all)
        }
    }
}

fn users_table(users: &[UserSummary]) -> Table {
    let mut table = Table::new(&[
        "ID",
        "FIRST NAME",
        "SECOND NAME",
        "THIRD NAME",
        "EMAIL",
        "ADDRESS",
    ]);
    for user in users {
        table.row(vec![
            cell(user.lookup_id()),
            cell(user.first_name.as_deref()),
            cell(user.second_name.as_deref()),
            cell(user.third_name.as_deref()),
            cell(user.email.as_deref()),
            cell(user.main_address.as_deref()),
        ]);
    }
    table
}
