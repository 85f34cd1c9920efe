use crate::{
    cli::{
        actions::report,
        globals::GlobalArgs,
        output::{self, Table, cell},
    },
    library::{BookComment, visible_comments},
};
use anyhow::Result;
use serde_json::json;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub operation: Operation,
}

#[derive(Debug)]
pub enum Operation {
    Add { rent_id: i64, text: String },
    Delete { rent_id: i64 },
    Mine { all: bool },
}

/// Execute a comment action.
/// # Errors
/// Returns an error if the session cannot be opened or the service call fails.
pub async fn execute(args: Args) -> Result<()> {
    let Args { globals, operation } = args;
    let client = globals.client()?;

    match operation {
        Operation::Add { rent_id, text } => {
            client.comment(rent_id, &text).await.map_err(report)?;
            output::status(
                globals.json,
                "Comment submitted successfully!",
                &json!({ "rentId": rent_id }),
            )
        }
        Operation::Delete { rent_id } => {
            client.delete_comment(rent_id).await.map_err(report)?;
            output::status(globals.json, "Comment deleted", &json!({ "rentId": rent_id }))
        }
        Operation::Mine { all } => {
            let comments = client.my_comments().await.map_err(report)?;
            print_comments(globals.json, &comments, all)
        }
    }
}

pub(crate) fn print_comments(json: bool, comments: &[BookComment], all: bool) -> Result<()> {
    let visible = visible_comments(comments, all);
    output::emit(json, &visible, || {
        let mut table = Table::new(&["RENT ID", "BOOK", "COMMENT"]);
        for comment in &visible {
            table.row(vec![
                cell(comment.rent_id),
                cell(comment.book_title.as_deref()),
                cell(comment.comment.as_deref()),
            ]);
        }
        table
    })
}
