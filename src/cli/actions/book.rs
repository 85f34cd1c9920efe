use crate::{
    cli::{
        actions::report,
        globals::GlobalArgs,
        output::{self, Table, cell},
    },
    library::{Book, BookCriteria, NewBook, RentedBook, SortDirection, SortKey, sort_books},
};
use anyhow::{Result, anyhow};
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub operation: Operation,
}

#[derive(Debug)]
pub enum Operation {
    Search {
        criteria: BookCriteria,
        sort: Option<(SortKey, SortDirection)>,
    },
    Add {
        book: NewBook,
        cover: Option<PathBuf>,
    },
    Stock {
        book_id: i64,
        stock: i64,
    },
    Restock {
        book_id: i64,
        quantity: i64,
    },
    Rent {
        book_id: i64,
        user_id: i64,
    },
    Return {
        rent_id: i64,
    },
    Mine,
}

/// Execute a book action.
/// # Errors
/// Returns an error if the session cannot be opened or the service call fails.
pub async fn execute(args: Args) -> Result<()> {
    let Args { globals, operation } = args;
    let client = globals.client()?;
    let json = globals.json;

    match operation {
        Operation::Search { criteria, sort } => {
            let mut books = client.search_books(criteria).await.map_err(report)?;
            if let Some((key, direction)) = sort {
                sort_books(&mut books, key, direction);
            }
            output::emit(json, &books, || books_table(&books))
        }
        Operation::Add { book, cover } => {
            let id = client
                .add_book_with_cover(book, cover.as_deref())
                .await
                .map_err(report)?;
            output::status(json, &format!("Book added with id {id}"), &json!({ "id": id }))
        }
        Operation::Stock { book_id, stock } => {
            client.set_stock(book_id, stock).await.map_err(report)?;
            output::status(
                json,
                &format!("Stock of book {book_id} set to {stock}"),
                &json!({ "id": book_id, "stock": stock }),
            )
        }
        Operation::Restock { book_id, quantity } => {
            let books = client
                .search_books(BookCriteria::default())
                .await
                .map_err(report)?;
            let book = books
                .iter()
                .find(|book| book.id == Some(book_id))
                .ok_or_else(|| anyhow!("Book {book_id} not found"))?;

            let stock = client.restock(book, quantity).await.map_err(report)?;
            output::status(
                json,
                &format!("Stock of book {book_id} is now {stock}"),
                &json!({ "id": book_id, "stock": stock }),
            )
        }
        Operation::Rent { book_id, user_id } => {
            let due = client.rent_book(user_id, book_id).await.map_err(report)?;
            output::status(
                json,
                &format!("Book {book_id} rented to user {user_id}, due {due}"),
                &json!({ "bookId": book_id, "userId": user_id, "returnDate": due }),
            )
        }
        Operation::Return { rent_id } => {
            client.return_book(rent_id).await.map_err(report)?;
            output::status(
                json,
                "Book returned successfully!",
                &json!({ "rentId": rent_id }),
            )
        }
        Operation::Mine => {
            let rentals = client.my_books().await.map_err(report)?;
            output::emit(json, &rentals, || rentals_table(&rentals))
        }
    }
}

fn books_table(books: &[Book]) -> Table {
    let mut table = Table::new(&[
        "ID",
        "TITLE",
        "AUTHOR",
        "ISBN",
        "PRICE",
        "STOCK",
        "AVAILABLE",
        "PUBLISHED",
    ]);
    for book in books {
        table.row(vec![
            cell(book.id),
            cell(book.title.as_deref()),
            cell(book.author.as_deref()),
            cell(book.isbn.as_deref()),
            cell(book.price.map(|price| format!("{price:.2}"))),
            cell(book.stock),
            cell(book.stock_available),
            cell(book.date_published.as_deref()),
        ]);
    }
    table
}

pub(crate) fn rentals_table(rentals: &[RentedBook]) -> Table {
    let mut table = Table::new(&[
        "RENT ID", "BOOK ID", "TITLE", "AUTHOR", "RENTED", "DUE", "RETURNED", "COMMENT",
    ]);
    for rental in rentals {
        table.row(vec![
            cell(rental.rent_id),
            cell(rental.id),
            cell(rental.title.as_deref()),
            cell(rental.author.as_deref()),
            cell(rental.rent_date.as_deref()),
            cell(rental.return_date.as_deref()),
            cell(rental.returned.map(|returned| if returned { "yes" } else { "no" })),
            cell(rental.comment.as_deref()),
        ]);
    }
    table
}
