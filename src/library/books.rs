use super::{
    Book, BookCriteria, LibraryClient, LibraryError, NewBook, RentRequest, RentedBook,
    SortDirection, SortKey,
};
use crate::{gateway::GatewayError, navigation::Screen};
use chrono::{Local, Months, NaiveDate};
use reqwest::{
    Method,
    multipart::{Form, Part},
};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Rentals are due six months after the rent date.
const RENTAL_MONTHS: u32 = 6;

impl LibraryClient {
    /// # Errors
    /// Returns an error without a session or if the service rejects the search.
    pub async fn search_books(&self, criteria: BookCriteria) -> Result<Vec<Book>, LibraryError> {
        self.require(Screen::BookSearch).await?;
        let body = to_body(&criteria.normalized())?;
        Ok(self
            .gateway
            .request_as(Method::POST, "book/search", Some(&body), &[])
            .await?)
    }

    /// Add a book and return the id the service assigned to it.
    ///
    /// # Errors
    /// Returns an error for non-admins, on rejection, or when no id comes back.
    pub async fn add_book(&self, book: NewBook) -> Result<i64, LibraryError> {
        self.require(Screen::AddBook).await?;
        let body = to_body(&book)?;
        let created = self
            .gateway
            .request(Method::POST, "book", Some(&body), &[])
            .await?;

        let id = book_id(&created).ok_or_else(|| GatewayError::request("Book ID is missing."))?;
        info!(book.id = id, "book added");
        Ok(id)
    }

    /// Attach a cover image to a book. Only JPEG files are accepted.
    ///
    /// # Errors
    /// [`LibraryError::Validation`] for other file types or unreadable files,
    /// otherwise whatever the service answers.
    pub async fn upload_cover(&self, book_id: i64, image: &Path) -> Result<(), LibraryError> {
        self.require(Screen::AddBook).await?;
        let cover = read_cover(image).await?;
        Ok(self.send_cover(book_id, cover).await?)
    }

    /// Add a book, then upload its cover if one is given. The cover is read
    /// before the book is created, and the upload is never attempted when the
    /// book could not be added.
    ///
    /// # Errors
    /// Returns the first failing step. A failed upload after the book was
    /// created is [`LibraryError::CoverNotUploaded`] and carries the new id.
    pub async fn add_book_with_cover(
        &self,
        book: NewBook,
        cover: Option<&Path>,
    ) -> Result<i64, LibraryError> {
        self.require(Screen::AddBook).await?;
        let cover = match cover {
            Some(path) => Some(read_cover(path).await?),
            None => None,
        };

        let id = self.add_book(book).await?;
        if let Some(cover) = cover {
            self.send_cover(id, cover)
                .await
                .map_err(|source| LibraryError::CoverNotUploaded { book_id: id, source })?;
        }
        Ok(id)
    }

    async fn send_cover(&self, book_id: i64, cover: Cover) -> Result<(), GatewayError> {
        let part = Part::bytes(cover.bytes)
            .file_name(cover.file_name)
            .mime_str("image/jpeg")
            .map_err(|err| GatewayError::request(format!("Request error: {err}")))?;
        let form = Form::new()
            .part("file", part)
            .text("bookId", book_id.to_string());

        self.gateway.upload("file", form).await?;
        info!(book.id = book_id, "cover uploaded");
        Ok(())
    }

    /// # Errors
    /// Returns an error for non-admins or if the service rejects the change.
    pub async fn set_stock(&self, book_id: i64, stock: i64) -> Result<(), LibraryError> {
        self.require(Screen::AddBook).await?;
        self.gateway
            .execute(Method::PATCH, &format!("book/{book_id}?stock={stock}"), None, &[])
            .await?;
        Ok(())
    }

    /// Raise the stock of `book` by `quantity` and return the new total.
    ///
    /// # Errors
    /// Returns an error for a negative quantity, a book without id, or a failed update.
    pub async fn restock(&self, book: &Book, quantity: i64) -> Result<i64, LibraryError> {
        if quantity < 0 {
            return Err(LibraryError::validation("Quantity must not be negative."));
        }
        let id = book
            .id
            .ok_or_else(|| LibraryError::validation("Book ID is missing."))?;
        let stock = book.stock.unwrap_or(0) + quantity;

        self.set_stock(id, stock).await.inspect_err(|err| {
            warn!(book.id = id, "restock failed: {err}");
        })?;
        Ok(stock)
    }

    /// Rent a book to a user and return the due date.
    ///
    /// # Errors
    /// Returns an error for non-admins or if the service rejects the rental.
    pub async fn rent_book(&self, user_id: i64, book_id: i64) -> Result<NaiveDate, LibraryError> {
        self.require(Screen::AddBook).await?;
        let return_date = due_date(Local::now().date_naive())
            .ok_or_else(|| LibraryError::validation("Return date is out of range."))?;

        let body = to_body(&RentRequest {
            user_id,
            book_id,
            return_date,
        })?;
        self.gateway
            .execute(Method::POST, "book-rent", Some(&body), &[])
            .await
            .inspect_err(|err| warn!(book.id = book_id, user.id = user_id, "rent failed: {err}"))?;

        info!(book.id = book_id, user.id = user_id, %return_date, "book rented");
        Ok(return_date)
    }

    /// # Errors
    /// Returns an error for non-admins or if the service rejects the return.
    pub async fn return_book(&self, rent_id: i64) -> Result<(), LibraryError> {
        self.require(Screen::UserSearch).await?;
        self.gateway
            .execute(Method::PATCH, &format!("book-return?rentId={rent_id}"), None, &[])
            .await?;
        info!(rent.id = rent_id, "book returned");
        Ok(())
    }

    /// Rentals of the signed-in user.
    ///
    /// # Errors
    /// Returns an error without a session or if the service rejects the call.
    pub async fn my_books(&self) -> Result<Vec<RentedBook>, LibraryError> {
        self.require(Screen::MyBooks).await?;
        Ok(self
            .gateway
            .request_as(Method::GET, "book", None, &[])
            .await?)
    }

    /// # Errors
    /// Returns an error for non-admins or if the service rejects the call.
    pub async fn user_books(&self, user_id: i64) -> Result<Vec<RentedBook>, LibraryError> {
        self.require(Screen::UserSearch).await?;
        Ok(self
            .gateway
            .request_as(Method::GET, &format!("book?userId={user_id}"), None, &[])
            .await?)
    }
}

/// Sort search results in place. Missing values sort first when ascending.
pub fn sort_books(books: &mut [Book], key: SortKey, direction: SortDirection) {
    books.sort_by(|a, b| {
        let ordering = key.compare(a, b);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn due_date(today: NaiveDate) -> Option<NaiveDate> {
    today.checked_add_months(Months::new(RENTAL_MONTHS))
}

/// The add endpoint answers with the bare id, either as a number or as text.
fn book_id(created: &Value) -> Option<i64> {
    let id = match created {
        Value::Number(id) => id.as_i64(),
        Value::String(id) => id.trim().parse().ok(),
        Value::Object(map) => map.get("id").and_then(book_id),
        _ => None,
    };
    id.filter(|id| *id != 0)
}

struct Cover {
    file_name: String,
    bytes: Vec<u8>,
}

async fn read_cover(path: &Path) -> Result<Cover, LibraryError> {
    let file_name = cover_file_name(path)?;
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        LibraryError::validation(format!("Cannot read {}: {err}", path.display()))
    })?;
    Ok(Cover { file_name, bytes })
}

fn cover_file_name(image: &Path) -> Result<String, LibraryError> {
    let is_jpeg = image
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"));
    if !is_jpeg {
        return Err(LibraryError::validation(
            "Cover image must be a .jpg or .jpeg file.",
        ));
    }

    image
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| LibraryError::validation("Cover image has no file name."))
}

pub(super) fn to_body<T: Serialize>(payload: &T) -> Result<Value, LibraryError> {
    serde_json::to_value(payload)
        .map_err(|err| GatewayError::request(format!("Failed to encode request: {err}")).into())
}
