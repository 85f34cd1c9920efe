use super::{BookComment, CommentRequest, LibraryClient, LibraryError, books::to_body};
use crate::navigation::Screen;
use reqwest::Method;
use tracing::info;

impl LibraryClient {
    /// Set or replace the comment of a rental.
    ///
    /// # Errors
    /// Returns an error without a session, [`LibraryError::Validation`] for a
    /// blank comment, otherwise whatever the service answers.
    pub async fn comment(&self, rent_id: i64, text: &str) -> Result<(), LibraryError> {
        self.require(Screen::MyBooks).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(LibraryError::validation("Comment must not be empty."));
        }
        self.post_comment(CommentRequest {
            rent_id,
            comment: Some(text.to_string()),
        })
        .await?;
        info!(rent.id = rent_id, "comment saved");
        Ok(())
    }

    /// # Errors
    /// Returns an error without a session or if the service rejects the call.
    pub async fn delete_comment(&self, rent_id: i64) -> Result<(), LibraryError> {
        self.require(Screen::MyBooks).await?;
        self.post_comment(CommentRequest {
            rent_id,
            comment: None,
        })
        .await?;
        info!(rent.id = rent_id, "comment deleted");
        Ok(())
    }

    /// # Errors
    /// Returns an error unless signed in as a regular user.
    pub async fn my_comments(&self) -> Result<Vec<BookComment>, LibraryError> {
        self.require(Screen::MyComments).await?;
        Ok(self
            .gateway
            .request_as(Method::GET, "comment", None, &[])
            .await?)
    }

    /// # Errors
    /// Returns an error for non-admins or if the service rejects the call.
    pub async fn user_comments(&self, user_id: i64) -> Result<Vec<BookComment>, LibraryError> {
        self.require(Screen::UserSearch).await?;
        Ok(self
            .gateway
            .request_as(Method::GET, &format!("comment?userId={user_id}"), None, &[])
            .await?)
    }

    async fn post_comment(&self, request: CommentRequest) -> Result<(), LibraryError> {
        let body = to_body(&request)?;
        self.gateway
            .execute(Method::POST, "book-comment", Some(&body), &[])
            .await?;
        Ok(())
    }
}

/// Comments to display. Rentals without a comment are hidden unless `show_empty`.
#[must_use]
pub fn visible_comments(comments: &[BookComment], show_empty: bool) -> Vec<&BookComment> {
    comments
        .iter()
        .filter(|comment| show_empty || comment.comment.is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(rent_id: i64, text: Option<&str>) -> BookComment {
        BookComment {
            rent_id: Some(rent_id),
            book_title: Some("Dune".to_string()),
            comment: text.map(str::to_string),
        }
    }

    #[test]
    fn hides_empty_comments_by_default() {
        let comments = vec![comment(1, Some("great")), comment(2, None), comment(3, Some(""))];

        let visible: Vec<_> = visible_comments(&comments, false)
            .iter()
            .filter_map(|c| c.rent_id)
            .collect();
        assert_eq!(visible, vec![1, 3]);

        assert_eq!(visible_comments(&comments, true).len(), 3);
    }
}
