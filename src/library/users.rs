use super::{LibraryClient, LibraryError, UserCriteria, UserSummary, books::to_body};
use crate::navigation::Screen;
use reqwest::Method;

impl LibraryClient {
    /// Admin user lookup. Blank criteria are sent as `null`.
    ///
    /// # Errors
    /// Returns an error for non-admins or if the service rejects the search.
    pub async fn search_users(
        &self,
        criteria: UserCriteria,
    ) -> Result<Vec<UserSummary>, LibraryError> {
        self.require(Screen::UserSearch).await?;
        let body = to_body(&criteria.normalized())?;
        Ok(self
            .gateway
            .request_as(Method::POST, "user/search", Some(&body), &[])
            .await?)
    }
}
