use thiserror::Error;

/// Fallback message when a failed response carries no usable `message`.
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// Every gateway call resolves to a value or exactly one of these kinds.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No credential is stored. Callers redirect to login instead of retrying.
    #[error("no active session")]
    NoSession,
    /// The remote service rejected the call, or it never reached the service.
    #[error("{0}")]
    RequestFailed(String),
}

impl GatewayError {
    pub(crate) fn request(message: impl Into<String>) -> Self {
        Self::RequestFailed(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_displays_message_verbatim() {
        let err = GatewayError::request("Book not found");
        assert_eq!(err.to_string(), "Book not found");
    }

    #[test]
    fn no_session_is_distinguished() {
        assert_ne!(
            GatewayError::NoSession,
            GatewayError::request("no active session")
        );
    }
}
