use crate::{
    gateway::{Gateway, GatewayConfig},
    library::LibraryClient,
    session::FileSessionStore,
};
use anyhow::Result;
use std::{path::PathBuf, sync::Arc};

/// Arguments shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub session_file: PathBuf,
    pub json: bool,
}

impl GlobalArgs {
    #[must_use]
    pub const fn new(api_url: String, session_file: PathBuf, json: bool) -> Self {
        Self {
            api_url,
            session_file,
            json,
        }
    }

    /// Open the session file and build a client on top of it.
    ///
    /// # Errors
    /// Returns an error if the API URL is invalid or the session file is unreadable.
    pub fn client(&self) -> Result<LibraryClient> {
        let config = GatewayConfig::new(&self.api_url)?;
        let store = FileSessionStore::open(&self.session_file)?;
        let gateway = Gateway::new(&config, Arc::new(store))?;
        Ok(LibraryClient::new(gateway))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gateway::DEFAULT_BASE_URL;

    #[test]
    fn test_global_args() {
        let dir = tempfile::tempdir().unwrap();
        let args = GlobalArgs::new(
            DEFAULT_BASE_URL.to_string(),
            dir.path().join("session.json"),
            false,
        );
        assert_eq!(args.api_url, DEFAULT_BASE_URL);

        let client = args.client().unwrap();
        assert!(!client.session().is_authenticated());
    }

    #[test]
    fn test_invalid_api_url() {
        let dir = tempfile::tempdir().unwrap();
        let args = GlobalArgs::new(
            "ftp://library".to_string(),
            dir.path().join("session.json"),
            false,
        );
        assert!(args.client().is_err());
    }
}
