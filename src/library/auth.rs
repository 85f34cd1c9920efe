use super::{
    LibraryClient, LibraryError, ProfileUpdate, Registration, UserProfile, types::blank_to_none,
};
use crate::{gateway::GatewayError, navigation::Screen, session::Role};
use base64ct::{Base64, Encoding};
use reqwest::{Method, header::AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{info, warn};

const REQUIRED_FIELDS: &str =
    "Email, Password, Password Confirmation, and Main Address fields are required.";

impl LibraryClient {
    /// Exchange credentials for a token and store it. The role is fetched
    /// right after; a failed role lookup still leaves the user logged in.
    ///
    /// # Errors
    /// Returns an error if the service rejects the credentials, answers
    /// without a token, or the session cannot be stored.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Option<Role>, LibraryError> {
        let basic = Base64::encode_string(
            format!("{username}:{}", password.expose_secret()).as_bytes(),
        );
        let headers = [(AUTHORIZATION.to_string(), format!("Basic {basic}"))];
        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let raw = self
            .gateway
            .request_anonymous_text(Method::POST, "login", Some(&body), &headers)
            .await?;
        let token = parse_token(&raw)
            .ok_or_else(|| GatewayError::request("Login response did not include a token"))?;

        self.gateway
            .session()
            .set_session(SecretString::from(token), None)?;
        info!("login succeeded");

        match self.refresh_role().await {
            Ok(role) => Ok(Some(role)),
            Err(err) => {
                warn!("could not fetch user role: {err}");
                Ok(None)
            }
        }
    }

    /// # Errors
    /// Returns an error if persisted session state cannot be removed.
    pub fn logout(&self) -> Result<(), LibraryError> {
        self.gateway.session().clear_session()?;
        info!("logged out");
        Ok(())
    }

    /// Create an account. Runs without a session.
    ///
    /// # Errors
    /// [`LibraryError::Validation`] if a required field is blank, otherwise
    /// whatever the service answers.
    pub async fn register(&self, registration: Registration) -> Result<(), LibraryError> {
        let body = registration_payload(registration)?;
        self.gateway
            .request_anonymous(Method::POST, "user", Some(&body), &[])
            .await?;
        info!("registration accepted");
        Ok(())
    }

    /// Read the role of the signed-in user and store it.
    ///
    /// # Errors
    /// Returns an error if the profile cannot be read or carries no known role.
    pub async fn refresh_role(&self) -> Result<Role, LibraryError> {
        let profile = self.fetch_profile().await?;
        let role = profile
            .role()
            .ok_or_else(|| GatewayError::request("Failed to fetch user info"))?;
        self.gateway.session().set_role(role)?;
        Ok(role)
    }

    /// # Errors
    /// Returns an error without a session or if the service rejects the call.
    pub async fn profile(&self) -> Result<UserProfile, LibraryError> {
        self.require(Screen::UserInfo).await?;
        self.fetch_profile().await
    }

    /// Save profile changes and return the profile as stored by the service.
    /// Unset fields keep their current value.
    ///
    /// # Errors
    /// Returns an error without a session or if either call fails.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<UserProfile, LibraryError> {
        self.require(Screen::UserInfo).await?;
        let current = self.fetch_profile().await?;
        let update = update.merged_with(&current);

        let body = serde_json::to_value(&update)
            .map_err(|err| GatewayError::request(format!("Failed to encode request: {err}")))?;
        self.gateway
            .execute(Method::PUT, "user", Some(&body), &[])
            .await?;

        self.fetch_profile().await
    }

    async fn fetch_profile(&self) -> Result<UserProfile, LibraryError> {
        Ok(self
            .gateway
            .request_as(Method::GET, "user", None, &[])
            .await?)
    }
}

/// The login endpoint answers with `{"token": ..}`, a JSON string or the bare token.
fn parse_token(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let token = match serde_json::from_str::<Value>(raw) {
        Ok(Value::String(token)) => token,
        Ok(Value::Object(map)) => map.get("token")?.as_str()?.to_string(),
        Ok(_) => return None,
        Err(_) => raw.to_string(),
    };

    let token = token.trim().to_string();
    (!token.is_empty()).then_some(token)
}

fn registration_payload(registration: Registration) -> Result<Value, LibraryError> {
    let secret = |value: Option<SecretString>| {
        value
            .map(|secret| secret.expose_secret().to_string())
            .filter(|secret| !secret.is_empty())
    };

    let email = blank_to_none(registration.email);
    let password = secret(registration.password);
    let password_confirmation = secret(registration.password_confirmation);
    let main_address = blank_to_none(registration.main_address);

    if email.is_none()
        || password.is_none()
        || password_confirmation.is_none()
        || main_address.is_none()
    {
        return Err(LibraryError::validation(REQUIRED_FIELDS));
    }

    Ok(json!({
        "firstName": blank_to_none(registration.first_name),
        "secondName": blank_to_none(registration.second_name),
        "thirdName": blank_to_none(registration.third_name),
        "email": email,
        "password": password,
        "passwordConfirmation": password_confirmation,
        "mainAddress": main_address,
        "age": registration.age,
        "roleName": registration.role.unwrap_or(Role::User),
    }))
}
