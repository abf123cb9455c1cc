//! Session authentication against the storefront.
//!
//! Login posts the account credentials and reads the user and address ids
//! out of the response; the session itself lives in the transport's cookie
//! store. Logout never fails and always clears the local session state.

use knuspr_core::{AddressId, UserId};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::KnusprConfig;
use crate::endpoints;
use crate::envelope::{first_message, inner_status};
use crate::error::KnusprError;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const LOGIN_FAILED: &str = "Login failed";

/// Request body for the login endpoint.
#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

/// Identifiers of the logged-in session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SessionState {
    user_id: Option<UserId>,
    address_id: Option<AddressId>,
    authenticated: bool,
}

/// Resets the session when dropped, so logout clears state on every exit
/// path, including a cancelled future.
struct ResetOnDrop<'a>(&'a mut SessionState);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        *self.0 = SessionState::default();
    }
}

/// Logs in and out, and tracks the session identifiers in between.
///
/// Starts anonymous; [`Authenticator::login`] makes it authenticated and
/// [`Authenticator::logout`] makes it anonymous again.
pub struct Authenticator {
    email: String,
    password: SecretString,
    session: SessionState,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("session", &self.session)
            .finish()
    }
}

impl Authenticator {
    #[must_use]
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
            session: SessionState::default(),
        }
    }

    #[must_use]
    pub fn from_config(config: &KnusprConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }

    /// Log in with the configured credentials.
    ///
    /// Returns the raw response envelope on success.
    ///
    /// # Errors
    ///
    /// Returns `KnusprError::Authentication` if the HTTP status or the
    /// envelope's inner status is 401/403.
    /// Returns `KnusprError::Api` if the inner status is anything but 200/202,
    /// or if an HTTP error status comes with a body that isn't JSON. An
    /// HTTP error with a JSON body is judged by its envelope alone.
    /// Returns `KnusprError::Network` if the request doesn't complete.
    /// Returns `KnusprError::Decode` if a success body isn't JSON.
    #[instrument(skip(self, http), fields(email = %self.email))]
    pub async fn login(
        &mut self,
        http: &reqwest::Client,
        base_url: &str,
    ) -> Result<Value, KnusprError> {
        let response = http
            .post(format!("{base_url}{}", endpoints::LOGIN))
            .json(&LoginRequest {
                email: &self.email,
                password: self.password.expose_secret(),
                name: "",
            })
            .send()
            .await
            .map_err(|e| KnusprError::network(endpoints::LOGIN, e))?;

        let status = response.status();
        debug!(%status, "login response");

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(KnusprError::Authentication(INVALID_CREDENTIALS.to_owned()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| KnusprError::network(endpoints::LOGIN, e))?;

        let body: Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(KnusprError::Api {
                    message: format!("{LOGIN_FAILED} (HTTP {status})"),
                    status: Some(i64::from(status.as_u16())),
                });
            }
            Err(e) => return Err(e.into()),
        };

        match inner_status(&body) {
            Some(401 | 403) => {
                return Err(KnusprError::Authentication(INVALID_CREDENTIALS.to_owned()));
            }
            Some(200 | 202) | None => {}
            Some(other) => {
                return Err(KnusprError::Api {
                    message: first_message(&body).unwrap_or_else(|| LOGIN_FAILED.to_owned()),
                    status: Some(other),
                });
            }
        }

        let data = body.get("data");
        self.session = SessionState {
            user_id: nested_id(data, "user").map(UserId::new),
            address_id: nested_id(data, "address").map(AddressId::new),
            authenticated: true,
        };
        debug!(
            user_id = ?self.session.user_id,
            address_id = ?self.session.address_id,
            "logged in"
        );

        Ok(body)
    }

    /// Log out. Transport errors are logged and swallowed; the session is
    /// cleared regardless.
    #[instrument(skip(self, http))]
    pub async fn logout(&mut self, http: &reqwest::Client, base_url: &str) {
        let _reset = ResetOnDrop(&mut self.session);

        match http
            .post(format!("{base_url}{}", endpoints::LOGOUT))
            .send()
            .await
        {
            Ok(response) => debug!(status = %response.status(), "logged out"),
            Err(e) => warn!(error = %e, "logout request failed; clearing session anyway"),
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.authenticated
    }

    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        self.session.user_id
    }

    #[must_use]
    pub const fn address_id(&self) -> Option<AddressId> {
        self.session.address_id
    }
}

/// `data.<key>.id` as an integer.
fn nested_id(data: Option<&Value>, key: &str) -> Option<i64> {
    data?.get(key)?.get("id")?.as_i64()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_new_authenticator_is_anonymous() {
        let auth = Authenticator::new("test@example.com", SecretString::from("pw"));
        assert!(!auth.is_authenticated());
        assert!(auth.user_id().is_none());
        assert!(auth.address_id().is_none());
    }

    #[test]
    fn test_reset_on_drop_clears_session() {
        let mut session = SessionState {
            user_id: Some(UserId::new(1)),
            address_id: Some(AddressId::new(2)),
            authenticated: true,
        };
        drop(ResetOnDrop(&mut session));
        assert_eq!(session, SessionState::default());
    }

    #[test]
    fn test_nested_id() {
        let data = json!({"user": {"id": 12345}, "address": {"id": "x"}});
        assert_eq!(nested_id(Some(&data), "user"), Some(12345));
        assert_eq!(nested_id(Some(&data), "address"), None);
        assert_eq!(nested_id(None, "user"), None);
    }

    #[test]
    fn test_debug_redacts_password() {
        let auth = Authenticator::new("me@example.com", SecretString::from("super_secret"));
        let output = format!("{auth:?}");
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("super_secret"));
    }
}
