//! The identity types issued by the auth provider and the trait for talking to it.

use std::fmt::Display;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

/// The auth provider's identifier for a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap the auth provider's identifier for a user.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user known to the auth provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    /// The ID that owns the user's transactions.
    pub id: UserId,
    /// The email address the user logs in with.
    #[serde(default)]
    pub email: Option<String>,
}

/// A signed-in session issued by the auth provider.
///
/// The access token authorizes requests to the data store on behalf of the
/// user. Once it expires, the refresh token can be exchanged for a new
/// session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The bearer token sent with data store requests.
    pub access_token: String,
    /// The token used to get a new session once `access_token` expires.
    pub refresh_token: String,
    /// The user the session belongs to.
    pub user_id: UserId,
    /// When `access_token` stops being accepted.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl Session {
    /// Whether the access token has expired at `now`.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }
}

/// The operations the app needs from the external auth provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Start a new session for the user with `email` and `password`.
    ///
    /// # Errors
    /// Returns [Error::InvalidCredentials] if the auth provider rejects the
    /// email and password.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, Error>;

    /// Exchange `refresh_token` for a new session.
    ///
    /// # Errors
    /// Returns [Error::Unauthenticated] if the refresh token is no longer valid.
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, Error>;

    /// Get the user that `access_token` belongs to, or `None` if the auth
    /// provider does not accept the token.
    async fn get_user(&self, access_token: &str) -> Result<Option<User>, Error>;

    /// Revoke the session that `access_token` belongs to.
    async fn sign_out(&self, access_token: &str) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime, macros::datetime};

    use super::{Session, UserId};

    fn session_expiring_at(expires_at: OffsetDateTime) -> Session {
        Session {
            access_token: "access".to_owned(),
            refresh_token: "refresh".to_owned(),
            user_id: UserId::new("U1"),
            expires_at,
        }
    }

    #[test]
    fn session_expires_at_expiry_time() {
        let expires_at = datetime!(2024-01-15 10:00:00 UTC);
        let session = session_expiring_at(expires_at);

        assert!(!session.is_expired(expires_at - Duration::seconds(1)));
        assert!(session.is_expired(expires_at));
        assert!(session.is_expired(expires_at + Duration::hours(1)));
    }

    #[test]
    fn session_serializes_expiry_as_rfc3339() {
        let session = session_expiring_at(datetime!(2024-01-15 10:00:00 UTC));

        let json = serde_json::to_string(&session).unwrap();

        assert_eq!(
            json,
            r#"{"access_token":"access","refresh_token":"refresh","user_id":"U1","expires_at":"2024-01-15T10:00:00Z"}"#
        );
        assert_eq!(serde_json::from_str::<Session>(&json).unwrap(), session);
    }
}
