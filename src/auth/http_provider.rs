//! An [AuthProvider] backed by the hosted platform's GoTrue-compatible REST API.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    auth::provider::{AuthProvider, Session, User},
};

/// Talks to the `/auth/v1` endpoints of the hosted data platform.
#[derive(Debug, Clone)]
pub struct HttpAuthProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: User,
}

impl TokenResponse {
    fn into_session(self, now: OffsetDateTime) -> Result<Session, Error> {
        let expires_at = now
            .checked_add(Duration::seconds(self.expires_in))
            .ok_or_else(|| {
                Error::AuthRequest(format!("token expiry {}s is out of range", self.expires_in))
            })?;

        Ok(Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            user_id: self.user.id,
            expires_at,
        })
    }
}

impl HttpAuthProvider {
    /// Create a provider for the platform at `base_url`, e.g.
    /// "https://project.example.co", identifying the app with `api_key`.
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    async fn request_token(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<Session, Error> {
        let response = self
            .http
            .post(self.url("token"))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|error| Error::AuthRequest(error.to_string()))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(match grant_type {
                "password" => Error::InvalidCredentials,
                _ => Error::Unauthenticated,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::AuthResponse {
                status: status.as_u16(),
                body,
            });
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(|error| Error::AuthRequest(error.to_string()))?;

        token.into_session(OffsetDateTime::now_utc())
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, Error> {
        self.request_token(
            "password",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, Error> {
        self.request_token(
            "refresh_token",
            serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<User>, Error> {
        let response = self
            .http
            .get(self.url("user"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|error| Error::AuthRequest(error.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::AuthResponse {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<User>()
            .await
            .map(Some)
            .map_err(|error| Error::AuthRequest(error.to_string()))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), Error> {
        let response = self
            .http
            .post(self.url("logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|error| Error::AuthRequest(error.to_string()))?;

        let status = response.status();
        // An expired token has already been signed out as far as the user is concerned.
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::AuthResponse {
            status: status.as_u16(),
            body,
        })
    }
}
