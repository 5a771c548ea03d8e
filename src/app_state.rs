//! Implements a struct that holds the state of the server.

use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use crate::{
    Config, Error,
    auth::{AuthProvider, HttpAuthProvider},
    news::{NewsApiClient, NewsQuery, NewsSource},
    refresh::RefreshCounter,
    timezone::get_local_offset,
    transaction::{HttpTransactionStore, TransactionStore},
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// The state of the server.
#[derive(Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// Signs users in and out and resolves sessions to users.
    pub auth_provider: Arc<dyn AuthProvider>,

    /// Where the transactions are persisted.
    pub transaction_store: Arc<dyn TransactionStore>,

    /// Provides the headlines for the news panel.
    pub news_source: Arc<dyn NewsSource>,

    /// Tells each user's transaction table when to re-fetch.
    pub refresh_counter: RefreshCounter,
}

impl AppState {
    /// Create a new [AppState] from its collaborators.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    pub fn new(
        cookie_secret: &str,
        local_timezone: &str,
        auth_provider: Arc<dyn AuthProvider>,
        transaction_store: Arc<dyn TransactionStore>,
        news_source: Arc<dyn NewsSource>,
    ) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            local_timezone: local_timezone.to_owned(),
            auth_provider,
            transaction_store,
            news_source,
            refresh_counter: RefreshCounter::new(),
        }
    }

    /// Create the state for talking to the services named in `config`.
    ///
    /// # Errors
    /// Returns an error if the timezone is not a canonical timezone name or
    /// the HTTP clients cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        if get_local_offset(&config.timezone).is_none() {
            return Err(Error::InvalidTimezoneError(config.timezone.clone()));
        }

        let timeout = Duration::from_secs(config.request_timeout_secs);
        let store_http = build_http_client(timeout)?;
        let news_http = build_http_client(timeout)?;

        let auth_provider =
            HttpAuthProvider::new(store_http.clone(), &config.store_url, &config.store_key);
        let transaction_store =
            HttpTransactionStore::new(store_http, &config.store_url, &config.store_key);
        let news_source = NewsApiClient::new(
            news_http,
            &config.news_url,
            &config.news_api_key,
            NewsQuery {
                country: config.news_country.clone(),
                category: config.news_category.clone(),
            },
        );

        Ok(Self::new(
            &config.secret,
            &config.timezone,
            Arc::new(auth_provider),
            Arc::new(transaction_store),
            Arc::new(news_source),
        ))
    }
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client, Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|error| Error::HttpClientBuild(error.to_string()))
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
