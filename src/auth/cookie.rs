//! Storing the signed-in session in a private cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::Session};

pub(crate) const COOKIE_SESSION: &str = "session";
/// How long the browser keeps the session cookie.
///
/// The access token inside usually expires much sooner, after which the
/// refresh token is used to get a new one.
pub(crate) const SESSION_COOKIE_DURATION: Duration = Duration::days(7);

/// Add the session cookie to the cookie jar, marking the user as signed in.
///
/// # Errors
///
/// Returns an [Error::JSONSerializationError] if the session cannot be serialized.
pub(crate) fn set_session_cookie(
    jar: PrivateCookieJar,
    session: &Session,
) -> Result<PrivateCookieJar, Error> {
    let value = serde_json::to_string(session)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_SESSION, value))
            .expires(OffsetDateTime::now_utc() + SESSION_COOKIE_DURATION)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true)
            .path("/"),
    ))
}

/// Read the session from the cookie jar.
///
/// # Errors
///
/// Returns [Error::SessionMissing] if there is no session cookie or its
/// contents cannot be parsed.
pub(crate) fn get_session_from_cookies(jar: &PrivateCookieJar) -> Result<Session, Error> {
    let cookie = jar.get(COOKIE_SESSION).ok_or(Error::SessionMissing)?;

    serde_json::from_str(cookie.value_trimmed()).map_err(|error| {
        tracing::warn!("Could not parse session cookie: {error}");
        Error::SessionMissing
    })
}

/// Overwrite the session cookie and expire it, which deletes it on the client side.
pub(crate) fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true)
            .path("/"),
    )
}
