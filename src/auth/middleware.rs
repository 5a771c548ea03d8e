//! Authentication middleware that reads the session cookie, refreshes
//! expired sessions and redirects signed-out users to the log-in page.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::OffsetDateTime;

use crate::{
    AppState,
    auth::{
        AuthProvider,
        cookie::{get_session_from_cookies, invalidate_session_cookie, set_session_cookie},
        redirect::{build_log_in_redirect_url, build_log_in_redirect_url_from_target},
    },
    endpoints,
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// Used to exchange the refresh token of an expired session.
    pub auth_provider: Arc<dyn AuthProvider>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            auth_provider: state.auth_provider.clone(),
        }
    }
}

impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

fn with_cookies(response: Response, jar: PrivateCookieJar) -> Response {
    let (mut parts, body) = response.into_parts();

    for (key, value) in jar.into_response().headers().iter() {
        if key == SET_COOKIE {
            parts.headers.append(key, value.to_owned());
        }
    }

    Response::from_parts(parts, body)
}

async fn auth_guard_internal(
    state: AuthState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let log_in_redirect_url = build_log_in_redirect_url(&request).unwrap_or_else(|| {
        build_log_in_redirect_url_from_target(endpoints::DASHBOARD_VIEW)
            .unwrap_or_else(|| endpoints::LOG_IN_VIEW.to_owned())
    });

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Error getting cookie jar: {error:?}. Redirecting to log in page.");
            return get_redirect(&log_in_redirect_url);
        }
    };

    let Ok(session) = get_session_from_cookies(&jar) else {
        return get_redirect(&log_in_redirect_url);
    };

    let (session, jar) = if session.is_expired(OffsetDateTime::now_utc()) {
        let refreshed = state
            .auth_provider
            .refresh_session(&session.refresh_token)
            .await
            .and_then(|new_session| {
                set_session_cookie(jar.clone(), &new_session).map(|jar| (new_session, jar))
            });

        match refreshed {
            Ok(refreshed) => {
                tracing::debug!("Refreshed session for user {}", refreshed.0.user_id);
                refreshed
            }
            Err(error) => {
                tracing::info!("Could not refresh session, signing out: {error}");
                let jar = invalidate_session_cookie(jar);
                return with_cookies(get_redirect(&log_in_redirect_url), jar);
            }
        }
    } else {
        (session, jar)
    };

    parts.extensions.insert(session);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    with_cookies(response, jar)
}

/// Middleware function that checks for a session cookie.
///
/// The session is placed into the request and the request executed normally
/// if the cookie holds a live session, otherwise a redirect to the log-in
/// page is returned. Expired sessions are refreshed with the auth provider
/// first.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(session): Extension<Session>` to receive the session.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// The same as [auth_guard], except that signed-out users get an htmx
/// redirect so that fragments requested by htmx send the whole page to the
/// log-in page.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}
