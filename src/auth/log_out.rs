//! Log-out route handler that ends the session and redirects users.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    auth::{
        AuthState,
        cookie::{get_session_from_cookies, invalidate_session_cookie},
    },
    endpoints,
};

/// Sign the session out with the auth provider, clear the session cookie and
/// redirect the client to the log-in page.
///
/// The cookie is cleared even if the auth provider cannot be reached.
pub async fn get_log_out(State(state): State<AuthState>, jar: PrivateCookieJar) -> Response {
    if let Ok(session) = get_session_from_cookies(&jar) {
        match state.auth_provider.sign_out(&session.access_token).await {
            Ok(()) => tracing::info!("User {} logged out", session.user_id),
            Err(error) => tracing::warn!("Could not sign out user {}: {error}", session.user_id),
        }
    }

    let jar = invalidate_session_cookie(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
