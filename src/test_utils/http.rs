use axum::{
    Router,
    body::Body,
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key},
};

use crate::auth::{COOKIE_SESSION, Session, set_session_cookie};

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let header_error_message = format!("Headers missing {header_name}");

    response
        .headers()
        .get(header_name)
        .expect(&header_error_message)
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(get_header(response, "hx-redirect"), endpoint);
}

/// The session cookie as the browser would send it back, encrypted with `key`.
pub(crate) fn encrypted_session_cookie(key: &Key, session: &Session) -> Cookie<'static> {
    let jar = set_session_cookie(PrivateCookieJar::new(key.clone()), session)
        .expect("Could not set session cookie");
    let response = (jar, ()).into_response();

    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|header| Cookie::parse(header.to_str().ok()?.to_owned()).ok())
        .find(|cookie| cookie.name() == COOKIE_SESSION)
        .map(|cookie| Cookie::new(COOKIE_SESSION, cookie.value().to_owned()))
        .expect("Session cookie was not set")
}

/// Serve `app` on an ephemeral local port and return its base URL, e.g.
/// "http://127.0.0.1:12345".
pub(crate) async fn spawn_stub_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind stub server");
    let address = listener
        .local_addr()
        .expect("Could not get stub server address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Stub server stopped unexpectedly");
    });

    format!("http://{address}")
}
