//! Signing users in and out, and gating pages on a live session.

mod cookie;
mod http_provider;
mod log_in;
mod log_out;
mod middleware;
mod provider;
mod redirect;

pub use http_provider::HttpAuthProvider;
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use provider::{AuthProvider, Session, User, UserId};
pub use redirect::normalize_redirect_url;

#[cfg(test)]
pub(crate) use cookie::{COOKIE_SESSION, set_session_cookie};
