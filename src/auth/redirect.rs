//! Working out where to send the user after they log in.
//!
//! Only same-origin paths are accepted, so the log-in page cannot be used to
//! bounce users to another site.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

fn is_safe_path(path_and_query: &str) -> bool {
    if !path_and_query.starts_with('/') || path_and_query.starts_with("//") {
        return false;
    }

    let path = path_and_query
        .split_once('?')
        .map_or(path_and_query, |(path, _)| path);

    // Sending the user back to the log-in page after logging in would loop.
    path != endpoints::LOG_IN_VIEW && !path.starts_with("/api/")
}

/// Reduce `raw_url` to a relative path and query, or `None` if it points
/// at another origin, the log-in page or an API route.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    let path_and_query = uri.path_and_query()?.as_str();
    is_safe_path(path_and_query).then(|| path_and_query.to_owned())
}

/// The log-in page URL that returns the user to `redirect_target` afterwards.
pub fn build_log_in_redirect_url_from_target(redirect_target: &str) -> Option<String> {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(query) => Some(format!("{}?{query}", endpoints::LOG_IN_VIEW)),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {redirect_target}: {error}");
            None
        }
    }
}

/// The log-in page URL that returns the user to the page they were on.
///
/// Page requests return to the requested page. htmx requests to `/api`
/// return to the page that made the request, taken from the
/// `HX-Current-URL` header, which may be a full URL.
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let target = if request.uri().path().starts_with("/api") {
        current_page_of_hx_request(request)?
    } else {
        normalize_redirect_url(request.uri().path_and_query()?.as_str())?
    };

    build_log_in_redirect_url_from_target(&target)
}

fn current_page_of_hx_request(request: &Request) -> Option<String> {
    let headers = request.headers();
    let is_hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        tracing::warn!("Missing HX-Request header for {}", request.uri().path());
        return None;
    }

    let Some(current_url) = headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())
    else {
        tracing::warn!("Missing HX-Current-URL header for {}", request.uri().path());
        return None;
    };

    let page = current_url
        .parse::<Uri>()
        .ok()
        .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_owned()))
        .filter(|path_and_query| is_safe_path(path_and_query));

    if page.is_none() {
        tracing::warn!("Invalid HX-Current-URL header value: {current_url}");
    }

    page
}
