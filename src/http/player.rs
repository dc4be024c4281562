use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use crate::http::page;
use crate::http::state::AppState;
use crate::video_id::VideoId;

/// Body of every 400 response.
pub const INVALID_VIDEO_ID: &str = "Invalid Video ID";

/// Only the embed origin may be framed; inline styles are needed for the full-bleed layout.
const CONTENT_SECURITY_POLICY: &str =
    "default-src 'none'; frame-src https://www.youtube-nocookie.com; style-src 'unsafe-inline'";

/// Query parameter carrying the candidate video id.
const VIDEO_PARAM: &str = "v";

/// First `v` value in the query string, percent-decoded. None if absent.
fn video_param(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == VIDEO_PARAM)
        .map(|(_, v)| v.into_owned())
}

/// GET /?v={id}: the relay's single endpoint.
///
/// Checks run in order and short-circuit:
/// 1. non-GET → 405, empty body
/// 2. Host not `127.0.0.1:<port>` / `localhost:<port>` → 403, empty body
/// 3. path other than `/` → 404, empty body
/// 4. `v` missing or not a valid id → 400, `Invalid Video ID`
/// 5. otherwise → 200 with the rendered player page
pub async fn serve_player(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if method != Method::GET {
        tracing::debug!("Rejecting {} {}: method not allowed", method, uri);
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, HeaderValue::from_static("GET"))],
        )
            .into_response();
    }

    let host = headers.get(header::HOST).and_then(|h| h.to_str().ok());
    if !host.is_some_and(|h| state.is_own_host(h)) {
        tracing::warn!("Rejecting request for foreign host {:?}", host);
        return StatusCode::FORBIDDEN.into_response();
    }

    if uri.path() != "/" {
        return StatusCode::NOT_FOUND.into_response();
    }

    let id = match video_param(&uri).map(|v| VideoId::parse(&v)) {
        Some(Ok(id)) => id,
        _ => {
            tracing::debug!("Rejecting {}: missing or invalid video id", uri);
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                INVALID_VIDEO_ID,
            )
                .into_response();
        }
    };

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    response_headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );
    response_headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response_headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    if let Ok(origin) = HeaderValue::from_str(&state.origin()) {
        response_headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }

    tracing::debug!("Serving player page for {}", id);
    (StatusCode::OK, response_headers, page::render(&id, &state.player)).into_response()
}
