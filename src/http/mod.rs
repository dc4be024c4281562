pub mod page;
pub mod player;
pub mod state;

use axum::{
    http::{header, HeaderValue},
    Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use crate::http::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // One logical endpoint: every method and path lands in the player handler,
        // which applies the method/host/path/id checks in order.
        .fallback(player::serve_player)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
