use crate::http::page::PlayerOptions;

/// Shared state injected into the relay handler via axum::extract::State.
/// Fixed once the relay has bound its port; no per-request state is kept.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Port the relay listener is bound to. Host checks and CORS compare against it.
    pub port: u16,
    pub player: PlayerOptions,
}

impl AppState {
    pub fn new(port: u16, player: PlayerOptions) -> Self {
        Self { port, player }
    }

    /// `http://127.0.0.1:<port>`, the only origin that consumes relay pages.
    pub fn origin(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// True when `host` names this relay: `127.0.0.1:<port>` or `localhost:<port>`.
    pub fn is_own_host(&self, host: &str) -> bool {
        let Some((name, port)) = host.rsplit_once(':') else {
            return false;
        };
        let name_ok = name == "127.0.0.1" || name.eq_ignore_ascii_case("localhost");
        name_ok && port == self.port.to_string()
    }
}
