use std::sync::Arc;

use crate::relay::{player_url, Relay, RelayError};
use crate::video_id::{extract_video_id, VideoId};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("not a YouTube URL or video id: {0:?}")]
    InvalidInput(String),
    #[error("couldn't start player: {0}")]
    Relay(#[from] RelayError),
}

/// One player view. Many sessions share one long-lived [`Relay`]; closing a
/// session leaves the relay running for the next one.
pub struct PlayerSession {
    relay: Arc<Relay>,
    last_played: Option<VideoId>,
}

impl PlayerSession {
    pub fn new(relay: Arc<Relay>) -> Self {
        Self { relay, last_played: None }
    }

    /// Resolve user input to a playable relay URL.
    ///
    /// The id is validated here, before the relay is touched; the relay's own
    /// check is only a safety net. The relay is started on first use.
    pub async fn open(&mut self, input: &str) -> Result<String, SessionError> {
        let id = extract_video_id(input)
            .ok_or_else(|| SessionError::InvalidInput(input.trim().to_owned()))?;
        let url = self.play(&id).await?;
        Ok(url)
    }

    /// Playable relay URL for an already-validated id.
    pub async fn play(&mut self, id: &VideoId) -> Result<String, RelayError> {
        let port = self.relay.ensure_started().await?;
        let url = player_url(port, id);
        tracing::debug!("Session loading {} via {}", id, url);
        self.last_played = Some(id.clone());
        Ok(url)
    }

    pub fn last_played(&self) -> Option<&VideoId> {
        self.last_played.as_ref()
    }
}
