use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Exactly 11 characters from the URL-safe alphabet YouTube uses for video ids.
static VIDEO_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id pattern compiles"));

/// Path prefixes that carry the id as the following segment, e.g. `/embed/<id>`.
const ID_PATH_PREFIXES: &[&str] = &["embed", "shorts", "live", "v"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid video id")]
pub struct InvalidVideoId;

/// A validated YouTube video identifier.
///
/// The only way to obtain one is through [`VideoId::parse`] (or [`extract_video_id`]),
/// so holding a `VideoId` means the value matches `^[A-Za-z0-9_-]{11}$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn parse(candidate: &str) -> Result<Self, InvalidVideoId> {
        if is_valid_video_id(candidate) {
            Ok(Self(candidate.to_owned()))
        } else {
            Err(InvalidVideoId)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for VideoId {
    type Err = InvalidVideoId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Returns true iff `candidate` is exactly 11 characters of `[A-Za-z0-9_-]`.
pub fn is_valid_video_id(candidate: &str) -> bool {
    candidate.len() == 11 && VIDEO_ID_RE.is_match(candidate)
}

/// Pull a video id out of whatever the user typed: a bare id, a watch URL,
/// a `youtu.be` short link, or an embed/shorts/live URL.
///
/// Returns `None` unless the candidate found validates as a [`VideoId`].
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(id) = VideoId::parse(input) {
        return Some(id);
    }

    let url = Url::parse(input).ok()?;

    if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
        return VideoId::parse(&v).ok();
    }

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    if url.host_str().is_some_and(|h| h.eq_ignore_ascii_case("youtu.be")) {
        return segments.next().and_then(|s| VideoId::parse(s).ok());
    }

    while let Some(segment) = segments.next() {
        if ID_PATH_PREFIXES.contains(&segment) {
            return segments.next().and_then(|s| VideoId::parse(s).ok());
        }
    }
    None
}
