use html_escape::encode_double_quoted_attribute;

use crate::video_id::VideoId;

/// Origin of the privacy-enhanced embed player. The only frame source the page allows.
pub const EMBED_ORIGIN: &str = "https://www.youtube-nocookie.com";

/// Player flags fixed for the lifetime of a relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerOptions {
    pub autoplay: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self { autoplay: true }
    }
}

/// Embed URL for `id`: autoplay per `options`, related videos and branding minimized.
pub fn embed_url(id: &VideoId, options: &PlayerOptions) -> String {
    format!(
        "{}/embed/{}?autoplay={}&rel=0&modestbranding=1&playsinline=1",
        EMBED_ORIGIN,
        urlencoding::encode(id.as_str()),
        u8::from(options.autoplay),
    )
}

/// Render the full-bleed player page for `id`.
///
/// Pure and deterministic: the same id and options always give byte-identical output.
/// The id is percent-encoded into the URL and the URL is attribute-escaped, even though
/// `VideoId` already guarantees a safe alphabet.
pub fn render(id: &VideoId, options: &PlayerOptions) -> String {
    let src = embed_url(id, options);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Pixel TV</title>
<style>
html, body {{ margin: 0; padding: 0; width: 100%; height: 100%; overflow: hidden; background: #000; }}
iframe {{ position: absolute; inset: 0; width: 100%; height: 100%; border: 0; }}
</style>
</head>
<body>
<iframe src="{}" allow="autoplay; encrypted-media; picture-in-picture; fullscreen" referrerpolicy="strict-origin-when-cross-origin" allowfullscreen></iframe>
</body>
</html>
"#,
        encode_double_quoted_attribute(&src)
    )
}
