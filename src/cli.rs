use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pixeltv",
    about = "Pixel TV loopback relay: serves YouTube embed pages on 127.0.0.1",
    long_about = None,
    version = env!("GIT_VERSION"),
)]
pub struct Args {
    /// YouTube URL or 11-character video id to print a playable relay URL for
    pub video: Option<String>,

    /// Path to TOML config file (overrides default search: ./pixeltv.toml, ~/.config/pixeltv/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Do not start playback automatically in served player pages
    #[arg(long)]
    pub no_autoplay: bool,

    /// Max milliseconds to wait for in-flight requests on shutdown [default: 1000]
    #[arg(long, value_name = "MS")]
    pub shutdown_timeout_ms: Option<u64>,
}
