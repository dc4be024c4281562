//! Pixel TV loopback relay: serve YouTube embed pages from 127.0.0.1 so a
//! webview whose origin the embed player rejects can still play videos.

pub mod cli;
pub mod config;
pub mod http;
pub mod relay;
pub mod session;
pub mod video_id;
