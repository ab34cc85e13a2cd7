//! Remote sync and playback driver for the relabel annotation viewer.
//!
//! This crate provides the asynchronous boundary around `relabel-core`:
//! - HTTP API client for the row listing and full-row updates
//! - WebSocket push listener (arrival-only invalidation signals)
//! - Refresh scheduler funneling poll ticks and push signals into one
//!   serialized fetch-and-replace loop
//! - rodio-backed audio driver for the playback state machine
//! - The [`Viewer`] facade the presentation layer talks to

pub mod api;
pub mod audio;
pub mod config;
mod push;
mod refresh;
pub mod viewer;

pub use api::ApiClient;
pub use audio::AudioPlayer;
pub use config::{ConfigError, ViewerConfig, BASE_URL_ENV};
pub use viewer::{Viewer, ViewerState};
