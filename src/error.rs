//! Error types

use thiserror::Error;

/// Errors surfaced while wiring or running the card
#[derive(Error, Debug)]
pub enum CardError {
    /// Expected markup is absent; initialization cannot continue.
    #[error("missing element for selector `{0}`")]
    MissingElement(&'static str),

    /// The embedded JSON configuration did not parse.
    #[error("invalid card configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The media element refused to play or pause.
    #[error("media playback failed: {0}")]
    Media(String),

    /// A browser API threw.
    #[error("javascript error: {0}")]
    Js(String),
}

pub type Result<T> = std::result::Result<T, CardError>;
