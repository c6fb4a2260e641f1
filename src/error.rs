/// Error types for the copy workflow and favicon pipeline
use thiserror::Error;

/// Reasons a copy invocation is aborted.
///
/// Every variant is terminal for the current activation; nothing is
/// written to the clipboard once one of these is raised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CopyError {
    #[error("no active tab to copy from")]
    NoActiveTab,

    #[error("unable to determine current window")]
    NoWindow,

    #[error("failed to query tabs for the window: {0}")]
    TabQuery(String),

    #[error("no tabs with URLs available to copy")]
    EmptyInput,

    #[error("clipboard API is unavailable in this page")]
    ClipboardUnavailable,

    #[error("failed to write tab list to clipboard: {0}")]
    ClipboardWrite(String),
}

/// Why a single favicon candidate was skipped.
///
/// These never leave the resolver; they only feed debug logging.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IconError {
    #[error("malformed data URI")]
    InvalidDataUri,

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("empty response body")]
    EmptyBody,

    #[error("could not decode image: {0}")]
    Decode(String),

    #[error("could not encode PNG: {0}")]
    Encode(String),
}
