//! Client-level error taxonomy
//!
//! Transport failures, non-success statuses, missing session tokens and
//! malformed listing envelopes are fatal for the call that hit them.

use reqwest::StatusCode;
use thiserror::Error;

use super::parsing_error::ParsingError;
use super::session::TokenKind;

#[derive(Error, Debug)]
pub enum LpseError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The portal answered with a non-success status; the body is the message
    #[error("HTTP error {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("authenticity token ({0}) not found")]
    MissingToken(TokenKind),

    #[error("session cookie '{0}' not found in response")]
    MissingSessionCookie(String),

    #[error("client used before session initialization")]
    NotInitialized,

    #[error("malformed listing envelope: {0}")]
    Envelope(#[from] serde_json::Error),

    #[error("page size must be greater than zero")]
    InvalidPageSize,

    #[error(transparent)]
    Parsing(#[from] ParsingError),
}

impl LpseError {
    /// Whether the error came from the session handshake rather than a data call
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            Self::MissingToken(_) | Self::MissingSessionCookie(_) | Self::NotInitialized
        )
    }
}

pub type LpseResult<T> = Result<T, LpseError>;
