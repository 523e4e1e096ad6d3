//! Authenticity token extraction from the portal session cookie

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, SET_COOKIE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{LpseError, LpseResult};

/// Name of the cookie whose raw value carries both tokens
pub const SESSION_COOKIE: &str = "SPSE_SESSION";

static AUTHENTICITY_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"___AT=([a-zA-Z0-9_.-]*)").expect("valid regex"));
static TIMESTAMP_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"___TS=([a-zA-Z0-9_.-]*)").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Authenticity,
    Timestamp,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticity => write!(f, "1"),
            Self::Timestamp => write!(f, "2"),
        }
    }
}

/// The two session-bound values sent along with every data-table request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    /// `___AT` value, sent as `authenticityToken`
    pub authenticity_token: String,
    /// `___TS` value, sent as `_`
    pub timestamp_token: String,
}

impl AuthTokens {
    /// Extract both tokens from the raw `Set-Cookie` value of the session cookie
    pub fn from_cookie_value(raw: &str) -> LpseResult<Self> {
        let authenticity_token = capture(&AUTHENTICITY_TOKEN, raw)
            .ok_or(LpseError::MissingToken(TokenKind::Authenticity))?;
        let timestamp_token =
            capture(&TIMESTAMP_TOKEN, raw).ok_or(LpseError::MissingToken(TokenKind::Timestamp))?;

        Ok(Self {
            authenticity_token,
            timestamp_token,
        })
    }

    /// Find the session cookie among the response's `Set-Cookie` headers and extract its tokens
    pub fn from_headers(headers: &HeaderMap) -> LpseResult<Self> {
        let prefix = format!("{SESSION_COOKIE}=");
        let raw = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.trim_start().starts_with(&prefix))
            .ok_or_else(|| LpseError::MissingSessionCookie(SESSION_COOKIE.to_string()))?;

        debug!("Found {} cookie ({} bytes)", SESSION_COOKIE, raw.len());
        Self::from_cookie_value(raw)
    }
}

fn capture(pattern: &Regex, raw: &str) -> Option<String> {
    pattern
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|token| !token.is_empty())
}
