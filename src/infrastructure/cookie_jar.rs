//! Shared cookie accumulator
//!
//! Keeps the latest value per cookie name behind a single lock and plugs into
//! `reqwest` as its cookie provider, so the session handshake and every later
//! fetch see the same cookie set.

use std::collections::BTreeMap;
use std::sync::Mutex;

use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: Mutex<BTreeMap<String, String>>,
    /// Only requests to this host get the cookies; `None` sends them everywhere
    host: Option<String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jar whose cookies are only sent back to the host of `origin`
    pub fn for_host(origin: &str) -> Self {
        let host = Url::parse(origin)
            .ok()
            .and_then(|url| url.host_str().map(ToString::to_string));
        if host.is_none() {
            warn!("Cannot read a host from {:?}, cookies will not be scoped", origin);
        }

        Self {
            cookies: Mutex::default(),
            host,
        }
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Merge `name=value` pairs. The latest non-empty value wins per name; an
    /// empty value only registers a name that was not seen before.
    pub fn merge<I, N, V>(&self, pairs: I)
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let Ok(mut cookies) = self.cookies.lock() else {
            warn!("Cookie jar lock poisoned, dropping cookie update");
            return;
        };

        for (name, value) in pairs {
            let name = name.into();
            let value = value.into();
            match cookies.get_mut(&name) {
                Some(existing) if !value.is_empty() => *existing = value,
                Some(_) => {}
                None => {
                    cookies.insert(name, value);
                }
            }
        }
    }

    /// Merge raw `Set-Cookie` header values
    pub fn merge_set_cookie<'a>(&self, headers: impl IntoIterator<Item = &'a str>) {
        self.merge(headers.into_iter().filter_map(parse_set_cookie));
    }

    /// Latest value stored for `name`
    pub fn get(&self, name: &str) -> Option<String> {
        self.cookies.lock().ok()?.get(name).cloned()
    }

    /// Snapshot of every stored cookie, ordered by name
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.cookies
            .lock()
            .map(|cookies| {
                cookies
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.cookies.lock().map(|cookies| cookies.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `Cookie` request header value for the current set
    pub fn header_value(&self) -> Option<String> {
        let pairs = self.snapshot();
        if pairs.is_empty() {
            return None;
        }

        Some(
            pairs
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Split the leading `name=value` pair off a `Set-Cookie` header value
fn parse_set_cookie(raw: &str) -> Option<(String, String)> {
    let pair = raw.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    Some((name.to_string(), value.trim().to_string()))
}

impl CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let headers: Vec<&str> = cookie_headers
            .filter_map(|value| value.to_str().ok())
            .collect();
        debug!("Storing {} cookie(s) from {}", headers.len(), url);
        self.merge_set_cookie(headers);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        if self.host.as_deref().is_some_and(|host| url.host_str() != Some(host)) {
            debug!("Withholding cookies from foreign host {}", url);
            return None;
        }

        self.header_value()
            .and_then(|value| HeaderValue::from_str(&value).ok())
    }
}
