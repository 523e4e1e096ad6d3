//! Parsing context for announcement pages

/// Context information for parsing one announcement page
#[derive(Debug, Clone, Default)]
pub struct AnnouncementContext {
    /// Package code the page belongs to
    pub code: String,

    /// Page URL, for log provenance
    pub url: Option<String>,
}

impl AnnouncementContext {
    /// Create new announcement context
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            url: None,
        }
    }

    /// Set the page URL
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }
}
