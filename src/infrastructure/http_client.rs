//! HTTP client for the LPSE portal
//!
//! Replays the portal's own browser requests: a landing-page GET that sets the
//! session cookie and its authenticity tokens, the DataTables listing call,
//! and the per-tender announcement page. Responses are transparently
//! gzip-decoded and every call shares one cookie jar.

use async_trait::async_trait;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, REFERER, UPGRADE_INSECURE_REQUESTS,
};
use reqwest::{Client, ClientBuilder, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::domain::package::Package;
use crate::domain::pagination::{ListingEnvelope, ListingFilter, ListingQuery, ListingSource, Packages};
use crate::infrastructure::config::{PortalConfig, lpse};
use crate::infrastructure::cookie_jar::CookieJar;
use crate::infrastructure::error::{LpseError, LpseResult};
use crate::infrastructure::html_tree::Node;
use crate::infrastructure::parsing::{AnnouncementContext, AnnouncementParser, ContextualParser};
use crate::infrastructure::session::AuthTokens;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_JSON: &str = "application/json, text/javascript, */*; q=0.01";
const X_REQUESTED_WITH: &str = "X-Requested-With";

/// DataTables column count of the tender listing
const LISTING_COLUMNS: usize = 5;
/// Column that is neither searchable nor orderable
const UNSORTED_COLUMN: usize = 3;

/// Configuration for HTTP client behavior
#[derive(Debug, Clone, PartialEq)]
pub struct HttpClientConfig {
    /// Portal origin
    pub host: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Whether to follow redirects
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    /// Create HttpClientConfig from PortalConfig
    pub fn from_portal_config(portal: &PortalConfig) -> Self {
        Self {
            host: portal.host.trim_end_matches('/').to_string(),
            timeout_seconds: portal.request_timeout_seconds,
            user_agent: portal.user_agent.clone(),
            follow_redirects: true,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_portal_config(&PortalConfig::default())
    }
}

/// Session-bound client for one LPSE portal
#[derive(Debug, Clone)]
pub struct LpseClient {
    client: Client,
    config: HttpClientConfig,
    cookies: Arc<CookieJar>,
    tokens: Option<AuthTokens>,
    parser: AnnouncementParser,
}

impl LpseClient {
    /// Create a client with default configuration
    pub fn new() -> LpseResult<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a client with a fresh cookie jar
    pub fn with_config(config: HttpClientConfig) -> LpseResult<Self> {
        let cookies = Arc::new(CookieJar::for_host(&config.host));
        Self::with_cookie_jar(config, cookies)
    }

    /// Create a client sharing an existing cookie jar
    pub fn with_cookie_jar(config: HttpClientConfig, cookies: Arc<CookieJar>) -> LpseResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .cookie_provider(Arc::clone(&cookies))
            .gzip(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()?;

        Ok(Self {
            client,
            config,
            cookies,
            tokens: None,
            parser: AnnouncementParser::new(),
        })
    }

    pub fn from_portal_config(portal: &PortalConfig) -> LpseResult<Self> {
        Self::with_config(HttpClientConfig::from_portal_config(portal))
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    pub fn cookies(&self) -> &Arc<CookieJar> {
        &self.cookies
    }

    pub fn tokens(&self) -> Option<&AuthTokens> {
        self.tokens.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.tokens.is_some()
    }

    /// Absolute URL for a portal path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.host, path)
    }

    /// Open a session: load the tender page and keep the authenticity tokens
    /// carried by its session cookie
    pub async fn init(&mut self) -> LpseResult<&AuthTokens> {
        let url = self.url(lpse::TENDER_PAGE);
        info!("🌐 Opening LPSE session: {}", url);

        let response = self.client.get(&url).header(ACCEPT, ACCEPT_HTML).send().await?;
        let response = ensure_success(response, &url).await?;
        let tokens = AuthTokens::from_headers(response.headers())?;

        info!("✅ Session established ({} cookie(s) stored)", self.cookies.len());
        Ok(&*self.tokens.insert(tokens))
    }

    /// Fetch one page of the tender listing
    pub async fn fetch_listing(&self, query: &ListingQuery) -> LpseResult<ListingEnvelope> {
        let tokens = self.tokens.as_ref().ok_or(LpseError::NotInitialized)?;
        let url = self.url(lpse::TENDER_DATA_TABLE);
        debug!("🌐 HTTP GET listing draw={} start={} length={}", query.draw, query.start, query.length);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, ACCEPT_JSON)
            .header(X_REQUESTED_WITH, "XMLHttpRequest")
            .query(&listing_params(tokens, query))
            .send()
            .await?;
        let response = ensure_success(response, &url).await?;

        let body = response.bytes().await?;
        let envelope: ListingEnvelope = serde_json::from_slice(&body)?;
        debug!(
            "Listing envelope: {} rows, {} filtered of {}",
            envelope.data.len(),
            envelope.records_filtered,
            envelope.records_total
        );
        Ok(envelope)
    }

    /// Fetch the announcement page of `package` and merge its fields in place
    pub async fn announcement(&self, package: &mut Package) -> LpseResult<()> {
        let url = self.url(&lpse::announcement_path(&package.code));
        info!("🌐 HTTP GET announcement: {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, ACCEPT_HTML)
            .header(REFERER, format!("{}/", self.config.host))
            .send()
            .await?;
        let response = ensure_success(response, &url).await?;
        let body = response.bytes().await?;

        let context = AnnouncementContext::new(&package.code).with_url(&url);
        let root = Node::parse_bytes(&body);
        let details = self.parser.parse_with_context(&root, &context)?;
        package.apply_details(details);
        Ok(())
    }

    /// Paginated listing driven by this client
    pub fn packages(&self, page_size: u32, filter: ListingFilter) -> LpseResult<Packages<LpseClient>> {
        Packages::new(self.clone(), page_size, filter)
    }
}

#[async_trait]
impl ListingSource for LpseClient {
    fn host(&self) -> &str {
        &self.config.host
    }

    async fn fetch_listing(&self, query: &ListingQuery) -> LpseResult<ListingEnvelope> {
        LpseClient::fetch_listing(self, query).await
    }
}

/// Query parameters of a DataTables listing request, in request order
pub fn listing_params(tokens: &AuthTokens, query: &ListingQuery) -> Vec<(String, String)> {
    let mut params = Vec::new();

    for column in 0..LISTING_COLUMNS {
        let flag = (column != UNSORTED_COLUMN).to_string();
        params.push((format!("columns[{column}][data]"), column.to_string()));
        params.push((format!("columns[{column}][name]"), String::new()));
        params.push((format!("columns[{column}][searchable]"), flag.clone()));
        params.push((format!("columns[{column}][orderable]"), flag));
        params.push((format!("columns[{column}][search][value]"), String::new()));
        params.push((format!("columns[{column}][search][regex]"), "false".to_string()));
    }
    params.push(("order[0][column]".to_string(), "0".to_string()));
    params.push(("order[0][dir]".to_string(), "desc".to_string()));
    params.push(("search[regex]".to_string(), "false".to_string()));

    params.push(("authenticityToken".to_string(), tokens.authenticity_token.clone()));
    params.push(("_".to_string(), tokens.timestamp_token.clone()));
    params.push(("draw".to_string(), query.draw.to_string()));
    params.push(("start".to_string(), query.start.to_string()));
    params.push(("length".to_string(), query.length.to_string()));

    let filter = &query.filter;
    if let Some(agency) = filter.agency.as_deref().filter(|s| !s.is_empty()) {
        params.push(("rkn_nama".to_string(), agency.to_string()));
    }
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        params.push(("search[value]".to_string(), search.to_string()));
    }
    if let Some(category) = filter.category {
        params.push(("kategori".to_string(), category.as_query_value().to_string()));
    }

    params
}

/// Pass successful responses through; anything else becomes an error carrying the body
async fn ensure_success(response: Response, url: &str) -> LpseResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    error!("❌ HTTP error {}: {}", status, url);
    let body = response.text().await.unwrap_or_default();
    Err(LpseError::Status { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;

    fn tokens() -> AuthTokens {
        AuthTokens {
            authenticity_token: "at123".to_string(),
            timestamp_token: "ts456".to_string(),
        }
    }

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_custom_config() {
        let config = HttpClientConfig {
            host: "https://lpse.example.go.id".to_string(),
            timeout_seconds: 10,
            user_agent: "Test Agent".to_string(),
            follow_redirects: false,
        };

        let client = LpseClient::with_config(config).unwrap();
        assert!(!client.is_initialized());
        assert_eq!(client.url("/eproc4/lelang"), "https://lpse.example.go.id/eproc4/lelang");
        assert_eq!(client.cookies().host(), Some("lpse.example.go.id"));
    }

    #[test]
    fn test_host_trailing_slash_is_trimmed() {
        let portal = PortalConfig {
            host: "https://lpse.pu.go.id/".to_string(),
            ..PortalConfig::default()
        };
        assert_eq!(HttpClientConfig::from_portal_config(&portal).host, "https://lpse.pu.go.id");
    }

    #[test]
    fn test_listing_params_carry_paging_and_tokens() {
        let query = ListingQuery::for_page(2, 25, ListingFilter::default());
        let params = listing_params(&tokens(), &query);

        assert_eq!(param(&params, "authenticityToken"), Some("at123"));
        assert_eq!(param(&params, "_"), Some("ts456"));
        assert_eq!(param(&params, "draw"), Some("2"));
        assert_eq!(param(&params, "start"), Some("25"));
        assert_eq!(param(&params, "length"), Some("25"));
        assert_eq!(param(&params, "columns[3][orderable]"), Some("false"));
        assert_eq!(param(&params, "columns[4][searchable]"), Some("true"));
        assert_eq!(param(&params, "order[0][dir]"), Some("desc"));
        assert_eq!(param(&params, "rkn_nama"), None);
        assert_eq!(param(&params, "kategori"), None);
    }

    #[test]
    fn test_listing_params_include_filters() {
        let filter = ListingFilter {
            agency: Some("Kementerian PUPR".to_string()),
            search: Some("jembatan".to_string()),
            category: Some(Category::Construction),
        };
        let params = listing_params(&tokens(), &ListingQuery::for_page(1, 10, filter));

        assert_eq!(param(&params, "rkn_nama"), Some("Kementerian PUPR"));
        assert_eq!(param(&params, "search[value]"), Some("jembatan"));
        assert_eq!(param(&params, "kategori"), Some("PEKERJAAN_KONSTRUKSI"));
    }

    #[tokio::test]
    async fn test_fetch_before_init_is_rejected() {
        let client = LpseClient::new().unwrap();
        let query = ListingQuery::for_page(1, 10, ListingFilter::default());
        let err = client.fetch_listing(&query).await.unwrap_err();
        assert!(matches!(err, LpseError::NotInitialized));
    }

    #[tokio::test]
    async fn test_pagination_surfaces_uninitialized_error() {
        let client = LpseClient::new().unwrap();
        let mut packages = client.packages(10, ListingFilter::default()).unwrap();
        assert!(!packages.next().await);
        assert!(matches!(packages.error, Some(LpseError::NotInitialized)));
    }
}
