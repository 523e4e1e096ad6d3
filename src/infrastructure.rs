//! Infrastructure layer for portal access, HTML parsing, and ambient services
//!
//! This module provides the HTTP session client, cookie and token handling,
//! the owned HTML tree with structural search, announcement parsing,
//! configuration, and logging.

pub mod config; // Configuration file and portal endpoints
pub mod cookie_jar;
pub mod error;
pub mod html_tree;
pub mod http_client;
pub mod logging; // Logging infrastructure
pub mod parsing; // Announcement page parsing
pub mod parsing_error;
pub mod session;

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager, LoggingConfig, PortalConfig, lpse};
pub use cookie_jar::CookieJar;
pub use error::{LpseError, LpseResult};
pub use html_tree::{MatchSpec, Node, NodeKind};
pub use http_client::{HttpClientConfig, LpseClient};
pub use logging::init_logging_with_config;
pub use parsing::{AnnouncementContext, AnnouncementParser, ContextualParser, ParsingError, ParsingResult};
pub use session::AuthTokens;
