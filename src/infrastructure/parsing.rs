//! HTML parsing for announcement (detail) pages
//!
//! Pages are parsed into an owned [`Node`] tree and walked with structural
//! search; see [`AnnouncementParser`] for the label-driven extraction rules.

pub mod announcement_parser;
pub mod context;

pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use announcement_parser::AnnouncementParser;
pub use context::AnnouncementContext;

use crate::infrastructure::html_tree::Node;

/// Parser over an already-built document tree
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse the tree with contextual information
    fn parse_with_context(&self, root: &Node, context: &Self::Context) -> ParsingResult<Self::Output>;

    /// Parse raw HTML with contextual information
    fn parse_html(&self, html: &str, context: &Self::Context) -> ParsingResult<Self::Output> {
        let root = Node::parse_document(html);
        self.parse_with_context(&root, context)
    }
}
