//! LPSE Scraper - tender listing client for Indonesian e-procurement portals
//!
//! Opens a session against an LPSE (SPSE 4) portal, pages through the tender
//! listing, and optionally enriches each package with its announcement page.

pub mod domain;
pub mod infrastructure;

pub use domain::{Category, ListingFilter, Package, Packages};
pub use infrastructure::{LpseClient, LpseError, LpseResult};
