//! Domain module - LPSE tender listing model
//!
//! Listing rows as the portal returns them, the normalized package record,
//! announcement details, and the pagination controller that walks the listing.
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod category;
pub mod listing_row;
pub mod package;
pub mod pagination;
pub mod value_objects;

// Re-export commonly used items for convenience
pub use category::Category;
pub use listing_row::ListingRow;
pub use package::{AnnouncementDetails, Package};
pub use pagination::{ListingEnvelope, ListingFilter, ListingQuery, ListingSource, Packages};
pub use value_objects::Date;
