//! Icon metadata loading for the fatex generator.
//!
//! This crate reads the `metadata/icons.json` file shipped inside the
//! FontAwesome 6 desktop distribution and normalizes it into an
//! order-preserving [`IconCatalog`]. It includes:
//!
//! - Icon record types and the style-tag enumeration
//! - Catalog loading with duplicate-key and codepoint-collision detection
//! - Typed error variants for every rejected input shape

pub mod catalog;
pub mod error;
pub mod style;

// Re-export main types for convenience
pub use catalog::{IconCatalog, IconRecord};
pub use error::MetadataError;
pub use style::Style;
