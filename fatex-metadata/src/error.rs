//! Typed error variants for icon metadata loading.
//!
//! These are produced by [`IconCatalog::load`](crate::IconCatalog::load) and
//! friends so callers at the crate boundary can match on specific failure
//! modes instead of opaque strings. Every variant is fatal to a generation
//! run: the catalog is either loaded completely and consistently, or not at
//! all.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or normalizing the vendor metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The metadata file could not be read from disk.
    #[error("failed to read icon metadata '{path}': {source}")]
    Read {
        /// Path to the metadata file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The metadata file is not valid JSON, or a record is missing a
    /// required field (`unicode`, `styles`).
    #[error("malformed icon metadata: {source}")]
    Parse {
        /// Underlying JSON error, including the line/column of the defect.
        #[source]
        source: serde_json::Error,
    },

    /// The same icon name appears more than once in the metadata source.
    ///
    /// Duplicate keys would otherwise be resolved last-write-wins by a
    /// plain map deserialization, silently masking a vendor data error.
    #[error("duplicate icon name '{name}' in metadata")]
    DuplicateIcon {
        /// The icon name that appeared twice (after normalization).
        name: String,
    },

    /// An icon name normalized to the empty string.
    #[error("icon with empty name in metadata")]
    EmptyName,

    /// An icon carries a style tag outside the known set.
    ///
    /// Unknown tags indicate a FontAwesome version mismatch the generator
    /// must surface rather than mask by dropping the tag.
    #[error("icon '{icon}' has unrecognized style tag '{style}'")]
    UnknownStyle {
        /// The icon carrying the bad tag.
        icon: String,
        /// The unrecognized tag, verbatim.
        style: String,
    },

    /// An icon declares no styles at all.
    #[error("icon '{icon}' declares no styles")]
    NoStyles {
        /// The offending icon name.
        icon: String,
    },

    /// The `unicode` field could not be parsed as a codepoint.
    #[error("icon '{icon}' has invalid unicode value '{value}'")]
    BadCodepoint {
        /// The offending icon name.
        icon: String,
        /// The raw field value, verbatim.
        value: String,
    },

    /// Two icons within the same style share a codepoint.
    #[error(
        "codepoint U+{codepoint:04X} in style '{style}' is claimed by both '{first}' and '{second}'"
    )]
    CodepointCollision {
        /// The style in which the collision occurred.
        style: String,
        /// The shared codepoint.
        codepoint: u32,
        /// The icon that claimed the codepoint first, in catalog order.
        first: String,
        /// The icon that claimed it second.
        second: String,
    },
}
