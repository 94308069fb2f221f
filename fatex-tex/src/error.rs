//! Typed error variants for macro synthesis and package emission.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while synthesizing macro definitions from the catalog.
#[derive(Debug, Error)]
pub enum SynthError {
    /// Two different icon names sanitize to the same control-sequence name.
    ///
    /// Picking one silently would make the generated package depend on
    /// catalog order, so this is fatal and names both icons.
    #[error(
        "macro name collision: icons '{first}' and '{second}' both sanitize to '\\{macro_name}'"
    )]
    Collision {
        /// Icon that claimed the name first, in catalog order.
        first: String,
        /// Icon that collided with it.
        second: String,
        /// The contested control-sequence name, without backslash.
        macro_name: String,
    },
}

/// Errors produced while writing the rendered package to disk.
#[derive(Debug, Error)]
pub enum EmitError {
    /// The destination could not be written.
    ///
    /// The temp-and-rename write never leaves a partial file at the final
    /// path, so on this error the destination is untouched.
    #[error("failed to write style file '{path}': {source}")]
    Io {
        /// The destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
