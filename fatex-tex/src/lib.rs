//! LaTeX macro synthesis and package emission for the fatex generator.
//!
//! Consumes an [`IconCatalog`](fatex_metadata::IconCatalog) and produces the
//! `fontawesome6.sty` document. It includes:
//!
//! - Control-sequence name sanitization with collision detection
//! - Per-style macro synthesis, pro-tier gating, and the dispatch table
//! - Deterministic rendering and atomic writing of the style file

pub mod emit;
pub mod error;
pub mod synth;

// Re-export main types for convenience
pub use emit::{EmitOptions, render_package, write_package};
pub use error::{EmitError, SynthError};
pub use synth::{DispatchEntry, MacroDefinition, Mode, Synthesis, synthesize};
