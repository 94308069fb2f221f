//! Generation pipeline entry point.
//!
//! Ties the pieces together in a single synchronous pass:
//! validate source → load catalog → synthesize macros → emit style file →
//! assemble bundle. Configuration is an explicit value, not process state.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use fatex_metadata::IconCatalog;
use fatex_tex::{EmitOptions, Mode, render_package, synthesize, write_package};

use crate::bundle;

/// One generation run's configuration.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Extracted FontAwesome distribution directory.
    pub source_dir: PathBuf,
    /// Directory the package bundle is written into.
    pub output_dir: PathBuf,
    /// Free or pro tier.
    pub mode: Mode,
    /// Name of the emitted style file.
    pub style_file: String,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Icons present in the emitted catalog (after tier gating).
    pub icons: usize,
    /// Macros emitted (one per icon/style pair).
    pub macros: usize,
    /// Bundle files copied alongside the style file.
    pub copied: usize,
    /// Where the style file landed.
    pub style_path: PathBuf,
}

/// Run the full pipeline for one configuration.
///
/// Fails fast on the first structural error; on failure no style file or
/// manifest is left at the destination in a state that looks complete.
pub fn run(config: &BuildConfig) -> Result<BuildReport> {
    bundle::validate_source(&config.source_dir)?;

    let metadata_path = config.source_dir.join("metadata").join("icons.json");
    let catalog = IconCatalog::load(&metadata_path)?;

    let synthesis = synthesize(&catalog, config.mode)?;

    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("failed to create '{}'", config.output_dir.display()))?;

    let style_file = normalized_style_file(&config.style_file);
    let style_path = config.output_dir.join(&style_file);
    let options = EmitOptions {
        fa_version: bundle::read_version(&config.source_dir),
        ..EmitOptions::default()
    };
    let text = render_package(&synthesis, config.mode, &options);
    write_package(&text, &style_path)?;

    let manifest = bundle::assemble(
        &config.source_dir,
        &config.output_dir,
        &style_file,
        options.fa_version.clone(),
    )?;

    Ok(BuildReport {
        icons: synthesis.dispatch.len(),
        macros: synthesis.macros.len(),
        // The manifest also lists the style file itself.
        copied: manifest.files.len().saturating_sub(1),
        style_path,
    })
}

/// Ensure the configured style-file name carries the `.sty` extension.
fn normalized_style_file(name: &str) -> String {
    if name.ends_with(".sty") {
        name.to_string()
    } else {
        format!("{name}.sty")
    }
}
