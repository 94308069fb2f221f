//! Package emission: rendering and writing the `.sty` document.
//!
//! Rendering is pure string building over the synthesis output, so the
//! result is byte-identical for identical input. Writing goes through a
//! sibling temp file and an atomic rename, the same pattern the rest of the
//! pipeline uses for the bundle manifest: a failed run never leaves a
//! partial file that looks complete.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use fatex_metadata::Style;

use crate::error::EmitError;
use crate::synth::{Mode, Synthesis};

/// Fixed \ProvidesPackage release tag. Never derived from the clock; a
/// regenerated file must be byte-identical for identical input.
const PROVIDES_TAG: &str = "2025/06/01 v1.0 FontAwesome 6 icon macros";

/// Knobs for the rendered package.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// LaTeX package name (`\usepackage{<name>}`), without extension.
    pub package_name: String,
    /// FontAwesome distribution version, recorded in the header comment
    /// when known.
    pub fa_version: Option<String>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            package_name: "fontawesome6".to_string(),
            fa_version: None,
        }
    }
}

/// The font-selection macro for a style, as written into macro bodies.
const fn family_macro(style: Style) -> &'static str {
    match style {
        Style::Solid => r"\FASolid",
        Style::Regular => r"\FARegular",
        Style::Light => r"\FALight",
        Style::Thin => r"\FAThin",
        Style::Brands => r"\FABrands",
        Style::Duotone => r"\FADuotone",
    }
}

/// The `\newfontfamily` declaration block for a style.
///
/// Solid and regular ship both a free and a pro face, switched on the `pro`
/// package option; the remaining styles have a single face.
fn family_declaration(style: Style) -> String {
    match style {
        Style::Solid => format!(
            "\\iffa@pro\n  \\newfontfamily{}{{Font Awesome 6 Pro Solid}}\n\\else\n  \\newfontfamily{}{{Font Awesome 6 Free Solid}}\n\\fi\n",
            family_macro(style),
            family_macro(style)
        ),
        Style::Regular => format!(
            "\\iffa@pro\n  \\newfontfamily{}{{Font Awesome 6 Pro Regular}}\n\\else\n  \\newfontfamily{}{{Font Awesome 6 Free Regular}}\n\\fi\n",
            family_macro(style),
            family_macro(style)
        ),
        Style::Light => format!(
            "\\newfontfamily{}{{Font Awesome 6 Pro Light}}\n",
            family_macro(style)
        ),
        Style::Thin => format!(
            "\\newfontfamily{}{{Font Awesome 6 Pro Thin}}\n",
            family_macro(style)
        ),
        Style::Brands => format!(
            "\\newfontfamily{}{{Font Awesome 6 Brands}}\n",
            family_macro(style)
        ),
        Style::Duotone => format!(
            "\\newfontfamily{}{{Font Awesome 6 Duotone Solid}}\n",
            family_macro(style)
        ),
    }
}

/// Render the complete style-file text for a synthesis pass.
///
/// Output structure, in order: header comment block, `\ProvidesPackage`
/// lines, option handling, font-family declarations for the styles actually
/// used, per-icon macro definitions in catalog order, the dispatch macro,
/// `\endinput`. All iteration is over ordered containers, so the result is
/// deterministic.
pub fn render_package(synthesis: &Synthesis, mode: Mode, options: &EmitOptions) -> String {
    let mut out = String::new();
    let name = options.package_name.as_str();

    // --- header comment block ---
    let _ = writeln!(out, "%% {name}.sty");
    out.push_str("%% FontAwesome 6 icon macros for XeLaTeX and LuaLaTeX.\n");
    match &options.fa_version {
        Some(version) => {
            let _ = writeln!(
                out,
                "%% Generated from the FontAwesome {version} desktop distribution metadata."
            );
        }
        None => out
            .push_str("%% Generated from the FontAwesome desktop distribution metadata.\n"),
    }
    out.push_str("%% Regenerate with fatex instead of editing this file by hand.\n");
    out.push_str("%%\n");
    out.push_str(
        "%% This file may be distributed and/or modified under the conditions of\n\
         %% the LaTeX Project Public License, either version 1.3 of this license\n\
         %% or (at your option) any later version.\n",
    );
    if !mode.is_pro() {
        out.push_str(
            "%%\n%% Free build: pro-only icons are omitted; requesting one raises a\n\
             %% package error.\n",
        );
    }
    let _ = writeln!(out, "\\NeedsTeXFormat{{LaTeX2e}}");
    let _ = writeln!(out, "\\ProvidesPackage{{{name}}}[{PROVIDES_TAG}]");
    out.push('\n');

    // --- option handling ---
    out.push_str("\\newif\\iffa@pro\n");
    out.push_str("\\fa@profalse\n");
    out.push_str("\\DeclareOption{pro}{\\fa@protrue}\n");
    let _ = writeln!(
        out,
        "\\DeclareOption*{{\\PackageWarning{{{name}}}{{Unknown option '\\CurrentOption'}}}}"
    );
    out.push_str("\\ProcessOptions\\relax\n");
    out.push('\n');

    // --- font families, only for styles an emitted macro selects ---
    out.push_str("\\RequirePackage{fontspec}\n");
    for &style in &synthesis.styles_used {
        out.push_str(&family_declaration(style));
    }
    out.push('\n');

    // --- icon macros, catalog order ---
    let by_name: HashMap<&str, &crate::synth::MacroDefinition> = synthesis
        .macros
        .iter()
        .map(|def| (def.macro_name.as_str(), def))
        .collect();
    for entry in &synthesis.dispatch {
        for (style, macro_name) in &entry.targets {
            let def = by_name[macro_name.as_str()];
            let mut comment = format!("U+{:04X}", def.codepoint);
            if !def.label.is_empty() {
                let _ = write!(comment, ": {}", def.label);
            }
            if let Some(term) = &def.search_term {
                let _ = write!(comment, " [{term}]");
            }
            let _ = writeln!(
                out,
                "\\newcommand*{{\\{macro_name}}}{{{{{}\\symbol{{\"{:04X}}}}}}} % {comment}",
                family_macro(*style),
                def.codepoint
            );
            let _ = writeln!(
                out,
                "\\expandafter\\def\\csname faicon@{}@{}\\endcsname{{\\{macro_name}}}",
                entry.icon_name, style
            );
        }
        // Default alias: the icon's highest-priority style.
        let (_, default_macro) = &entry.targets[0];
        let _ = writeln!(
            out,
            "\\expandafter\\def\\csname faicon@{}\\endcsname{{\\{default_macro}}}",
            entry.icon_name
        );
    }
    out.push('\n');

    // --- dispatch macro, defined last so it only references known names ---
    out.push_str("\\newcommand*{\\faIcon}[2][]{%\n");
    out.push_str("  \\if\\relax\\detokenize{#1}\\relax\n");
    out.push_str("    \\ifcsname faicon@#2\\endcsname\n");
    out.push_str("      \\csname faicon@#2\\endcsname\n");
    out.push_str("    \\else\n");
    let _ = writeln!(
        out,
        "      \\PackageError{{{name}}}{{Unknown icon name '#2'}}{{The icon is not"
    );
    out.push_str("        part of the active catalog. Pro-only icons require a package\n");
    out.push_str("        generated in pro mode.}%\n");
    out.push_str("    \\fi\n");
    out.push_str("  \\else\n");
    out.push_str("    \\ifcsname faicon@#2@#1\\endcsname\n");
    out.push_str("      \\csname faicon@#2@#1\\endcsname\n");
    out.push_str("    \\else\n");
    let _ = writeln!(
        out,
        "      \\PackageError{{{name}}}{{Icon '#2' has no style '#1'}}{{Styles are"
    );
    out.push_str("        solid, regular, light, thin, brands and duotone, restricted\n");
    out.push_str("        to the styles this icon ships with.}%\n");
    out.push_str("    \\fi\n");
    out.push_str("  \\fi\n");
    out.push_str("}\n");
    out.push('\n');
    out.push_str("\\endinput\n");

    out
}

/// Write rendered package text to `path` via a sibling temp file and an
/// atomic rename.
///
/// # Errors
///
/// Returns [`EmitError::Io`] if the temp file cannot be written or the
/// rename fails; in both cases the temp file is cleaned up and nothing is
/// left at `path`.
pub fn write_package(text: &str, path: &Path) -> Result<(), EmitError> {
    let mut tmp_name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("package.sty"));
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, text).map_err(|source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    fs::rename(&tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        EmitError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    log::info!("wrote style file {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::synthesize;
    use fatex_metadata::IconCatalog;

    fn render(json: &str, mode: Mode) -> String {
        let catalog = IconCatalog::from_json(json).unwrap();
        let synthesis = synthesize(&catalog, mode).unwrap();
        render_package(&synthesis, mode, &EmitOptions::default())
    }

    const ADDRESS_BOOK: &str = r#"{
        "address-book": {
            "label": "Address Book",
            "unicode": "f2b9",
            "styles": ["solid"],
            "free": true
        }
    }"#;

    #[test]
    fn test_renders_macro_with_codepoint_and_family() {
        let text = render(ADDRESS_BOOK, Mode::Free);
        assert!(
            text.contains(
                "\\newcommand*{\\faAddressBook}{{\\FASolid\\symbol{\"F2B9}}} % U+F2B9: Address Book"
            ),
            "macro line missing:\n{text}"
        );
        assert!(
            text.contains("\\expandafter\\def\\csname faicon@address-book\\endcsname{\\faAddressBook}")
        );
        assert!(
            text.contains(
                "\\expandafter\\def\\csname faicon@address-book@solid\\endcsname{\\faAddressBook}"
            )
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let first = render(ADDRESS_BOOK, Mode::Free);
        let second = render(ADDRESS_BOOK, Mode::Free);
        assert_eq!(first, second);
    }

    #[test]
    fn test_structure_ordering() {
        let text = render(ADDRESS_BOOK, Mode::Free);
        let provides = text.find("\\ProvidesPackage{fontawesome6}").unwrap();
        let options = text.find("\\DeclareOption{pro}").unwrap();
        let fontspec = text.find("\\RequirePackage{fontspec}").unwrap();
        let family = text.find("\\newfontfamily\\FASolid").unwrap();
        let icon = text.find("\\faAddressBook").unwrap();
        let dispatch = text.find("\\newcommand*{\\faIcon}").unwrap();
        let endinput = text.find("\\endinput").unwrap();
        assert!(provides < options);
        assert!(options < fontspec);
        assert!(fontspec < family);
        assert!(family < icon);
        assert!(icon < dispatch, "dispatch macro must come last");
        assert!(dispatch < endinput);
    }

    #[test]
    fn test_unused_families_are_not_declared() {
        let text = render(ADDRESS_BOOK, Mode::Free);
        assert!(text.contains("\\newfontfamily\\FASolid"));
        assert!(!text.contains("\\newfontfamily\\FABrands"));
        assert!(!text.contains("\\newfontfamily\\FARegular"));
    }

    #[test]
    fn test_brands_family_declared_when_used() {
        let text = render(
            r#"{"apple": {"unicode": "f179", "styles": ["brands"], "free": true}}"#,
            Mode::Free,
        );
        assert!(text.contains("\\newfontfamily\\FABrands{Font Awesome 6 Brands}"));
    }

    #[test]
    fn test_free_mode_omits_pro_icon() {
        let json = r#"{
            "address-book": {"unicode": "f2b9", "styles": ["solid"], "free": true},
            "alarm-clock":  {"unicode": "f34e", "styles": ["solid"], "free": false}
        }"#;
        let free = render(json, Mode::Free);
        assert!(free.contains("faAddressBook"));
        assert!(!free.contains("faAlarmClock"));
        assert!(!free.contains("faicon@alarm-clock"));

        let pro = render(json, Mode::Pro);
        assert!(pro.contains("\\newcommand*{\\faAlarmClock}{{\\FASolid\\symbol{\"F34E}}}"));
    }

    #[test]
    fn test_multi_style_default_alias_points_at_solid() {
        let text = render(
            r#"{"bell": {"unicode": "f0f3", "styles": ["regular", "solid"], "free": true}}"#,
            Mode::Free,
        );
        assert!(
            text.contains("\\expandafter\\def\\csname faicon@bell\\endcsname{\\faBellSolid}")
        );
        assert!(
            text.contains("\\expandafter\\def\\csname faicon@bell@regular\\endcsname{\\faBellRegular}")
        );
    }

    #[test]
    fn test_codepoint_zero_padded_uppercase() {
        let text = render(
            r#"{"tiny": {"unicode": "2b", "styles": ["solid"], "free": true}}"#,
            Mode::Free,
        );
        assert!(text.contains("\\symbol{\"002B}"), "padding missing:\n{text}");
    }

    #[test]
    fn test_dispatch_macro_error_path_present() {
        let text = render(ADDRESS_BOOK, Mode::Free);
        assert!(text.contains("\\PackageError{fontawesome6}{Unknown icon name '#2'}"));
        assert!(text.contains("\\PackageError{fontawesome6}{Icon '#2' has no style '#1'}"));
    }

    #[test]
    fn test_fa_version_recorded_in_header() {
        let catalog = IconCatalog::from_json(ADDRESS_BOOK).unwrap();
        let synthesis = synthesize(&catalog, Mode::Free).unwrap();
        let options = EmitOptions {
            fa_version: Some("6.7.2".to_string()),
            ..EmitOptions::default()
        };
        let text = render_package(&synthesis, Mode::Free, &options);
        assert!(text.contains("FontAwesome 6.7.2 desktop distribution"));
    }

    #[test]
    fn test_write_package_atomic() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fontawesome6.sty");
        write_package("content\n", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content\n");
        // No temp file left behind.
        assert!(!dir.path().join("fontawesome6.sty.tmp").exists());
    }

    #[test]
    fn test_write_package_failure_leaves_no_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing-subdir").join("fontawesome6.sty");
        let err = write_package("content\n", &path).unwrap_err();
        assert!(matches!(err, EmitError::Io { .. }));
        assert!(!path.exists());
    }
}
