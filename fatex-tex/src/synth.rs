//! Macro synthesis: catalog entries to LaTeX macro definitions.
//!
//! Every icon/style pair that survives tier gating becomes one
//! [`MacroDefinition`]; alongside the flat macro sequence a dispatch table
//! records, per icon, which styles exist and which macro each resolves to.

use std::collections::{BTreeSet, HashMap};

use fatex_metadata::{IconCatalog, Style};

use crate::error::SynthError;

/// Generation tier: which icons are included in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Only icons available in the free tier.
    Free,
    /// The full catalog, including pro-only icons.
    Pro,
}

impl Mode {
    /// Whether pro-only icons are included.
    pub const fn is_pro(self) -> bool {
        matches!(self, Mode::Pro)
    }
}

/// One emitted control sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDefinition {
    /// Control-sequence name without the leading backslash
    /// (`faAddressBook`, `faBellSolid`).
    pub macro_name: String,
    /// The catalog icon this macro renders.
    pub icon_name: String,
    /// The style variant the macro selects.
    pub style: Style,
    /// Glyph codepoint, copied from the icon record.
    pub codepoint: u32,
    /// Display label for the generated comment line.
    pub label: String,
    /// First search term for the generated comment line, if any.
    pub search_term: Option<String>,
}

/// Dispatch-table entry for one icon: its available styles in
/// default-priority order, each with the macro that renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchEntry {
    /// Canonical icon name as requested in `\faIcon{...}`.
    pub icon_name: String,
    /// (style, macro name) pairs, highest-priority first. The first entry
    /// is what `\faIcon` resolves to when no style is requested.
    pub targets: Vec<(Style, String)>,
}

/// Output of one synthesis pass.
#[derive(Debug, Clone)]
pub struct Synthesis {
    /// All emitted macros, in catalog order, styles in priority order.
    pub macros: Vec<MacroDefinition>,
    /// Per-icon dispatch entries, in catalog order.
    pub dispatch: Vec<DispatchEntry>,
    /// Styles used by at least one emitted macro, in priority order. The
    /// emitter declares font families only for these.
    pub styles_used: Vec<Style>,
}

const DIGIT_WORDS: [&str; 10] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];

/// Derive the control-sequence name for an icon.
///
/// The name is `fa` followed by the PascalCased segments of the icon name.
/// Hyphens (and any other non-alphanumeric character) are dropped and start
/// a new segment; digits are spelled out (`0` → `Zero` ... `9` → `Nine`)
/// and also start a new segment. The result contains ASCII letters only,
/// which is what a LaTeX control sequence may carry.
///
/// `address-book` → `faAddressBook`, `500px` → `faFiveZeroZeroPx`.
pub fn control_sequence_name(icon_name: &str) -> String {
    let mut out = String::with_capacity(icon_name.len() + 8);
    out.push_str("fa");
    let mut boundary = true;
    for ch in icon_name.chars() {
        if ch.is_ascii_alphabetic() {
            if boundary {
                out.push(ch.to_ascii_uppercase());
                boundary = false;
            } else {
                out.push(ch);
            }
        } else if let Some(digit) = ch.to_digit(10) {
            out.push_str(DIGIT_WORDS[digit as usize]);
            boundary = true;
        } else {
            boundary = true;
        }
    }
    out
}

/// Synthesize the macro sequence and dispatch table for a catalog.
///
/// Icons with `free = false` are skipped entirely in [`Mode::Free`]; a
/// document requesting one then falls through to the dispatch macro's
/// explicit error path.
///
/// # Errors
///
/// Returns [`SynthError::Collision`] when two icon names sanitize to the
/// same control-sequence name (including style-suffixed names).
pub fn synthesize(catalog: &IconCatalog, mode: Mode) -> Result<Synthesis, SynthError> {
    let mut macros = Vec::new();
    let mut dispatch = Vec::new();
    let mut styles_used: BTreeSet<Style> = BTreeSet::new();
    // macro name -> icon that owns it, for collision reporting
    let mut owners: HashMap<String, String> = HashMap::new();

    let mut skipped = 0usize;
    for (name, record) in catalog.iter() {
        if !record.free && !mode.is_pro() {
            skipped += 1;
            continue;
        }

        let base = control_sequence_name(name);
        let multi_style = record.styles.len() > 1;
        let mut targets = Vec::with_capacity(record.styles.len());

        // record.styles is already deduplicated and priority-sorted.
        for &style in &record.styles {
            let macro_name = if multi_style {
                format!("{base}{}", style.suffix())
            } else {
                base.clone()
            };
            if let Some(first) = owners.insert(macro_name.clone(), name.to_string()) {
                return Err(SynthError::Collision {
                    first,
                    second: name.to_string(),
                    macro_name,
                });
            }
            styles_used.insert(style);
            macros.push(MacroDefinition {
                macro_name: macro_name.clone(),
                icon_name: name.to_string(),
                style,
                codepoint: record.unicode,
                label: record.label.clone(),
                search_term: record.search_term.clone(),
            });
            targets.push((style, macro_name));
        }

        dispatch.push(DispatchEntry {
            icon_name: name.to_string(),
            targets,
        });
    }

    if skipped > 0 {
        log::info!("skipped {skipped} pro-only icons (free mode)");
    }
    log::info!(
        "synthesized {} macros for {} icons",
        macros.len(),
        dispatch.len()
    );

    Ok(Synthesis {
        macros,
        dispatch,
        styles_used: styles_used.into_iter().collect(),
    })
}
