//! Icon catalog loading and normalization.
//!
//! The vendor ships icon metadata as one large JSON object keyed by icon
//! name. Deserialization here goes through a custom map visitor rather than
//! a plain map type for two reasons: catalog iteration order must match the
//! file's declared key order (so generated output is deterministic and
//! diffable), and a duplicate key must be rejected instead of resolved
//! last-write-wins.

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::MetadataError;
use crate::style::Style;

/// One normalized catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRecord {
    /// Human-readable display name. Empty if the vendor record has none.
    pub label: String,
    /// Private-use-area codepoint of the glyph.
    pub unicode: u32,
    /// Styles the icon ships with, in dispatch-priority order, deduplicated.
    pub styles: Vec<Style>,
    /// Whether the icon is available in the free tier.
    pub free: bool,
    /// First search term, if any. Informational only; it is appended to the
    /// generated comment line.
    pub search_term: Option<String>,
}

/// The normalized in-memory icon collection.
///
/// Iteration yields icons in the order the metadata source declared them.
#[derive(Debug, Clone, Default)]
pub struct IconCatalog {
    icons: IndexMap<String, IconRecord>,
}

impl IconCatalog {
    /// Load and normalize the vendor metadata file.
    ///
    /// # Errors
    ///
    /// Returns a [`MetadataError`] if the file cannot be read, is not valid
    /// JSON, or any record fails normalization (missing fields, unknown
    /// style tags, duplicate names, per-style codepoint collisions).
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let text = fs::read_to_string(path).map_err(|source| MetadataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&text)?;
        log::info!(
            "loaded {} icons from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Normalize metadata from an in-memory JSON document.
    pub fn from_json(text: &str) -> Result<Self, MetadataError> {
        let raw: RawCatalog =
            serde_json::from_str(text).map_err(|source| MetadataError::Parse { source })?;
        Self::from_entries(raw.0)
    }

    fn from_entries(entries: Vec<(String, RawIcon)>) -> Result<Self, MetadataError> {
        let mut icons = IndexMap::with_capacity(entries.len());
        for (name, raw) in entries {
            let name = name.trim().to_ascii_lowercase();
            if name.is_empty() {
                return Err(MetadataError::EmptyName);
            }
            let record = normalize(&name, raw)?;
            if icons.insert(name.clone(), record).is_some() {
                return Err(MetadataError::DuplicateIcon { name });
            }
        }
        let catalog = IconCatalog { icons };
        catalog.check_codepoints()?;
        Ok(catalog)
    }

    /// Number of icons in the catalog.
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Whether the catalog holds no icons.
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Look up a single icon by its canonical name.
    pub fn get(&self, name: &str) -> Option<&IconRecord> {
        self.icons.get(name)
    }

    /// Iterate the catalog in source-declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IconRecord)> {
        self.icons.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Codepoints must be unique within a style; two icons sharing one is a
    /// vendor data error, not something to resolve silently.
    fn check_codepoints(&self) -> Result<(), MetadataError> {
        let mut seen: HashMap<(Style, u32), &str> = HashMap::new();
        for (name, record) in &self.icons {
            for &style in &record.styles {
                if let Some(&first) = seen.get(&(style, record.unicode)) {
                    return Err(MetadataError::CodepointCollision {
                        style: style.tag().to_string(),
                        codepoint: record.unicode,
                        first: first.to_string(),
                        second: name.clone(),
                    });
                }
                seen.insert((style, record.unicode), name.as_str());
            }
        }
        Ok(())
    }
}

fn normalize(name: &str, raw: RawIcon) -> Result<IconRecord, MetadataError> {
    let unicode = match raw.unicode {
        RawUnicode::Number(n) => n,
        RawUnicode::Hex(ref s) => {
            let digits = s.trim();
            let digits = digits
                .strip_prefix("0x")
                .or_else(|| digits.strip_prefix("0X"))
                .unwrap_or(digits);
            u32::from_str_radix(digits, 16).map_err(|_| MetadataError::BadCodepoint {
                icon: name.to_string(),
                value: s.clone(),
            })?
        }
    };
    if unicode > 0x0010_FFFF {
        return Err(MetadataError::BadCodepoint {
            icon: name.to_string(),
            value: format!("{unicode:#x}"),
        });
    }

    if raw.styles.is_empty() {
        return Err(MetadataError::NoStyles {
            icon: name.to_string(),
        });
    }
    let mut styles = Vec::with_capacity(raw.styles.len());
    for tag in &raw.styles {
        let style = Style::from_tag(tag.trim()).ok_or_else(|| MetadataError::UnknownStyle {
            icon: name.to_string(),
            style: tag.clone(),
        })?;
        if !styles.contains(&style) {
            styles.push(style);
        }
    }
    styles.sort();

    let search_term = raw.search.and_then(|search| {
        search
            .terms
            .into_iter()
            .find_map(|term| term.as_str().map(str::to_owned))
    });

    Ok(IconRecord {
        label: raw.label.unwrap_or_default(),
        unicode,
        styles,
        free: raw.free,
        search_term,
    })
}

/// One vendor record, as shipped. Fields outside this set (changes, voted,
/// aliases, ...) are ignored.
#[derive(Debug, Deserialize)]
struct RawIcon {
    #[serde(default)]
    label: Option<String>,
    unicode: RawUnicode,
    styles: Vec<String>,
    #[serde(default)]
    free: bool,
    #[serde(default)]
    search: Option<RawSearch>,
}

/// The vendor writes codepoints as lowercase hex strings ("f2b9"); accept a
/// plain JSON integer as well.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawUnicode {
    Number(u32),
    Hex(String),
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    /// Terms may mix strings and bare numbers in vendor data.
    #[serde(default)]
    terms: Vec<serde_json::Value>,
}

/// The outer metadata object in declared key order, duplicates included.
struct RawCatalog(Vec<(String, RawIcon)>);

impl<'de> Deserialize<'de> for RawCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = RawCatalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of icon name to icon record")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, icon)) = map.next_entry::<String, RawIcon>()? {
                    entries.push((name, icon));
                }
                Ok(RawCatalog(entries))
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_minimal_icon() {
        let catalog = IconCatalog::from_json(
            r#"{
                "address-book": {
                    "label": "Address Book",
                    "unicode": "f2b9",
                    "styles": ["solid"],
                    "free": true
                }
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 1);
        let record = catalog.get("address-book").unwrap();
        assert_eq!(record.label, "Address Book");
        assert_eq!(record.unicode, 0xF2B9);
        assert_eq!(record.styles, vec![Style::Solid]);
        assert!(record.free);
        assert_eq!(record.search_term, None);
    }

    #[test]
    fn test_order_matches_source() {
        let catalog = IconCatalog::from_json(
            r#"{
                "zebra": {"unicode": "f001", "styles": ["solid"]},
                "apple": {"unicode": "f002", "styles": ["brands"]},
                "mug":   {"unicode": "f003", "styles": ["solid"]}
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = catalog.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zebra", "apple", "mug"]);
    }

    #[test]
    fn test_name_normalized_lowercase_trimmed() {
        let catalog = IconCatalog::from_json(
            r#"{"  Address-Book  ": {"unicode": "f2b9", "styles": ["solid"]}}"#,
        )
        .unwrap();
        assert!(catalog.get("address-book").is_some());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        // Duplicate JSON keys, and a pair that collides after normalization.
        let err = IconCatalog::from_json(
            r#"{
                "bell":  {"unicode": "f0f3", "styles": ["solid"]},
                "Bell ": {"unicode": "f0f4", "styles": ["solid"]}
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, MetadataError::DuplicateIcon { name } if name == "bell"));
    }

    #[test]
    fn test_missing_unicode_is_parse_error() {
        let err =
            IconCatalog::from_json(r#"{"bell": {"styles": ["solid"]}}"#).unwrap_err();
        assert!(matches!(err, MetadataError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn test_unknown_style_rejected() {
        let err = IconCatalog::from_json(
            r#"{"bell": {"unicode": "f0f3", "styles": ["sharp-solid"]}}"#,
        )
        .unwrap_err();
        match err {
            MetadataError::UnknownStyle { icon, style } => {
                assert_eq!(icon, "bell");
                assert_eq!(style, "sharp-solid");
            }
            other => panic!("expected UnknownStyle, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_styles_rejected() {
        let err = IconCatalog::from_json(r#"{"bell": {"unicode": "f0f3", "styles": []}}"#)
            .unwrap_err();
        assert!(matches!(err, MetadataError::NoStyles { icon } if icon == "bell"));
    }

    #[test]
    fn test_bad_hex_rejected() {
        let err = IconCatalog::from_json(
            r#"{"bell": {"unicode": "not-hex", "styles": ["solid"]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, MetadataError::BadCodepoint { .. }));
    }

    #[test]
    fn test_numeric_unicode_accepted() {
        let catalog =
            IconCatalog::from_json(r#"{"bell": {"unicode": 62195, "styles": ["solid"]}}"#)
                .unwrap();
        assert_eq!(catalog.get("bell").unwrap().unicode, 0xF2F3);
    }

    #[test]
    fn test_out_of_range_codepoint_rejected() {
        let err = IconCatalog::from_json(
            r#"{"bell": {"unicode": "110000", "styles": ["solid"]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, MetadataError::BadCodepoint { .. }));
    }

    #[test]
    fn test_styles_sorted_by_priority_and_deduplicated() {
        let catalog = IconCatalog::from_json(
            r#"{"bell": {"unicode": "f0f3", "styles": ["brands", "solid", "regular", "solid"]}}"#,
        )
        .unwrap();
        assert_eq!(
            catalog.get("bell").unwrap().styles,
            vec![Style::Solid, Style::Regular, Style::Brands]
        );
    }

    #[test]
    fn test_free_defaults_to_false() {
        let catalog =
            IconCatalog::from_json(r#"{"bell": {"unicode": "f0f3", "styles": ["solid"]}}"#)
                .unwrap();
        assert!(!catalog.get("bell").unwrap().free);
    }

    #[test]
    fn test_codepoint_collision_within_style_rejected() {
        let err = IconCatalog::from_json(
            r#"{
                "bell":  {"unicode": "f0f3", "styles": ["solid"]},
                "gong":  {"unicode": "f0f3", "styles": ["solid"]}
            }"#,
        )
        .unwrap_err();
        match err {
            MetadataError::CodepointCollision {
                style,
                codepoint,
                first,
                second,
            } => {
                assert_eq!(style, "solid");
                assert_eq!(codepoint, 0xF0F3);
                assert_eq!(first, "bell");
                assert_eq!(second, "gong");
            }
            other => panic!("expected CodepointCollision, got {other:?}"),
        }
    }

    #[test]
    fn test_same_codepoint_across_styles_allowed() {
        let catalog = IconCatalog::from_json(
            r#"{
                "bell":  {"unicode": "f0f3", "styles": ["solid"]},
                "gong":  {"unicode": "f0f3", "styles": ["regular"]}
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_search_term_extracted() {
        let catalog = IconCatalog::from_json(
            r#"{
                "apple": {
                    "unicode": "f179",
                    "styles": ["brands"],
                    "search": {"terms": [123, "fruit", "mac"]}
                }
            }"#,
        )
        .unwrap();
        // First *string* term wins; bare numbers are skipped.
        assert_eq!(
            catalog.get("apple").unwrap().search_term.as_deref(),
            Some("fruit")
        );
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = IconCatalog::load(Path::new("/nonexistent/icons.json")).unwrap_err();
        assert!(matches!(err, MetadataError::Read { .. }));
    }
}
