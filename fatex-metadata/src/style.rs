//! Style-tag enumeration for FontAwesome 6 icon variants.

use std::fmt;

/// A font-family variant of an icon glyph.
///
/// The variants are ordered by dispatch priority: when a document requests
/// an icon without naming a style, the icon's highest-priority available
/// style wins (solid before regular before light before thin before brands
/// before duotone).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Style {
    Solid,
    Regular,
    Light,
    Thin,
    Brands,
    Duotone,
}

impl Style {
    /// All known styles, in dispatch-priority order.
    pub const ALL: [Style; 6] = [
        Style::Solid,
        Style::Regular,
        Style::Light,
        Style::Thin,
        Style::Brands,
        Style::Duotone,
    ];

    /// Parse a vendor metadata style tag.
    ///
    /// Returns `None` for tags outside the known set; the caller decides
    /// whether that is fatal (it is, for catalog loading).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "solid" => Some(Style::Solid),
            "regular" => Some(Style::Regular),
            "light" => Some(Style::Light),
            "thin" => Some(Style::Thin),
            "brands" => Some(Style::Brands),
            "duotone" => Some(Style::Duotone),
            _ => None,
        }
    }

    /// The lowercase tag as it appears in the vendor metadata and in the
    /// generated `faicon@<name>@<style>` alias namespace.
    pub const fn tag(self) -> &'static str {
        match self {
            Style::Solid => "solid",
            Style::Regular => "regular",
            Style::Light => "light",
            Style::Thin => "thin",
            Style::Brands => "brands",
            Style::Duotone => "duotone",
        }
    }

    /// The capitalized macro-name suffix used to disambiguate multi-style
    /// icons (`faBellSolid`, `faBellRegular`, ...).
    pub const fn suffix(self) -> &'static str {
        match self {
            Style::Solid => "Solid",
            Style::Regular => "Regular",
            Style::Light => "Light",
            Style::Thin => "Thin",
            Style::Brands => "Brands",
            Style::Duotone => "Duotone",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag_round_trip() {
        for style in Style::ALL {
            assert_eq!(Style::from_tag(style.tag()), Some(style));
        }
    }

    #[test]
    fn test_from_tag_unknown() {
        assert_eq!(Style::from_tag("sharp-solid"), None);
        assert_eq!(Style::from_tag("SOLID"), None);
        assert_eq!(Style::from_tag(""), None);
    }

    #[test]
    fn test_priority_order() {
        // Ord follows declaration order, which is the dispatch priority.
        assert!(Style::Solid < Style::Regular);
        assert!(Style::Regular < Style::Light);
        assert!(Style::Light < Style::Thin);
        assert!(Style::Thin < Style::Brands);
        assert!(Style::Brands < Style::Duotone);
    }
}
