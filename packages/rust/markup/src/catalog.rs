//! Registry of the format categories a caller can select for removal.
//!
//! Each category is identified by a single case-sensitive character. The set
//! is fixed: nineteen categories, listed in ordinal order of display name.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use tracing::warn;

// ---------------------------------------------------------------------------
// FormatCode
// ---------------------------------------------------------------------------

/// A selectable category of formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatCode {
    /// `A`: vertical alignment directive `\A0;`..`\A2;`.
    Alignment,
    /// `B`: horizontal tab characters.
    Tabs,
    /// `C`: color directive `\C<n>;`.
    Color,
    /// `D`: computed field links.
    Fields,
    /// `F`: font directive `\F...;`.
    Font,
    /// `H`: height multiplier `\H<n>x;`.
    Height,
    /// `K`: strike-through group `{\K..}`.
    Strikethrough,
    /// `L`: linefeeds, normalized unconditionally.
    Linefeeds,
    /// `M`: background mask.
    Mask,
    /// `N`: multi-column layout.
    Columns,
    /// `O`: overline toggles `\O` / `\o`.
    Overline,
    /// `P`: paragraph breaks `\P`.
    Paragraph,
    /// `Q`: oblique angle `\Q<n>;`.
    Oblique,
    /// `S`: stacked fractions `{\S<n>/<d>;}`.
    Stacking,
    /// `T`: tracking `\T<n>;`.
    Tracking,
    /// `U`: underline toggles `\L` / `\l`.
    Underline,
    /// `W`: width factor `\W<n>;`.
    Width,
    /// `X`: paragraph alignment `\p...;`.
    ParagraphAlignment,
    /// `Z`: non-breaking space `\~`.
    NonBreakingSpace,
}

impl FormatCode {
    /// Every code, in code order.
    pub const ALL: [FormatCode; 19] = [
        Self::Alignment,
        Self::Tabs,
        Self::Color,
        Self::Fields,
        Self::Font,
        Self::Height,
        Self::Strikethrough,
        Self::Linefeeds,
        Self::Mask,
        Self::Columns,
        Self::Overline,
        Self::Paragraph,
        Self::Oblique,
        Self::Stacking,
        Self::Tracking,
        Self::Underline,
        Self::Width,
        Self::ParagraphAlignment,
        Self::NonBreakingSpace,
    ];

    pub fn as_char(self) -> char {
        match self {
            Self::Alignment => 'A',
            Self::Tabs => 'B',
            Self::Color => 'C',
            Self::Fields => 'D',
            Self::Font => 'F',
            Self::Height => 'H',
            Self::Strikethrough => 'K',
            Self::Linefeeds => 'L',
            Self::Mask => 'M',
            Self::Columns => 'N',
            Self::Overline => 'O',
            Self::Paragraph => 'P',
            Self::Oblique => 'Q',
            Self::Stacking => 'S',
            Self::Tracking => 'T',
            Self::Underline => 'U',
            Self::Width => 'W',
            Self::ParagraphAlignment => 'X',
            Self::NonBreakingSpace => 'Z',
        }
    }

    /// Look up a code by its character. Case-sensitive.
    pub fn from_char(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_char() == c)
    }

    /// Codes handled on the container rather than in the text string.
    pub fn is_structural(self) -> bool {
        matches!(self, Self::Fields | Self::Mask | Self::Columns)
    }
}

impl fmt::Display for FormatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for FormatCode {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::from_char(c).ok_or(c)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Metadata for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatCategory {
    pub code: FormatCode,
    pub display_name: &'static str,
    pub description: &'static str,
}

static CATALOG: LazyLock<Vec<FormatCategory>> = LazyLock::new(|| {
    use FormatCode as C;

    let entry = |code: FormatCode, display_name: &'static str, description: &'static str| FormatCategory {
        code,
        display_name,
        description,
    };

    let mut categories = vec![
        entry(
            C::Alignment,
            "Alignment",
            "Vertical alignment: bottom, center or top. Appears in text containing fractions.",
        ),
        entry(C::Tabs, "Tabs", "Replace tab characters with a single space."),
        entry(C::Color, "Color", "Color overrides applied to runs of text."),
        entry(
            C::Fields,
            "Fields",
            "Detach computed fields, keeping their current value as plain text.",
        ),
        entry(C::Font, "Font", "Font overrides applied to runs of text."),
        entry(C::Height, "Height", "Text height multipliers."),
        entry(C::Strikethrough, "Strikethrough", "Strike-through groups."),
        entry(
            C::Linefeeds,
            "Linefeeds",
            "Literal line breaks, always converted to paragraph breaks.",
        ),
        entry(C::Mask, "Background mask", "Background fill behind the text."),
        entry(C::Columns, "Columns", "Multi-column layout of paragraph text."),
        entry(C::Overline, "Overline", "Overline on/off toggles."),
        entry(
            C::Paragraph,
            "Paragraph",
            "Paragraph breaks. Removing them joins all lines into one.",
        ),
        entry(C::Oblique, "Oblique", "Oblique angle overrides."),
        entry(
            C::Stacking,
            "Stacking",
            "Stacked fractions, rewritten as inline numerator/denominator.",
        ),
        entry(C::Tracking, "Tracking", "Spacing between characters."),
        entry(C::Underline, "Underline", "Underline on/off toggles."),
        entry(C::Width, "Width", "Width factor overrides."),
        entry(
            C::NonBreakingSpace,
            "Non-breaking space",
            "Non-breaking spaces, replaced with ordinary spaces.",
        ),
        entry(
            C::ParagraphAlignment,
            "Paragraph alignment",
            "Paragraph alignment, indents and tab stops.",
        ),
    ];

    categories.sort_by(|a, b| a.display_name.cmp(b.display_name));
    categories
});

/// All categories, ordered by display name.
pub fn list_categories() -> &'static [FormatCategory] {
    &CATALOG
}

/// Whether `c` names a category.
pub fn is_known_code(c: char) -> bool {
    FormatCode::from_char(c).is_some()
}

/// Metadata for `code`.
pub fn category(code: FormatCode) -> &'static FormatCategory {
    CATALOG
        .iter()
        .find(|c| c.code == code)
        .unwrap_or_else(|| unreachable!("catalog covers every FormatCode"))
}

// ---------------------------------------------------------------------------
// CodeSet
// ---------------------------------------------------------------------------

/// A set of selected categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeSet(BTreeSet<FormatCode>);

impl CodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every category.
    pub fn all() -> Self {
        FormatCode::ALL.into_iter().collect()
    }

    /// Parse a code list such as `"ACF"` or `"A, C, F"`.
    ///
    /// Whitespace and commas are separators. Unknown characters are skipped,
    /// logged, and returned so the caller can surface them.
    pub fn parse(codes: &str) -> (Self, Vec<char>) {
        let mut set = Self::new();
        let mut unknown = Vec::new();

        for c in codes.chars().filter(|c| !c.is_whitespace() && *c != ',') {
            match FormatCode::from_char(c) {
                Some(code) => {
                    set.insert(code);
                }
                None => {
                    warn!(code = %c, "ignoring unknown format code");
                    if !unknown.contains(&c) {
                        unknown.push(c);
                    }
                }
            }
        }

        (set, unknown)
    }

    pub fn contains(&self, code: FormatCode) -> bool {
        self.0.contains(&code)
    }

    pub fn insert(&mut self, code: FormatCode) -> bool {
        self.0.insert(code)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = FormatCode> + '_ {
        self.0.iter().copied()
    }

    /// The codes that act on the text string itself.
    pub fn text_codes(&self) -> Self {
        self.iter().filter(|code| !code.is_structural()).collect()
    }
}

impl FromIterator<FormatCode> for CodeSet {
    fn from_iter<I: IntoIterator<Item = FormatCode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for CodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|code| write!(f, "{code}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_nineteen_unique_codes() {
        let categories = list_categories();
        assert_eq!(categories.len(), 19);

        let codes: BTreeSet<char> = categories.iter().map(|c| c.code.as_char()).collect();
        assert_eq!(codes.len(), 19);
        assert_eq!(
            codes.into_iter().collect::<String>(),
            "ABCDFHKLMNOPQSTUWXZ"
        );
    }

    #[test]
    fn catalog_sorted_by_display_name() {
        let names: Vec<&str> = list_categories().iter().map(|c| c.display_name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names[0], "Alignment");
        assert_eq!(names[1], "Background mask");
        assert_eq!(names.last(), Some(&"Width"));
    }

    #[test]
    fn listing_is_stable() {
        assert_eq!(list_categories(), list_categories());
    }

    #[test]
    fn codes_are_case_sensitive() {
        assert!(is_known_code('C'));
        assert!(!is_known_code('c'));
        assert!(!is_known_code('E'));
        assert_eq!(FormatCode::try_from('X'), Ok(FormatCode::ParagraphAlignment));
        assert_eq!(FormatCode::try_from('x'), Err('x'));
    }

    #[test]
    fn every_code_round_trips_through_its_char() {
        for code in FormatCode::ALL {
            assert_eq!(FormatCode::from_char(code.as_char()), Some(code));
            assert_eq!(category(code).code, code);
        }
    }

    #[test]
    fn parse_skips_separators_and_reports_unknown() {
        let (set, unknown) = CodeSet::parse("A, c F ?c");
        assert_eq!(set.to_string(), "AF");
        assert_eq!(unknown, vec!['c', '?']);
    }

    #[test]
    fn text_codes_drop_structural_operations() {
        let (set, _) = CodeSet::parse("CDMNS");
        assert_eq!(set.text_codes().to_string(), "CS");
    }
}
