//! Locale-aware case and diacritic folding.
//!
//! Turkish has four letters for "i" (`I ı İ i`) whose case mapping differs
//! from the Unicode default, and keyword lists are written without
//! diacritics. A [`FoldTable`] makes both rules explicit data so keyword
//! matching and name display fold identically on every platform.

/// Combining diacritical marks block; stripped after folding.
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036F}';

const TURKISH_LOWER: &[(char, char)] = &[('I', 'ı'), ('İ', 'i')];
const TURKISH_UPPER: &[(char, char)] = &[('i', 'İ'), ('ı', 'I')];

/// Lowercase letter to base Latin letter.
const BASE_LATIN: &[(char, char)] = &[
    ('ç', 'c'),
    ('ğ', 'g'),
    ('ı', 'i'),
    ('ö', 'o'),
    ('ş', 's'),
    ('ü', 'u'),
    ('â', 'a'),
    ('î', 'i'),
    ('û', 'u'),
    ('á', 'a'),
    ('à', 'a'),
    ('ä', 'a'),
    ('ã', 'a'),
    ('é', 'e'),
    ('è', 'e'),
    ('ê', 'e'),
    ('ë', 'e'),
    ('í', 'i'),
    ('ì', 'i'),
    ('ï', 'i'),
    ('ó', 'o'),
    ('ò', 'o'),
    ('ô', 'o'),
    ('ú', 'u'),
    ('ù', 'u'),
    ('ñ', 'n'),
];

/// Case mapping overrides plus a diacritic-to-base table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldTable {
    lower: &'static [(char, char)],
    upper: &'static [(char, char)],
    base: &'static [(char, char)],
}

impl Default for FoldTable {
    fn default() -> Self {
        Self::turkish()
    }
}

impl FoldTable {
    /// Builds a table from explicit mappings.
    pub const fn new(
        lower: &'static [(char, char)],
        upper: &'static [(char, char)],
        base: &'static [(char, char)],
    ) -> Self {
        Self { lower, upper, base }
    }

    /// Turkish casing (dotted and dotless i) with Latin diacritic folding.
    pub const fn turkish() -> Self {
        Self::new(TURKISH_LOWER, TURKISH_UPPER, BASE_LATIN)
    }

    fn lookup(table: &[(char, char)], c: char) -> Option<char> {
        table.iter().find(|(from, _)| *from == c).map(|(_, to)| *to)
    }

    /// Lowercases using the table's casing rules.
    pub fn lowercase(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match Self::lookup(self.lower, c) {
                Some(l) => out.push(l),
                None => out.extend(c.to_lowercase()),
            }
        }
        out
    }

    /// Uppercases using the table's casing rules.
    pub fn uppercase(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match Self::lookup(self.upper, c) {
                Some(u) => out.push(u),
                None => out.extend(c.to_uppercase()),
            }
        }
        out
    }

    /// Produces the comparison key: lowercase, base letters, no combining marks.
    pub fn fold(&self, s: &str) -> String {
        self.lowercase(s)
            .chars()
            .filter(|c| !COMBINING_MARKS.contains(c))
            .map(|c| Self::lookup(self.base, c).unwrap_or(c))
            .collect()
    }

    /// Uppercases the first letter and lowercases the rest.
    pub fn capitalize(&self, word: &str) -> String {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => {
                let mut out = self.uppercase(first.encode_utf8(&mut [0; 4]));
                out.push_str(&self.lowercase(chars.as_str()));
                out
            }
            None => String::new(),
        }
    }
}
