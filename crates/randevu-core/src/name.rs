//! Patient-name extraction from free-form event titles.
//!
//! Receptionists type titles like `"🔪 ayşe YILMAZ tel: 0555 123 45 67 (rino)"`.
//! [`NameNormalizer::normalize`] reduces that to `"Ayşe Yılmaz"`, and
//! [`abbreviate`] to `"Ayşe Y."`. Neither value ever leaves the crate through
//! an outbound record.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::fold::FoldTable;

/// Phone and age annotations: a keyword followed by digits.
static ANNOTATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:tel|telefon|gsm|cep|ya[sş])\b\s*[:.]?\s*\+?\d[\d\s\-()]*")
        .expect("Invalid annotation regex")
});

/// Bare phone numbers (seven or more digits, optionally grouped).
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\s\-]{5,}\d").expect("Invalid phone regex"));

/// Parenthesized or bracketed asides.
static ASIDE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)?|\[[^\]]*\]?").expect("Invalid aside regex"));

/// Clock times such as `10:30` or `9.15`.
static CLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}[:.]\d{2}\b").expect("Invalid clock regex"));

/// Category marker tokens (`k`, `k2`, `m`, `op`, `1.5m`), matched on the folded token.
static MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:k\d*|m|op|\d+(?:[.,]\d+)?m)$").expect("Invalid marker regex")
});

/// Glyphs separating a category marker from the name.
pub const SEPARATORS: &[&str] = &["🔪", "|", "»"];

/// Clinical and administrative words removed wherever they occur (folded).
pub const CLINICAL_WORDS: &[&str] = &[
    "kontrol",
    "ktrl",
    "muayene",
    "ameliyat",
    "ameliyati",
    "online",
    "gorusme",
    "goruntulu",
    "randevu",
    "hasta",
    "yeni",
    "ilk",
    "pansuman",
    "anestezi",
    "konsultasyon",
    "zoom",
    "video",
    "iptal",
    "ertelendi",
    "bilgi",
];

/// Words after which everything is procedure or annotation metadata (folded).
pub const CUT_WORDS: &[&str] = &[
    "islem",
    "prosedur",
    "not",
    "aciklama",
    "tani",
    "tedavi",
];

/// Administrative words dropped from the final token list (folded).
pub const STOP_WORDS: &[&str] = &[
    "bey", "hanim", "hn", "hnm", "dr", "sn", "bay", "bayan", "ve", "ile", "icin", "mr", "mrs",
];

/// Extracts a canonical patient-name fragment from a raw title.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    fold: FoldTable,
    separators: Vec<String>,
    clinical: HashSet<String>,
    cut: HashSet<String>,
    stop: HashSet<String>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new(FoldTable::default())
    }
}

impl NameNormalizer {
    /// Creates a normalizer with the built-in word lists.
    pub fn new(fold: FoldTable) -> Self {
        let set = |words: &[&str]| words.iter().map(|w| fold.fold(w)).collect();
        Self {
            fold,
            separators: SEPARATORS.iter().map(|s| s.to_string()).collect(),
            clinical: set(CLINICAL_WORDS),
            cut: set(CUT_WORDS),
            stop: set(STOP_WORDS),
        }
    }

    /// Reduces a raw event title to title-cased name tokens.
    ///
    /// Returns an empty string when nothing name-like remains.
    pub fn normalize(&self, raw: &str) -> String {
        let text = self.after_separator(raw);
        let text = ANNOTATION_REGEX.replace_all(text, " ");
        let text = PHONE_REGEX.replace_all(&text, " ");
        let text = self.strip_keywords(&text);
        let text = ASIDE_REGEX.replace_all(&text, " ");
        let text = CLOCK_REGEX.replace_all(&text, " ");

        let cleaned: String = text
            .chars()
            .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
            .collect();

        cleaned
            .split_whitespace()
            .filter(|token| token.chars().count() > 1)
            .filter(|token| !self.stop.contains(&self.fold.fold(token)))
            .map(|token| self.fold.capitalize(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Keeps only the text after the first separator glyph, if any.
    fn after_separator<'a>(&self, raw: &'a str) -> &'a str {
        self.separators
            .iter()
            .filter_map(|sep| raw.find(sep.as_str()).map(|idx| idx + sep.len()))
            .min()
            .map_or(raw, |end| &raw[end..])
    }

    /// Drops clinical words and marker tokens; stops at the first cut word.
    fn strip_keywords(&self, text: &str) -> String {
        let mut kept = Vec::new();
        for token in text.split_whitespace() {
            let key = self.fold.fold(token);
            let key = key.trim_matches(|c: char| !c.is_alphanumeric() && c != '.' && c != ',');
            let bare = key.trim_matches(|c: char| !c.is_alphanumeric());
            if self.cut.contains(bare) {
                break;
            }
            if self.clinical.contains(bare) || MARKER_REGEX.is_match(key) {
                continue;
            }
            kept.push(token);
        }
        kept.join(" ")
    }
}

/// Shortens a normalized name to first token plus the second token's initial.
///
/// `"Ahmet Can Yılmaz"` becomes `"Ahmet C."`; a single token is returned as-is.
pub fn abbreviate(name: &str) -> Option<String> {
    let mut tokens = name.split_whitespace();
    let first = tokens.next()?;
    match tokens.next().and_then(|second| second.chars().next()) {
        Some(initial) => Some(format!("{} {}.", first, initial)),
        None => Some(first.to_string()),
    }
}
