//! Title/color/duration heuristics mapping events to categories.
//!
//! Classification is an ordered table of [`Rule`]s; the first rule whose
//! predicate holds decides the category. The last rule always matches, so
//! [`Classifier::classify`] is total. Every predicate compares against the
//! title's folded key (see [`FoldTable`]), so `"MUAYENE"`, `"muayene"` and
//! `"Muayene"` behave the same.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::fold::FoldTable;

/// Title starting with a clock time (`10:30 ...`, `9.15 ...`).
static LEADING_TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}[:.]\d{2}\b").expect("Invalid leading time regex"));

/// Control-visit markers: `k`, `k2`, or months since surgery such as `1.5m`.
static CONTROL_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:k\d*|\d+(?:[.,]\d+)?m)(?:$|[\s.:\-])").expect("Invalid control regex")
});

/// Examination markers: `m ...` or `op ...`.
static EXAM_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:m|op)(?:$|\s)").expect("Invalid exam regex"));

/// Words that mark a slot busy before anything else is considered.
pub const BUSY_OVERRIDE_WORDS: &[&str] = &["mesgul", "#busy"];
/// Title prefixes for anesthesia slots.
pub const ANESTHESIA_PREFIXES: &[&str] = &["anestezi", "anes", "💉"];
/// Title prefixes for cancelled, rescheduled or purely informational entries.
pub const CANCEL_PREFIXES: &[&str] = &[
    "iptal",
    "ertelendi",
    "ertele",
    "gelmedi",
    "gelmeyecek",
    "bilgi",
    "not",
    "❌",
];
/// Glyph marking informational entries anywhere in the title.
pub const INFO_GLYPH: &str = "ℹ";
/// Out-of-office and administrative words.
pub const BUSY_WORDS: &[&str] = &[
    "izin", "tatil", "kongre", "toplanti", "kapali", "off", "seminer", "egitim", "yok",
];
/// Online-meeting synonyms.
pub const ONLINE_WORDS: &[&str] = &[
    "online",
    "on-line",
    "on line",
    "zoom",
    "goruntulu",
    "video",
    "uzaktan",
    "meet",
    "skype",
];
/// Glyph marking a surgery.
pub const SURGERY_GLYPH: &str = "🔪";
/// Surgery words.
pub const SURGERY_WORDS: &[&str] = &["ameliyat", "cerrahi", "surgery"];
/// Control-visit words.
pub const CONTROL_WORDS: &[&str] = &["kontrol", "ktrl", "control", "pansuman"];
/// Examination words.
pub const EXAM_WORDS: &[&str] = &["muayene", "exam", "konsultasyon", "consultation"];
/// Keywords that must match a whole word; everything else tolerates
/// Turkish suffixes.
pub const WHOLE_WORDS: &[&str] = &[
    "off",
    "yok",
    "exam",
    "meet",
    "control",
    "surgery",
    "consultation",
];

/// Tunable classifier inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Untagged events at least this long are treated as surgeries.
    pub surgery_duration_minutes: i64,
    /// Upstream color id reserved for cancelled appointments.
    pub cancel_color_id: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            surgery_duration_minutes: 60,
            // Google Calendar "Tomato".
            cancel_color_id: "11".to_string(),
        }
    }
}

/// What a rule predicate gets to look at.
#[derive(Debug, Clone)]
pub struct Subject<'a> {
    /// Folded, trimmed title.
    pub key: String,
    /// Upstream color tag.
    pub color_id: Option<&'a str>,
    /// Length in minutes; `None` for all-day events.
    pub duration_minutes: Option<i64>,
}

type Predicate = Box<dyn Fn(&Subject<'_>) -> bool + Send + Sync>;

/// One row of the classification table.
pub struct Rule {
    name: &'static str,
    category: Category,
    test: Predicate,
}

impl Rule {
    fn new(
        name: &'static str,
        category: Category,
        test: impl Fn(&Subject<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            category,
            test: Box::new(test),
        }
    }

    /// Stable identifier of the rule.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Category assigned when the rule fires.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Evaluates the predicate.
    pub fn matches(&self, subject: &Subject<'_>) -> bool {
        (self.test)(subject)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish()
    }
}

/// The outcome of classifying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// The assigned category.
    pub category: Category,
    /// Name of the rule that fired.
    pub rule: &'static str,
}

/// Ordered rule table.
#[derive(Debug)]
pub struct Classifier {
    fold: FoldTable,
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default(), FoldTable::default())
    }
}

impl Classifier {
    /// Builds the rule table for the given configuration.
    ///
    /// Order is precedence: earlier rows win.
    pub fn new(config: &ClassifierConfig, fold: FoldTable) -> Self {
        let words = |list: &[&str]| -> Vec<String> { list.iter().map(|w| fold.fold(w)).collect() };

        let override_words = words(BUSY_OVERRIDE_WORDS);
        let anesthesia = words(ANESTHESIA_PREFIXES);
        let cancel_color = config.cancel_color_id.clone();
        let cancel = words(CANCEL_PREFIXES);
        let busy = words(BUSY_WORDS);
        let online = words(ONLINE_WORDS);
        let surgery = words(SURGERY_WORDS);
        let control = words(CONTROL_WORDS);
        let exam = words(EXAM_WORDS);
        let threshold = config.surgery_duration_minutes;

        let is_control = {
            let control = control.clone();
            move |key: &str| CONTROL_MARKER_REGEX.is_match(key) || contains_any_word(key, &control)
        };
        let is_exam = {
            let exam = exam.clone();
            move |key: &str| EXAM_MARKER_REGEX.is_match(key) || contains_any_word(key, &exam)
        };
        let has_exam_word = move |key: &str| contains_any_word(key, &exam);

        let rules = vec![
            Rule::new("busy-override", Category::Busy, move |s| {
                contains_any_word(&s.key, &override_words)
            }),
            Rule::new("anesthesia-prefix", Category::Anesthesia, move |s| {
                anesthesia.iter().any(|p| starts_with_word(&s.key, p))
            }),
            Rule::new("cancel-color", Category::Cancelled, move |s| {
                s.color_id == Some(cancel_color.as_str())
            }),
            Rule::new("cancel-prefix", Category::Cancelled, move |s| {
                s.key.contains(INFO_GLYPH) || cancel.iter().any(|p| starts_with_word(&s.key, p))
            }),
            Rule::new("busy-keyword", Category::Busy, move |s| {
                contains_any_word(&s.key, &busy)
            }),
            Rule::new("online-keyword", Category::Online, move |s| {
                contains_any_word(&s.key, &online)
            }),
            Rule::new("surgery-marker", Category::Surgery, move |s| {
                s.key.contains(SURGERY_GLYPH) || contains_any_word(&s.key, &surgery)
            }),
            Rule::new("timed-exam", Category::Exam, move |s| {
                LEADING_TIME_REGEX.is_match(&s.key) && has_exam_word(&s.key)
            }),
            Rule::new("timed-surgery", Category::Surgery, |s| {
                LEADING_TIME_REGEX.is_match(&s.key)
            }),
            Rule::new("long-duration", Category::Surgery, {
                let is_control = is_control.clone();
                let is_exam = is_exam.clone();
                move |s| {
                    s.duration_minutes.is_some_and(|m| m >= threshold)
                        && !is_control(&s.key)
                        && !is_exam(&s.key)
                }
            }),
            Rule::new("control-marker", Category::Control, move |s| is_control(&s.key)),
            Rule::new("exam-marker", Category::Exam, move |s| is_exam(&s.key)),
            Rule::new("fallback", Category::Busy, |_| true),
        ];

        Self { fold, rules }
    }

    /// Returns the rule table in precedence order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Classifies a timed event.
    pub fn classify(
        &self,
        title: &str,
        color_id: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Category {
        let minutes = (end - start).num_minutes();
        self.explain(title, color_id, Some(minutes)).category
    }

    /// Classifies and reports which rule fired.
    ///
    /// Pass `None` as the duration for all-day events; duration-based
    /// inference is skipped for them.
    pub fn explain(
        &self,
        title: &str,
        color_id: Option<&str>,
        duration_minutes: Option<i64>,
    ) -> Verdict {
        let subject = Subject {
            key: self.fold.fold(title).trim().to_string(),
            color_id,
            duration_minutes,
        };
        self.rules
            .iter()
            .find(|rule| rule.matches(&subject))
            .map(|rule| Verdict {
                category: rule.category,
                rule: rule.name,
            })
            .unwrap_or(Verdict {
                category: Category::Busy,
                rule: "fallback",
            })
    }
}

/// True if `word` occurs in `key` starting at a word boundary.
///
/// Stems are anchored at the start only, so `izin` matches `izinli` but `cep`
/// does not match `recep`. [`WHOLE_WORDS`] are anchored at both ends: `off`
/// does not match `offline`.
fn contains_word(key: &str, word: &str) -> bool {
    let whole = WHOLE_WORDS.contains(&word);
    key.match_indices(word).any(|(idx, matched)| {
        let starts = key[..idx]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let ends = !whole
            || key[idx + matched.len()..]
                .chars()
                .next()
                .is_none_or(|c| !c.is_alphanumeric());
        starts && ends
    })
}

fn contains_any_word(key: &str, words: &[String]) -> bool {
    words.iter().any(|w| contains_word(key, w))
}

/// True if `key` begins with `prefix` as a whole word.
///
/// Prefixes ending in a glyph need no trailing boundary.
fn starts_with_word(key: &str, prefix: &str) -> bool {
    let Some(rest) = key.strip_prefix(prefix) else {
        return false;
    };
    let needs_boundary = prefix.chars().next_back().is_some_and(char::is_alphanumeric);
    !needs_boundary || rest.chars().next().is_none_or(|c| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 5, h, m, 0).unwrap()
    }

    fn classify_for(title: &str, minutes: i64) -> Category {
        let start = at(9, 0);
        Classifier::default().classify(title, None, start, start + Duration::minutes(minutes))
    }

    fn rule_for(title: &str, color: Option<&str>, minutes: Option<i64>) -> &'static str {
        Classifier::default().explain(title, color, minutes).rule
    }

    mod examples {
        use super::*;

        #[test]
        fn surgery_glyph_regardless_of_duration() {
            assert_eq!(classify_for("🔪 Ayşe Yılmaz", 90), Category::Surgery);
            assert_eq!(classify_for("🔪 Ayşe Yılmaz", 20), Category::Surgery);
        }

        #[test]
        fn control_marker() {
            assert_eq!(classify_for("K2", 15), Category::Control);
            assert_eq!(classify_for("k Ahmet", 15), Category::Control);
            assert_eq!(classify_for("1.5m Ahmet Can", 15), Category::Control);
            assert_eq!(classify_for("Ahmet kontrol", 15), Category::Control);
        }

        #[test]
        fn online_synonyms() {
            assert_eq!(classify_for("Online görüşme", 30), Category::Online);
            assert_eq!(classify_for("ZOOM Ali", 30), Category::Online);
            assert_eq!(classify_for("Görüntülü Ali", 30), Category::Online);
        }

        #[test]
        fn out_of_office() {
            assert_eq!(classify_for("XXX izinli", 480), Category::Busy);
            assert_eq!(classify_for("KONGRE", 480), Category::Busy);
        }

        #[test]
        fn exam_markers() {
            assert_eq!(classify_for("m Selin", 15), Category::Exam);
            assert_eq!(classify_for("op Selin", 15), Category::Exam);
            assert_eq!(classify_for("İlk Muayene Selin", 15), Category::Exam);
        }

        #[test]
        fn anesthesia_prefix() {
            assert_eq!(classify_for("Anestezi Ahmet", 30), Category::Anesthesia);
            assert_eq!(classify_for("ANES Ahmet", 30), Category::Anesthesia);
            assert_eq!(classify_for("💉Ahmet", 30), Category::Anesthesia);
            // Not a prefix: ordinary word that starts with the same letters.
            assert_eq!(rule_for("Anesa Kaya", None, Some(15)), "fallback");
        }

        #[test]
        fn cancellation_prefixes_and_info_glyph() {
            assert_eq!(classify_for("İPTAL Ahmet", 30), Category::Cancelled);
            assert_eq!(classify_for("ertelendi Ahmet", 30), Category::Cancelled);
            assert_eq!(classify_for("Ahmet ℹ️ sigorta", 30), Category::Cancelled);
        }

        #[test]
        fn opaque_titles_fall_back_to_busy() {
            assert_eq!(classify_for("Ahmet Can", 30), Category::Busy);
            assert_eq!(classify_for("", 30), Category::Busy);
        }
    }

    mod precedence {
        use super::*;

        #[test]
        fn table_order_is_pinned() {
            let names: Vec<_> = Classifier::default().rules().iter().map(Rule::name).collect();
            assert_eq!(
                names,
                vec![
                    "busy-override",
                    "anesthesia-prefix",
                    "cancel-color",
                    "cancel-prefix",
                    "busy-keyword",
                    "online-keyword",
                    "surgery-marker",
                    "timed-exam",
                    "timed-surgery",
                    "long-duration",
                    "control-marker",
                    "exam-marker",
                    "fallback",
                ]
            );
        }

        #[test]
        fn override_beats_everything() {
            assert_eq!(rule_for("MEŞGUL 🔪 Ahmet", Some("11"), Some(90)), "busy-override");
        }

        #[test]
        fn anesthesia_beats_red_color() {
            assert_eq!(rule_for("Anestezi Ahmet", Some("11"), Some(30)), "anesthesia-prefix");
        }

        #[test]
        fn red_color_beats_keywords() {
            for title in ["🔪 Ahmet", "K2", "Online", "izinli", "10:30 Ahmet", "m Ahmet"] {
                assert_eq!(
                    Classifier::default().explain(title, Some("11"), Some(90)).category,
                    Category::Cancelled,
                    "title {title:?}"
                );
            }
        }

        #[test]
        fn other_colors_do_not_cancel() {
            assert_eq!(rule_for("K2", Some("5"), Some(15)), "control-marker");
        }

        #[test]
        fn cancellation_beats_busy_keywords() {
            assert_eq!(rule_for("iptal izinli", None, Some(30)), "cancel-prefix");
        }

        #[test]
        fn busy_keyword_beats_online() {
            assert_eq!(rule_for("online kongre", None, Some(30)), "busy-keyword");
        }

        #[test]
        fn leading_time_with_exam_word_is_exam() {
            assert_eq!(rule_for("10:30 Ahmet muayene", None, Some(30)), "timed-exam");
            assert_eq!(rule_for("10.30 Ahmet", None, Some(30)), "timed-surgery");
        }

        #[test]
        fn explicit_surgery_marker_beats_exam_word() {
            assert_eq!(rule_for("🔪 10:30 Ahmet muayene", None, Some(30)), "surgery-marker");
        }

        #[test]
        fn long_untagged_event_is_surgery() {
            assert_eq!(rule_for("Ahmet Can", None, Some(60)), "long-duration");
            assert_eq!(rule_for("Ahmet Can", None, Some(59)), "fallback");
        }

        #[test]
        fn long_control_or_exam_is_not_surgery() {
            assert_eq!(rule_for("K1 Ahmet", None, Some(90)), "control-marker");
            assert_eq!(rule_for("Ahmet muayene", None, Some(90)), "exam-marker");
        }

        #[test]
        fn all_day_events_skip_duration_rule() {
            assert_eq!(rule_for("Ahmet Can", None, None), "fallback");
        }

        #[test]
        fn threshold_is_configurable() {
            let config = ClassifierConfig {
                surgery_duration_minutes: 45,
                ..Default::default()
            };
            let classifier = Classifier::new(&config, FoldTable::default());
            assert_eq!(
                classifier.explain("Ahmet Can", None, Some(45)).rule,
                "long-duration"
            );
        }
    }

    mod matching {
        use super::*;

        #[test]
        fn word_prefix_boundaries() {
            assert!(contains_word("ahmet izinli", "izin"));
            assert!(!contains_word("recep", "cep"));
            assert!(contains_word("(zoom)", "zoom"));
        }

        #[test]
        fn short_tokens_need_the_whole_word() {
            assert!(!contains_word("offline selin", "off"));
            assert!(!contains_word("yoksul ayse", "yok"));
            assert!(!contains_word("example ayse", "exam"));
            assert!(!contains_word("meeting", "meet"));
            assert!(contains_word("dr. off", "off"));
            assert!(contains_word("bugun yok", "yok"));
            assert!(contains_word("exam: ayse", "exam"));
        }

        #[test]
        fn embedded_short_tokens_do_not_fire() {
            assert_eq!(rule_for("Offline Selin", None, Some(20)), "fallback");
            assert_eq!(rule_for("Yoksul Ayşe", None, Some(20)), "fallback");
            assert_eq!(rule_for("Example Ayşe", None, Some(20)), "fallback");
            assert_eq!(rule_for("Selin off", None, Some(20)), "busy-keyword");
            assert_eq!(rule_for("Example Ayşe exam", None, Some(20)), "exam-marker");
            assert_eq!(rule_for("Ahmet izinli", None, Some(20)), "busy-keyword");
        }

        #[test]
        fn prefix_boundaries() {
            assert!(starts_with_word("anes ahmet", "anes"));
            assert!(!starts_with_word("anesa", "anes"));
            assert!(starts_with_word("❌ahmet", "❌"));
        }

        #[test]
        fn locale_folding_in_keywords() {
            // Dotted capital İ and dotless ı fold to the same key.
            assert_eq!(classify_for("İZİNLİ", 30), Category::Busy);
            assert_eq!(classify_for("IZINLI", 30), Category::Busy);
            assert_eq!(classify_for("TOPLANTI", 30), Category::Busy);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn classification_is_total_and_never_available(
                title in ".{0,40}",
                color in proptest::option::of("[0-9]{1,2}"),
                minutes in proptest::option::of(0i64..600),
            ) {
                let classifier = Classifier::default();
                let verdict = classifier.explain(&title, color.as_deref(), minutes);
                prop_assert!(Category::ALL.contains(&verdict.category));
                prop_assert_ne!(verdict.category, Category::Available);
            }

            #[test]
            fn red_color_always_cancels_unless_overridden(title in "[a-z0-9 ]{0,30}") {
                let classifier = Classifier::default();
                let verdict = classifier.explain(&title, Some("11"), Some(30));
                let earlier = matches!(verdict.rule, "busy-override" | "anesthesia-prefix");
                prop_assert!(earlier || verdict.category == Category::Cancelled);
            }

            #[test]
            fn classification_is_deterministic(title in ".{0,40}", minutes in 0i64..600) {
                let classifier = Classifier::default();
                let a = classifier.explain(&title, None, Some(minutes));
                let b = classifier.explain(&title, None, Some(minutes));
                prop_assert_eq!(a, b);
            }
        }
    }
}
