//! Localized, privacy-safe labels for outbound records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Display language for generated titles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Turkish.
    #[default]
    Tr,
    /// English.
    En,
}

impl Language {
    /// Returns the ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Tr => "tr",
            Self::En => "en",
        }
    }

    /// Returns the generic label shown in place of an event's real title.
    pub fn label(&self, category: Category) -> &'static str {
        match (self, category) {
            (Self::Tr, Category::Surgery) => "Ameliyat",
            (Self::Tr, Category::Control) => "Kontrol",
            (Self::Tr, Category::Exam) => "Muayene",
            (Self::Tr, Category::Online) => "Online Görüşme",
            (Self::Tr, Category::Busy) => "Meşgul",
            (Self::Tr, Category::Available) => "Müsait",
            (Self::Tr, Category::Cancelled) => "İptal",
            (Self::Tr, Category::Anesthesia) => "Anestezi",
            (Self::En, Category::Surgery) => "Surgery",
            (Self::En, Category::Control) => "Control Visit",
            (Self::En, Category::Exam) => "Examination",
            (Self::En, Category::Online) => "Online Consultation",
            (Self::En, Category::Busy) => "Busy",
            (Self::En, Category::Available) => "Available",
            (Self::En, Category::Cancelled) => "Cancelled",
            (Self::En, Category::Anesthesia) => "Anesthesia",
        }
    }

    /// Builds the title of a merged block, e.g. `"3 Kontrol, 1 Muayene"`.
    ///
    /// Counts are listed in the order given; zero counts are skipped.
    pub fn summary(&self, counts: &[(Category, usize)]) -> String {
        counts
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(category, n)| format!("{} {}", n, self.label(*category)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tr" | "turkish" => Ok(Self::Tr),
            "en" | "english" => Ok(Self::En),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}
