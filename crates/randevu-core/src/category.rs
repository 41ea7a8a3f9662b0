//! The closed set of public-facing event categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The coarse, privacy-safe classification of a calendar event.
///
/// `Available` is never produced by the classifier; only the availability
/// deriver synthesizes it. `Cancelled` events are dropped before merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Surgery,
    Control,
    Exam,
    Online,
    Busy,
    Available,
    Cancelled,
    Anesthesia,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 8] = [
        Self::Surgery,
        Self::Control,
        Self::Exam,
        Self::Online,
        Self::Busy,
        Self::Available,
        Self::Cancelled,
        Self::Anesthesia,
    ];

    /// Returns the wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Surgery => "surgery",
            Self::Control => "control",
            Self::Exam => "exam",
            Self::Online => "online",
            Self::Busy => "busy",
            Self::Available => "available",
            Self::Cancelled => "cancelled",
            Self::Anesthesia => "anesthesia",
        }
    }

    /// Returns true if events of this category occupy the calendar.
    pub fn is_busy(&self) -> bool {
        !matches!(self, Self::Available | Self::Cancelled)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
