//! Shashin style labels and the search parameters each one selects.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse character of a position on the Tal/Capablanca/Petrosian scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleLabel {
    /// Both kings open and under fire ("High Tal").
    UltraAggressive,
    Aggressive,
    /// Aggressive features in a materially rich, otherwise quiet position.
    Balanced,
    Strategic,
    /// Closed, drawish structure ("High Petrosian").
    Fortress,
    #[default]
    Unclassified,
}

/// Exploration constant and playout depth used by the tree search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleParams {
    pub exploration: f64,
    pub max_sim_depth: u32,
}

impl StyleLabel {
    pub const ALL: [StyleLabel; 6] = [
        StyleLabel::UltraAggressive,
        StyleLabel::Aggressive,
        StyleLabel::Balanced,
        StyleLabel::Strategic,
        StyleLabel::Fortress,
        StyleLabel::Unclassified,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            StyleLabel::UltraAggressive => "High Tal",
            StyleLabel::Aggressive => "Tal",
            StyleLabel::Balanced => "Capablanca",
            StyleLabel::Strategic => "Petrosian",
            StyleLabel::Fortress => "High Petrosian",
            StyleLabel::Unclassified => "Balanced",
        }
    }

    /// Short marker used in diagnostics output.
    pub fn tag(self) -> &'static str {
        match self {
            StyleLabel::UltraAggressive => "[FIRE]",
            StyleLabel::Aggressive => "[SWORD]",
            StyleLabel::Balanced => "[SCALE]",
            StyleLabel::Strategic => "[SHIELD]",
            StyleLabel::Fortress => "[CASTLE]",
            StyleLabel::Unclassified => "[?]",
        }
    }

    pub fn is_tal(self) -> bool {
        matches!(self, StyleLabel::UltraAggressive | StyleLabel::Aggressive)
    }

    pub fn is_petrosian(self) -> bool {
        matches!(self, StyleLabel::Strategic | StyleLabel::Fortress)
    }

    pub fn is_capablanca(self) -> bool {
        self == StyleLabel::Balanced
    }

    /// Search parameters for this style.
    ///
    /// Sharper styles explore wider and play out deeper. Unclassified
    /// positions use the configured `default_exploration`.
    pub fn search_params(self, default_exploration: f64) -> StyleParams {
        let (exploration, max_sim_depth) = match self {
            StyleLabel::UltraAggressive => (2.4, 6),
            StyleLabel::Aggressive => (2.0, 5),
            StyleLabel::Balanced => (1.6, 4),
            StyleLabel::Strategic => (1.3, 3),
            StyleLabel::Fortress => (1.1, 2),
            StyleLabel::Unclassified => (default_exploration, 4),
        };
        StyleParams {
            exploration,
            max_sim_depth,
        }
    }
}

impl fmt::Display for StyleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.display_name(), self.tag())
    }
}
