//! Categorical vocabulary shared by the dataset, the selections and the charts.
//!
//! Every categorical string that enters the crate (CSV cells, button labels,
//! stored selections) goes through [`canonical_token`] first, so `"Breakfast Phase"`,
//! `"breakfast"` and `" BREAKFAST  phase "` all resolve to the same variant.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lower-case `raw`, trim it and collapse every whitespace/underscore/hyphen run
/// into a single `-`.
///
/// `"Good Gut Health"` → `"good-gut-health"`, `"bad-gut health"` → `"bad-gut-health"`.
pub fn canonical_token(raw: &str) -> String {
    let mut token = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_sep = !token.is_empty();
            continue;
        }
        if pending_sep {
            token.push('-');
            pending_sep = false;
        }
        token.extend(ch.to_lowercase());
    }
    token
}

/// Gut-health level picked in the second narrative step; selects the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GutHealth {
    Good,
    Average,
    Bad,
}

impl GutHealth {
    pub const ALL: [GutHealth; 3] = [GutHealth::Good, GutHealth::Average, GutHealth::Bad];

    pub fn parse(raw: &str) -> Option<Self> {
        let token = canonical_token(raw);
        let stem = token
            .strip_suffix("-gut-health")
            .or_else(|| token.strip_suffix("-gut"))
            .unwrap_or(&token);
        match stem {
            "good" => Some(Self::Good),
            "average" => Some(Self::Average),
            "bad" => Some(Self::Bad),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good Gut Health",
            Self::Average => "Average Gut Health",
            Self::Bad => "Bad Gut Health",
        }
    }

    pub fn canonical_id(self) -> String {
        canonical_token(self.label())
    }
}

/// Carbohydrate content of a meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CarbCategory {
    Low,
    Moderate,
    High,
}

impl CarbCategory {
    pub const ALL: [CarbCategory; 3] = [
        CarbCategory::Low,
        CarbCategory::Moderate,
        CarbCategory::High,
    ];

    /// Accepts both data cells (`"Low"`) and button tokens (`"low-carb"`).
    /// `medium` is an older alias of `moderate`.
    pub fn parse(raw: &str) -> Option<Self> {
        let token = canonical_token(raw);
        let stem = token.strip_suffix("-carb").unwrap_or(&token);
        match stem {
            "low" => Some(Self::Low),
            "moderate" | "medium" => Some(Self::Moderate),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Carb",
            Self::Moderate => "Moderate Carb",
            Self::High => "High Carb",
        }
    }

    pub fn canonical_id(self) -> String {
        canonical_token(self.label())
    }
}

/// Diabetes status of a subject. Each status owns one of the three subplots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiabetesStatus {
    NoDiabetes,
    PreDiabetes,
    Type2Diabetes,
}

impl DiabetesStatus {
    /// Subplot order, left to right.
    pub const ALL: [DiabetesStatus; 3] = [
        DiabetesStatus::NoDiabetes,
        DiabetesStatus::PreDiabetes,
        DiabetesStatus::Type2Diabetes,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match canonical_token(raw).as_str() {
            "no-diabetes" | "healthy" => Some(Self::NoDiabetes),
            "pre-diabetes" | "prediabetes" | "pre-diabetic" => Some(Self::PreDiabetes),
            "type-2-diabetes" | "type2-diabetes" | "type-2" | "diabetic" => {
                Some(Self::Type2Diabetes)
            }
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NoDiabetes => "No Diabetes",
            Self::PreDiabetes => "Pre-Diabetes",
            Self::Type2Diabetes => "Type 2 Diabetes",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::NoDiabetes => 0,
            Self::PreDiabetes => 1,
            Self::Type2Diabetes => 2,
        }
    }

    pub fn stroke(self) -> &'static str {
        match self {
            Self::NoDiabetes => "green",
            Self::PreDiabetes => "orange",
            Self::Type2Diabetes => "red",
        }
    }
}

/// Meal phase: both a data column and a narrative step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MealPhase {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealPhase {
    pub const ALL: [MealPhase; 3] = [MealPhase::Breakfast, MealPhase::Lunch, MealPhase::Dinner];

    /// The CSV spells these `"Breakfast Phase"`; the suffix is dropped here.
    pub fn parse(raw: &str) -> Option<Self> {
        let token = canonical_token(raw);
        let stem = token.strip_suffix("-phase").unwrap_or(&token);
        match stem {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            Self::Breakfast => "#FFDAB9",
            Self::Lunch => "#FFFACD",
            Self::Dinner => "#D8BFD8",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),+) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })+
    };
}

display_via_label!(GutHealth, CarbCategory, DiabetesStatus, MealPhase);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_token_collapses_spacing_and_case() {
        assert_eq!(canonical_token("Good Gut Health"), "good-gut-health");
        assert_eq!(canonical_token("bad-gut health"), "bad-gut-health");
        assert_eq!(canonical_token("  High   Carb "), "high-carb");
        assert_eq!(canonical_token("Type 2 Diabetes"), "type-2-diabetes");
        assert_eq!(canonical_token(""), "");
    }

    #[test]
    fn gut_health_accepts_every_spelling_seen_in_the_wild() {
        assert_eq!(GutHealth::parse("bad-gut health"), Some(GutHealth::Bad));
        assert_eq!(GutHealth::parse("bad-gut-health"), Some(GutHealth::Bad));
        assert_eq!(GutHealth::parse("Average Gut Health"), Some(GutHealth::Average));
        assert_eq!(GutHealth::parse("good"), Some(GutHealth::Good));
        assert_eq!(GutHealth::parse("great"), None);
    }

    #[test]
    fn carb_category_reads_cells_and_button_tokens() {
        assert_eq!(CarbCategory::parse("Low"), Some(CarbCategory::Low));
        assert_eq!(CarbCategory::parse("low-carb"), Some(CarbCategory::Low));
        assert_eq!(CarbCategory::parse("Medium Carb"), Some(CarbCategory::Moderate));
        assert_eq!(CarbCategory::parse("HIGH"), Some(CarbCategory::High));
        assert_eq!(CarbCategory::parse(""), None);
        assert_eq!(CarbCategory::High.canonical_id(), "high-carb");
    }

    #[test]
    fn meal_phase_strips_phase_suffix() {
        assert_eq!(MealPhase::parse("Breakfast Phase"), Some(MealPhase::Breakfast));
        assert_eq!(MealPhase::parse("lunch"), Some(MealPhase::Lunch));
        assert_eq!(MealPhase::parse("Dinner  Phase"), Some(MealPhase::Dinner));
        assert_eq!(MealPhase::parse("Snack Phase"), None);
    }

    #[test]
    fn diabetes_status_round_trips_through_labels() {
        for status in DiabetesStatus::ALL {
            assert_eq!(DiabetesStatus::parse(status.label()), Some(status));
        }
        assert_eq!(DiabetesStatus::ALL[2].stroke(), "red");
    }
}
