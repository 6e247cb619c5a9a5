use serde::{Deserialize, Serialize};

use crate::core::categories::MealPhase;

/// Narrative steps in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    Intro,
    GutHealth,
    Breakfast,
    Lunch,
    Dinner,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Intro,
        Section::GutHealth,
        Section::Breakfast,
        Section::Lunch,
        Section::Dinner,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// DOM id / CSS modifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::GutHealth => "gut-health",
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        }
    }

    pub fn meal(self) -> Option<MealPhase> {
        match self {
            Self::Breakfast => Some(MealPhase::Breakfast),
            Self::Lunch => Some(MealPhase::Lunch),
            Self::Dinner => Some(MealPhase::Dinner),
            Self::Intro | Self::GutHealth => None,
        }
    }

    /// Sections that can only be read once a gut-health level is chosen.
    pub fn needs_gut_health(self) -> bool {
        self >= Self::Breakfast
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_reading_order() {
        for (i, section) in Section::ALL.into_iter().enumerate() {
            assert_eq!(section.index(), i);
            assert_eq!(Section::from_index(i), Some(section));
        }
        assert_eq!(Section::from_index(5), None);
    }

    #[test]
    fn only_meal_sections_are_gated() {
        assert!(!Section::GutHealth.needs_gut_health());
        assert!(Section::Breakfast.needs_gut_health());
        assert!(Section::Dinner.needs_gut_health());
        assert_eq!(Section::Lunch.meal(), Some(MealPhase::Lunch));
        assert_eq!(Section::GutHealth.meal(), None);
    }
}
