use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Section;
use crate::core::categories::{CarbCategory, GutHealth};

/// Button labels offered in each section, in display order.
/// Sections without an entry show no buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceTable {
    choices: BTreeMap<Section, Vec<String>>,
}

impl ChoiceTable {
    pub fn new(choices: BTreeMap<Section, Vec<String>>) -> Self {
        Self { choices }
    }

    pub fn options(&self, section: Section) -> &[String] {
        self.choices.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for ChoiceTable {
    fn default() -> Self {
        let gut: Vec<String> = GutHealth::ALL.iter().map(|g| g.label().to_string()).collect();
        let carbs: Vec<String> = CarbCategory::ALL
            .iter()
            .map(|c| c.label().to_string())
            .collect();

        let mut choices = BTreeMap::new();
        choices.insert(Section::GutHealth, gut);
        for section in [Section::Breakfast, Section::Lunch, Section::Dinner] {
            choices.insert(section, carbs.clone());
        }
        Self::new(choices)
    }
}
