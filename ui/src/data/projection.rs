use std::collections::BTreeMap;

use super::{Dataset, GlucoseSample};
use crate::core::categories::{CarbCategory, DiabetesStatus, MealPhase};

/// Time-ordered samples per diabetes status. Always carries all three statuses.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesByStatus {
    series: BTreeMap<DiabetesStatus, Vec<GlucoseSample>>,
}

impl SeriesByStatus {
    /// Three empty series; charts bound to this are cleared.
    pub fn empty() -> Self {
        Self {
            series: DiabetesStatus::ALL
                .into_iter()
                .map(|status| (status, Vec::new()))
                .collect(),
        }
    }

    pub fn get(&self, status: DiabetesStatus) -> &[GlucoseSample] {
        self.series.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = DiabetesStatus> + '_ {
        self.series.keys().copied()
    }

    pub fn total_len(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }
}

/// Samples of `dataset` for one meal and carb level, grouped by diabetes status
/// and sorted by timestamp. Ties keep file order.
pub fn project(dataset: &Dataset, meal: MealPhase, carbs: CarbCategory) -> SeriesByStatus {
    let mut out = SeriesByStatus::empty();
    for sample in dataset
        .samples()
        .iter()
        .filter(|s| s.meal_phase == meal && s.carb_category == carbs)
    {
        out.series
            .entry(sample.diabetes_status)
            .or_default()
            .push(sample.clone());
    }
    for series in out.series.values_mut() {
        series.sort_by_key(|s| s.timestamp);
    }
    out
}
