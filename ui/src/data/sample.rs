use time::OffsetDateTime;

use crate::core::categories::{CarbCategory, DiabetesStatus, GutHealth, MealPhase};

/// One continuous-glucose-monitor reading.
#[derive(Debug, Clone, PartialEq)]
pub struct GlucoseSample {
    pub subject: String,
    pub timestamp: OffsetDateTime,
    /// mg/dL
    pub glucose_level: f64,
    pub carb_category: CarbCategory,
    pub diabetes_status: DiabetesStatus,
    pub meal_phase: MealPhase,
}

impl GlucoseSample {
    /// x coordinate used by the charts.
    pub fn unix_seconds(&self) -> f64 {
        self.timestamp.unix_timestamp() as f64
    }
}

/// All valid samples for one gut-health level, in file order.
///
/// Immutable once built; a new selection replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    level: GutHealth,
    samples: Vec<GlucoseSample>,
    dropped_rows: usize,
}

impl Dataset {
    pub fn new(level: GutHealth, samples: Vec<GlucoseSample>, dropped_rows: usize) -> Self {
        Self {
            level,
            samples,
            dropped_rows,
        }
    }

    pub fn level(&self) -> GutHealth {
        self.level
    }

    pub fn samples(&self) -> &[GlucoseSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Rows skipped at load time because their carb category or meal phase was blank.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }
}
