//! Glucose subplots: scale math, persistent chart handles and their SVG view.

use thiserror::Error;

use crate::core::categories::{DiabetesStatus, MealPhase};

pub mod scale;

mod handle;
pub use handle::{ChartHandle, ChartRegistry, Point, Tick, XAxisKind};

mod view;
pub use view::{plot_frames, GlucoseCharts, PlotFrame};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("no chart handle for the {status} subplot of {meal}")]
    MissingChartHandle {
        meal: MealPhase,
        status: DiabetesStatus,
    },
}
