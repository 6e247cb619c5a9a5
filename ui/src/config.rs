//! Layout, animation and data-source settings for the story.

use serde::{Deserialize, Serialize};

use crate::core::categories::GutHealth;
use crate::story::ChoiceTable;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 50.0,
            right: 50.0,
            bottom: 50.0,
            left: 50.0,
        }
    }
}

/// Which bundled CSV backs each gut-health level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResources {
    pub good: String,
    pub average: String,
    pub bad: String,
}

impl DataResources {
    pub fn path(&self, level: GutHealth) -> &str {
        match level {
            GutHealth::Good => &self.good,
            GutHealth::Average => &self.average,
            GutHealth::Bad => &self.bad,
        }
    }
}

impl Default for DataResources {
    fn default() -> Self {
        Self {
            bad: "gutdata/gut1.csv".into(),
            average: "gutdata/gut2.csv".into(),
            good: "gutdata/gut3.csv".into(),
        }
    }
}

/// Inner drawing area of one section's SVG canvas (margins excluded).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    pub margin: Margin,
    pub plot_width: f64,
    pub plot_height: f64,
    /// Share of the viewport height given to a section canvas.
    pub canvas_height_ratio: f64,
    pub transition_ms: f64,
    /// Viewport fraction a step's top edge must cross before it is entered.
    pub step_offset: f64,
    /// Minutes after the meal; shown before any data is bound.
    pub default_x_domain: (f64, f64),
    /// mg/dL
    pub default_y_domain: (f64, f64),
    pub x_ticks: usize,
    pub y_ticks: usize,
    pub resources: DataResources,
    pub choices: ChoiceTable,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            margin: Margin::default(),
            plot_width: 200.0,
            plot_height: 150.0,
            canvas_height_ratio: 0.8,
            transition_ms: 1000.0,
            step_offset: 0.1,
            default_x_domain: (0.0, 180.0),
            default_y_domain: (0.0, 200.0),
            x_ticks: 6,
            y_ticks: 5,
            resources: DataResources::default(),
            choices: ChoiceTable::default(),
        }
    }
}

impl StoryConfig {
    /// Canvas for a viewport, never smaller than the three subplots need.
    pub fn canvas(&self, viewport_width: f64, viewport_height: f64) -> Canvas {
        let width = viewport_width - self.margin.left - self.margin.right;
        let height =
            viewport_height * self.canvas_height_ratio - self.margin.top - self.margin.bottom;
        Canvas {
            width: width.max(self.plot_width * 4.0),
            height: height.max(self.plot_height * 1.5),
        }
    }

    /// Top-left corner of subplot `index` (0..3), centred on the quarter lines.
    pub fn plot_origin(&self, canvas: Canvas, index: usize) -> (f64, f64) {
        let x = (index as f64 + 1.0) * (canvas.width / 4.0) - self.plot_width / 2.0;
        let y = (canvas.height - self.plot_height) / 2.0;
        (x, y)
    }
}
