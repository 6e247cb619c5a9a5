use serde::Deserialize;

use super::StoryEvent;

/// What the page reports on every scroll or resize.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScrollSample {
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Turns raw scroll positions into step enter/exit events.
///
/// Every step is one viewport tall; a step is entered once its top edge
/// crosses `offset` of the viewport height.
#[derive(Debug, Clone, PartialEq)]
pub struct StepTracker {
    steps: usize,
    offset: f64,
    current: Option<usize>,
}

impl StepTracker {
    pub fn new(steps: usize) -> Self {
        Self {
            steps,
            offset: 0.1,
            current: None,
        }
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset.clamp(0.0, 1.0);
        self
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn observe(&mut self, scroll_y: f64, viewport_height: f64) -> Vec<StoryEvent> {
        if self.steps == 0 || !(viewport_height > 0.0) || !scroll_y.is_finite() {
            return Vec::new();
        }
        let position = (scroll_y.max(0.0) + self.offset * viewport_height) / viewport_height;
        let index = (position.floor() as usize).min(self.steps - 1);
        let progress = if index == self.steps - 1 && position >= self.steps as f64 {
            1.0
        } else {
            position.fract()
        };

        if self.current == Some(index) {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        if let Some(previous) = self.current.replace(index) {
            events.push(StoryEvent::SectionExited { index: previous });
        }
        events.push(StoryEvent::SectionEntered { index, progress });
        events
    }
}
