//! Session state machine for the scrolling story.
//!
//! All state of a reading session lives in [`StorySession`] and changes only
//! through [`StorySession::dispatch`]. Dispatch never performs I/O: it returns
//! [`StoryCommand`]s (load a dataset, scroll somewhere) for the caller to run,
//! and the caller reports outcomes back as further [`StoryEvent`]s.
//!
//! Ordering at the async boundary:
//! - a meal section entered before its dataset arrives renders nothing and is
//!   rendered again when `DatasetLoaded` comes in;
//! - a `DatasetLoaded` for a level other than the current selection is dropped.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use tracing::{debug, info, warn};

use super::Section;
use crate::charts::{ChartRegistry, RenderError};
use crate::config::StoryConfig;
use crate::core::categories::{CarbCategory, GutHealth, MealPhase};
use crate::data::{project, DataLoadError, Dataset};
use crate::interaction::ChoiceSurface;

/// Inputs to the session, from the scroll tracker, the buttons and the loader.
#[derive(Debug, Clone)]
pub enum StoryEvent {
    SectionEntered {
        index: usize,
        progress: f64,
    },
    SectionExited {
        index: usize,
    },
    ChoiceMade {
        section: Section,
        generation: u64,
        value: String,
    },
    DatasetLoaded {
        level: GutHealth,
        result: Result<Rc<Dataset>, DataLoadError>,
    },
}

/// Side effects requested by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryCommand {
    LoadDataset { level: GutHealth },
    ScrollToSection { index: usize },
}

/// What the reader has picked so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub gut_health: Option<GutHealth>,
    pub meals: BTreeMap<MealPhase, Option<CarbCategory>>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            gut_health: None,
            meals: MealPhase::ALL.into_iter().map(|meal| (meal, None)).collect(),
        }
    }
}

impl SelectionState {
    pub fn carbs(&self, meal: MealPhase) -> Option<CarbCategory> {
        self.meals.get(&meal).copied().flatten()
    }

    fn set_carbs(&mut self, meal: MealPhase, carbs: CarbCategory) {
        self.meals.insert(meal, Some(carbs));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorySession {
    config: StoryConfig,
    active: Option<Section>,
    visited: BTreeSet<Section>,
    selection: SelectionState,
    dataset: Option<Rc<Dataset>>,
    pending_load: Option<GutHealth>,
    last_error: Option<String>,
    charts: ChartRegistry,
    choices: ChoiceSurface,
}

impl StorySession {
    pub fn new(config: StoryConfig) -> Self {
        Self {
            charts: ChartRegistry::new(config.clone()),
            config,
            active: None,
            visited: BTreeSet::new(),
            selection: SelectionState::default(),
            dataset: None,
            pending_load: None,
            last_error: None,
            choices: ChoiceSurface::default(),
        }
    }

    pub fn dispatch(&mut self, event: StoryEvent, now_ms: f64) -> Vec<StoryCommand> {
        match event {
            StoryEvent::SectionEntered { index, progress } => {
                self.enter_section(index, progress, now_ms)
            }
            StoryEvent::SectionExited { index } => {
                self.exit_section(index);
                Vec::new()
            }
            StoryEvent::ChoiceMade {
                section,
                generation,
                value,
            } => self.choose(section, generation, &value, now_ms),
            StoryEvent::DatasetLoaded { level, result } => {
                self.dataset_loaded(level, result, now_ms)
            }
        }
    }

    fn enter_section(&mut self, index: usize, progress: f64, now_ms: f64) -> Vec<StoryCommand> {
        let Some(section) = Section::from_index(index) else {
            warn!(index, "entered unknown section");
            return Vec::new();
        };

        if section.needs_gut_health() && self.selection.gut_health.is_none() {
            info!(?section, "gut health not chosen yet; sending reader back");
            return self.send_back_to_gut_health();
        }

        debug!(?section, progress, "section entered");
        self.activate(section);

        match section.meal() {
            None if section == Section::GutHealth => self.present_gut_choices(),
            None => self.choices.hide(),
            Some(meal) => {
                self.charts.ensure_chart(meal);
                let carbs = match self.selection.carbs(meal) {
                    Some(carbs) => carbs,
                    None => {
                        self.selection.set_carbs(meal, CarbCategory::Low);
                        CarbCategory::Low
                    }
                };
                let labels = self.config.choices.options(section).to_vec();
                self.choices
                    .present(section, &labels, Some(carbs.canonical_id()));
                self.render_meal(meal, now_ms);
            }
        }
        Vec::new()
    }

    fn exit_section(&mut self, index: usize) {
        let Some(section) = Section::from_index(index) else {
            return;
        };
        debug!(?section, "section exited");
        if section == Section::GutHealth && self.choices.section() == Some(Section::GutHealth) {
            self.choices.hide();
        }
    }

    fn choose(
        &mut self,
        section: Section,
        generation: u64,
        value: &str,
        now_ms: f64,
    ) -> Vec<StoryCommand> {
        let Some(value) = self.choices.accept(section, generation, value) else {
            debug!(?section, generation, value, "ignoring stale or unknown choice");
            return Vec::new();
        };

        if section == Section::GutHealth {
            let Some(level) = GutHealth::parse(&value) else {
                warn!(value = %value, "choice is not a gut-health level");
                return Vec::new();
            };
            return self.select_gut_health(level);
        }

        let Some(meal) = section.meal() else {
            return Vec::new();
        };
        let Some(carbs) = CarbCategory::parse(&value) else {
            warn!(value = %value, "choice is not a carb category");
            return Vec::new();
        };
        info!(?meal, ?carbs, "carb level chosen");
        self.selection.set_carbs(meal, carbs);
        self.render_meal(meal, now_ms);
        Vec::new()
    }

    fn select_gut_health(&mut self, level: GutHealth) -> Vec<StoryCommand> {
        let already_loaded = self.dataset.as_ref().is_some_and(|d| d.level() == level);
        let in_flight = self.pending_load == Some(level);
        self.selection.gut_health = Some(level);
        self.last_error = None;
        if already_loaded || in_flight {
            debug!(?level, in_flight, "gut health unchanged");
            return Vec::new();
        }

        info!(?level, "gut health chosen; loading dataset");
        if self.dataset.take().is_some() {
            self.charts.reset();
        }
        self.pending_load = Some(level);
        vec![StoryCommand::LoadDataset { level }]
    }

    fn dataset_loaded(
        &mut self,
        level: GutHealth,
        result: Result<Rc<Dataset>, DataLoadError>,
        now_ms: f64,
    ) -> Vec<StoryCommand> {
        if self.selection.gut_health != Some(level) {
            info!(?level, current = ?self.selection.gut_health, "discarding stale dataset load");
            return Vec::new();
        }
        self.pending_load = None;

        match result {
            Ok(dataset) => {
                debug!(?level, rows = dataset.len(), "dataset ready");
                self.dataset = Some(dataset);
                self.last_error = None;
                if let Some(meal) = self.active.and_then(Section::meal) {
                    self.render_meal(meal, now_ms);
                }
                Vec::new()
            }
            Err(err) => {
                warn!(?level, error = %err, "dataset load failed");
                self.last_error = Some(err.to_string());
                self.selection.gut_health = None;
                match self.active {
                    Some(Section::GutHealth) => {
                        self.present_gut_choices();
                        Vec::new()
                    }
                    Some(section) if section.needs_gut_health() => {
                        info!(?section, "no gut-health data; sending reader back");
                        self.send_back_to_gut_health()
                    }
                    _ => Vec::new(),
                }
            }
        }
    }

    /// Project the dataset for `meal` and rebind its subplots.
    /// Returns whether the charts were updated.
    fn render_meal(&mut self, meal: MealPhase, now_ms: f64) -> bool {
        let Some(dataset) = self.dataset.as_ref().filter(|d| !d.is_empty()) else {
            debug!(?meal, "dataset not ready; render deferred");
            return false;
        };
        let Some(carbs) = self.selection.carbs(meal) else {
            return false;
        };

        let series = project(dataset, meal, carbs);
        match self.charts.update(meal, &series, now_ms) {
            Ok(()) => {
                debug!(?meal, ?carbs, samples = series.total_len(), "charts updated");
                true
            }
            Err(err @ RenderError::MissingChartHandle { .. }) => {
                warn!(error = %err, "skipping render");
                false
            }
        }
    }

    fn send_back_to_gut_health(&mut self) -> Vec<StoryCommand> {
        self.activate(Section::GutHealth);
        self.present_gut_choices();
        vec![StoryCommand::ScrollToSection {
            index: Section::GutHealth.index(),
        }]
    }

    fn activate(&mut self, section: Section) {
        self.active = Some(section);
        self.visited.insert(section);
    }

    fn present_gut_choices(&mut self) {
        let labels = self.config.choices.options(Section::GutHealth).to_vec();
        let active = self.selection.gut_health.map(GutHealth::canonical_id);
        self.choices.present(Section::GutHealth, &labels, active);
    }

    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    pub fn active_section(&self) -> Option<Section> {
        self.active
    }

    pub fn has_visited(&self, section: Section) -> bool {
        self.visited.contains(&section)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn dataset(&self) -> Option<&Rc<Dataset>> {
        self.dataset.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    pub fn choices(&self) -> &ChoiceSurface {
        &self.choices
    }

    /// Page background for the active section.
    pub fn background(&self) -> Option<&'static str> {
        self.active.and_then(Section::meal).map(MealPhase::background)
    }
}
