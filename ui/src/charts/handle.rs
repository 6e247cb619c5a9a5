use std::collections::HashMap;

use tracing::debug;

use super::scale::{extent, LinearScale};
use super::RenderError;
use crate::config::StoryConfig;
use crate::core::categories::{DiabetesStatus, MealPhase};
use crate::core::format;
use crate::data::{GlucoseSample, SeriesByStatus};

pub type Point = (f64, f64);

/// How x values of a subplot are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAxisKind {
    /// Minutes after the meal; the pre-data axis.
    Minutes,
    /// Unix seconds of bound samples.
    Clock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Pixel offset along the axis.
    pub offset: f64,
    pub label: String,
}

/// Path geometry moving from one polyline to another over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
struct PathTransition {
    from: Vec<Point>,
    to: Vec<Point>,
    started_ms: f64,
    duration_ms: f64,
}

impl PathTransition {
    fn settled(points: Vec<Point>) -> Self {
        Self {
            from: points.clone(),
            to: points,
            started_ms: f64::NEG_INFINITY,
            duration_ms: 0.0,
        }
    }

    fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.started_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    fn sample(&self, now_ms: f64, baseline: f64) -> Vec<Point> {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            return self.to.clone();
        }
        if self.from.is_empty() && self.to.is_empty() {
            return Vec::new();
        }
        let n = self.from.len().max(self.to.len());
        let from = resample_or_flatten(&self.from, &self.to, n, baseline);
        let to = resample_or_flatten(&self.to, &self.from, n, baseline);
        let eased = ease_cubic_in_out(t);
        from.iter()
            .zip(&to)
            .map(|(a, b)| (lerp(a.0, b.0, eased), lerp(a.1, b.1, eased)))
            .collect()
    }
}

/// Scale, axis and path state of one subplot. Created once, rebound on every update.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartHandle {
    meal: MealPhase,
    status: DiabetesStatus,
    width: f64,
    height: f64,
    x_kind: XAxisKind,
    x_domain: (f64, f64),
    y_domain: (f64, f64),
    x_ticks: Vec<Tick>,
    y_ticks: Vec<Tick>,
    path: PathTransition,
    bound_len: usize,
    updates: u64,
}

impl ChartHandle {
    pub fn new(meal: MealPhase, status: DiabetesStatus, config: &StoryConfig) -> Self {
        let mut handle = Self {
            meal,
            status,
            width: config.plot_width,
            height: config.plot_height,
            x_kind: XAxisKind::Minutes,
            x_domain: config.default_x_domain,
            y_domain: config.default_y_domain,
            x_ticks: Vec::new(),
            y_ticks: Vec::new(),
            path: PathTransition::settled(Vec::new()),
            bound_len: 0,
            updates: 0,
        };
        handle.refresh_axes(config);
        handle
    }

    /// Rebind to `series`: new domains and ticks now, path animated from
    /// wherever it currently is.
    pub fn bind(&mut self, series: &[GlucoseSample], config: &StoryConfig, now_ms: f64) {
        let current = self.frame(now_ms);

        match (
            extent(series.iter().map(GlucoseSample::unix_seconds), 1_800.0),
            extent(series.iter().map(|s| s.glucose_level), 10.0),
        ) {
            (Some(x), Some(y)) => {
                self.x_kind = XAxisKind::Clock;
                self.x_domain = x;
                self.y_domain = y;
            }
            _ => {
                self.x_kind = XAxisKind::Minutes;
                self.x_domain = config.default_x_domain;
                self.y_domain = config.default_y_domain;
            }
        }
        self.refresh_axes(config);

        let (x, y) = self.scales();
        let target = series
            .iter()
            .map(|s| (x.map(s.unix_seconds()), y.map(s.glucose_level)))
            .collect();

        self.path = PathTransition {
            from: current,
            to: target,
            started_ms: now_ms,
            duration_ms: config.transition_ms,
        };
        self.bound_len = series.len();
        self.updates += 1;
        debug!(meal = ?self.meal, status = ?self.status, samples = self.bound_len, "subplot rebound");
    }

    /// Path vertices as they should be drawn at `now_ms`.
    pub fn frame(&self, now_ms: f64) -> Vec<Point> {
        self.path.sample(now_ms, self.height)
    }

    /// SVG path data for `now_ms`; empty when nothing is bound.
    pub fn path_data(&self, now_ms: f64) -> String {
        let mut d = String::new();
        for (i, (x, y)) in self.frame(now_ms).into_iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            d.push_str(&format!("{cmd}{x:.2},{y:.2}"));
        }
        d
    }

    pub fn is_animating(&self, now_ms: f64) -> bool {
        self.path.progress(now_ms) < 1.0
    }

    pub fn status(&self) -> DiabetesStatus {
        self.status
    }

    pub fn x_kind(&self) -> XAxisKind {
        self.x_kind
    }

    pub fn x_domain(&self) -> (f64, f64) {
        self.x_domain
    }

    pub fn y_domain(&self) -> (f64, f64) {
        self.y_domain
    }

    pub fn x_ticks(&self) -> &[Tick] {
        &self.x_ticks
    }

    pub fn y_ticks(&self) -> &[Tick] {
        &self.y_ticks
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Samples bound by the latest update.
    pub fn bound_len(&self) -> usize {
        self.bound_len
    }

    pub fn update_count(&self) -> u64 {
        self.updates
    }

    fn scales(&self) -> (LinearScale, LinearScale) {
        (
            LinearScale::new(self.x_domain, (0.0, self.width)),
            LinearScale::new(self.y_domain, (self.height, 0.0)),
        )
    }

    fn refresh_axes(&mut self, config: &StoryConfig) {
        let (x, y) = self.scales();
        self.x_ticks = match self.x_kind {
            XAxisKind::Minutes => x
                .time_ticks(config.x_ticks, 60.0)
                .into_iter()
                .map(|v| Tick {
                    offset: x.map(v),
                    label: format::format_hours(v),
                })
                .collect(),
            XAxisKind::Clock => x
                .time_ticks(config.x_ticks, 1.0)
                .into_iter()
                .map(|v| Tick {
                    offset: x.map(v),
                    label: format::format_clock(v),
                })
                .collect(),
        };
        self.y_ticks = y
            .ticks(config.y_ticks)
            .into_iter()
            .map(|v| Tick {
                offset: y.map(v),
                label: format::format_number(v, 0),
            })
            .collect();
    }
}

/// Owns the three subplot handles of every meal section visited so far.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRegistry {
    config: StoryConfig,
    charts: HashMap<MealPhase, [ChartHandle; 3]>,
}

impl ChartRegistry {
    pub fn new(config: StoryConfig) -> Self {
        Self {
            config,
            charts: HashMap::new(),
        }
    }

    /// Handles for `meal`, built with default domains on first call.
    pub fn ensure_chart(&mut self, meal: MealPhase) -> &mut [ChartHandle; 3] {
        let config = &self.config;
        self.charts.entry(meal).or_insert_with(|| {
            debug!(?meal, "creating subplots");
            DiabetesStatus::ALL.map(|status| ChartHandle::new(meal, status, config))
        })
    }

    pub fn handles(&self, meal: MealPhase) -> Option<&[ChartHandle; 3]> {
        self.charts.get(&meal)
    }

    /// Rebind each subplot of `meal` to its status series.
    pub fn update(
        &mut self,
        meal: MealPhase,
        series: &SeriesByStatus,
        now_ms: f64,
    ) -> Result<(), RenderError> {
        let handles = self
            .charts
            .get_mut(&meal)
            .ok_or(RenderError::MissingChartHandle {
                meal,
                status: DiabetesStatus::ALL[0],
            })?;
        for handle in handles.iter_mut() {
            handle.bind(series.get(handle.status), &self.config, now_ms);
        }
        Ok(())
    }

    /// Put every subplot back to its pre-data state.
    pub fn reset(&mut self) {
        for (meal, handles) in self.charts.iter_mut() {
            *handles = DiabetesStatus::ALL.map(|status| ChartHandle::new(*meal, status, &self.config));
        }
    }

    pub fn is_animating(&self, now_ms: f64) -> bool {
        self.charts
            .values()
            .flat_map(|handles| handles.iter())
            .any(|h| h.is_animating(now_ms))
    }

    pub fn config(&self) -> &StoryConfig {
        &self.config
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn ease_cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// `points` stretched to `n` vertices. An empty polyline takes the shape of
/// `other` pressed flat onto the baseline.
fn resample_or_flatten(points: &[Point], other: &[Point], n: usize, baseline: f64) -> Vec<Point> {
    if points.is_empty() {
        return resample(other, n)
            .into_iter()
            .map(|(x, _)| (x, baseline))
            .collect();
    }
    resample(points, n)
}

fn resample(points: &[Point], n: usize) -> Vec<Point> {
    match (points.len(), n) {
        (_, 0) | (0, _) => Vec::new(),
        (1, _) => vec![points[0]; n],
        (len, 1) => vec![points[len - 1]],
        (len, _) => (0..n)
            .map(|k| {
                let pos = k as f64 * (len - 1) as f64 / (n - 1) as f64;
                let lo = pos.floor() as usize;
                let hi = (lo + 1).min(len - 1);
                let t = pos - lo as f64;
                (
                    lerp(points[lo].0, points[hi].0, t),
                    lerp(points[lo].1, points[hi].1, t),
                )
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::categories::{CarbCategory, GutHealth};
    use crate::data::{parse_dataset, project};

    fn series(rows: &[(&str, f64)]) -> Vec<GlucoseSample> {
        let mut text =
            String::from("subject,Timestamp,Dexcom GL,Carb Category,Diabetes Status,Meal Phase");
        for (ts, gl) in rows {
            text.push_str(&format!("\n1,{ts},{gl},Low,No Diabetes,Breakfast Phase"));
        }
        parse_dataset(GutHealth::Good, "mem.csv", &text)
            .unwrap()
            .samples()
            .to_vec()
    }

    #[test]
    fn new_handles_start_on_default_domains() {
        let config = StoryConfig::default();
        let handle = ChartHandle::new(MealPhase::Lunch, DiabetesStatus::PreDiabetes, &config);
        assert_eq!(handle.x_domain(), (0.0, 180.0));
        assert_eq!(handle.y_domain(), (0.0, 200.0));
        assert_eq!(handle.x_kind(), XAxisKind::Minutes);
        assert_eq!(handle.x_ticks().first().map(|t| t.label.as_str()), Some("0hr"));
        assert_eq!(handle.x_ticks().last().map(|t| t.label.as_str()), Some("3hr"));
        assert!(handle.path_data(0.0).is_empty());
    }

    #[test]
    fn bind_takes_domains_from_series_extent() {
        let config = StoryConfig::default();
        let mut handle = ChartHandle::new(MealPhase::Breakfast, DiabetesStatus::NoDiabetes, &config);
        let samples = series(&[
            ("2020-02-13 08:00:00", 90.0),
            ("2020-02-13 09:00:00", 150.0),
            ("2020-02-13 10:00:00", 110.0),
        ]);
        handle.bind(&samples, &config, 0.0);

        assert_eq!(handle.x_kind(), XAxisKind::Clock);
        assert_eq!(handle.y_domain(), (90.0, 150.0));
        let (x0, x1) = handle.x_domain();
        assert_eq!(x1 - x0, 7_200.0);
        assert_eq!(handle.bound_len(), 3);
        assert!(handle.x_ticks().iter().any(|t| t.label == "09:00"));
    }

    #[test]
    fn empty_series_falls_back_to_default_domain() {
        let config = StoryConfig::default();
        let mut handle = ChartHandle::new(MealPhase::Dinner, DiabetesStatus::Type2Diabetes, &config);
        handle.bind(&series(&[("2020-02-13 08:00:00", 90.0)]), &config, 0.0);
        handle.bind(&[], &config, 5_000.0);

        assert_eq!(handle.x_domain(), (0.0, 180.0));
        assert_eq!(handle.y_domain(), (0.0, 200.0));
        assert!(handle.x_domain().0.is_finite() && handle.y_domain().1.is_finite());
        assert!(handle.path_data(10_000.0).is_empty());
    }

    #[test]
    fn single_sample_gets_a_non_degenerate_domain() {
        let config = StoryConfig::default();
        let mut handle = ChartHandle::new(MealPhase::Dinner, DiabetesStatus::NoDiabetes, &config);
        handle.bind(&series(&[("2020-02-13 08:00:00", 120.0)]), &config, 0.0);
        let (y0, y1) = handle.y_domain();
        assert!(y1 > y0);
        let points = handle.frame(config.transition_ms);
        assert!(points.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
    }

    #[test]
    fn transition_runs_for_the_configured_duration() {
        let config = StoryConfig::default();
        let mut handle = ChartHandle::new(MealPhase::Breakfast, DiabetesStatus::NoDiabetes, &config);
        let samples = series(&[("2020-02-13 08:00:00", 90.0), ("2020-02-13 09:00:00", 150.0)]);
        handle.bind(&samples, &config, 100.0);

        assert!(handle.is_animating(100.0));
        assert!(handle.is_animating(600.0));
        assert!(!handle.is_animating(1_100.0));

        // Starts flat on the baseline and ends on the data.
        assert!(handle.frame(100.0).iter().all(|&(_, y)| y == config.plot_height));
        assert_eq!(handle.frame(1_100.0), vec![(0.0, 150.0), (200.0, 0.0)]);
    }

    #[test]
    fn rebinding_mid_flight_supersedes_without_stacking() {
        let config = StoryConfig::default();
        let mut handle = ChartHandle::new(MealPhase::Breakfast, DiabetesStatus::NoDiabetes, &config);
        let first = series(&[("2020-02-13 08:00:00", 90.0), ("2020-02-13 09:00:00", 150.0)]);
        let second = series(&[
            ("2020-02-14 08:00:00", 100.0),
            ("2020-02-14 08:30:00", 180.0),
            ("2020-02-14 09:00:00", 120.0),
        ]);

        handle.bind(&first, &config, 0.0);
        let midway = handle.frame(500.0);
        handle.bind(&second, &config, 500.0);

        // The new transition departs from where the old one was interrupted.
        let restart = handle.frame(500.0);
        assert_eq!(restart.len(), 3);
        assert_eq!(restart[0], midway[0]);
        assert_eq!(restart[2], midway[1]);

        // And finishes on the newest series only.
        assert!(handle.is_animating(1_400.0));
        assert!(!handle.is_animating(1_500.0));
        assert_eq!(handle.frame(1_500.0).len(), 3);
        assert_eq!(handle.update_count(), 2);
    }

    #[test]
    fn registry_creates_handles_once() {
        let mut registry = ChartRegistry::new(StoryConfig::default());
        registry.ensure_chart(MealPhase::Lunch)[0].bind(&[], &StoryConfig::default(), 0.0);
        let again = registry.ensure_chart(MealPhase::Lunch);
        assert_eq!(again[0].update_count(), 1);
        let statuses: Vec<_> = again.iter().map(|h| h.status()).collect();
        assert_eq!(statuses, DiabetesStatus::ALL.to_vec());
    }

    #[test]
    fn update_without_handles_is_a_recoverable_error() {
        let mut registry = ChartRegistry::new(StoryConfig::default());
        let err = registry
            .update(MealPhase::Dinner, &SeriesByStatus::empty(), 0.0)
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::MissingChartHandle {
                meal: MealPhase::Dinner,
                ..
            }
        ));
        assert!(registry.handles(MealPhase::Dinner).is_none());
    }

    #[test]
    fn update_binds_each_status_to_its_own_series() {
        let text = "\
subject,Timestamp,Dexcom GL,Carb Category,Diabetes Status,Meal Phase
1,2020-02-13 08:00:00,90,Low,No Diabetes,Breakfast Phase
1,2020-02-13 08:15:00,120,Low,No Diabetes,Breakfast Phase
2,2020-02-13 08:00:00,150,Low,Type 2 Diabetes,Breakfast Phase
";
        let dataset = parse_dataset(GutHealth::Good, "mem.csv", text).unwrap();
        let projected = project(&dataset, MealPhase::Breakfast, CarbCategory::Low);

        let mut registry = ChartRegistry::new(StoryConfig::default());
        registry.ensure_chart(MealPhase::Breakfast);
        registry.update(MealPhase::Breakfast, &projected, 0.0).unwrap();

        let handles = registry.handles(MealPhase::Breakfast).unwrap();
        let bound: Vec<_> = handles.iter().map(|h| h.bound_len()).collect();
        assert_eq!(bound, vec![2, 0, 1]);
        assert!(registry.is_animating(10.0));
        assert!(!registry.is_animating(2_000.0));
    }

    #[test]
    fn reset_returns_subplots_to_their_empty_defaults() {
        let config = StoryConfig::default();
        let mut registry = ChartRegistry::new(config.clone());
        registry.ensure_chart(MealPhase::Lunch);
        let samples = series(&[("2020-02-13 12:00:00", 110.0), ("2020-02-13 12:30:00", 160.0)]);
        registry.ensure_chart(MealPhase::Lunch)[0].bind(&samples, &config, 0.0);

        registry.reset();

        let handles = registry.handles(MealPhase::Lunch).expect("handles survive a reset");
        for handle in handles.iter() {
            assert_eq!(handle.bound_len(), 0);
            assert_eq!(handle.update_count(), 0);
            assert_eq!(handle.x_kind(), XAxisKind::Minutes);
            assert_eq!(handle.y_domain(), config.default_y_domain);
            assert!(handle.path_data(5_000.0).is_empty());
        }
        assert!(registry.handles(MealPhase::Dinner).is_none());
    }
}
