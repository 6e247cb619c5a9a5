use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use rust_embed::Embed;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime,
};
use tracing::{debug, info};

use super::{DataLoadError, Dataset, GlucoseSample};
use crate::config::DataResources;
use crate::core::categories::{CarbCategory, DiabetesStatus, GutHealth, MealPhase};

const COL_SUBJECT: &str = "subject";
const COL_TIMESTAMP: &str = "Timestamp";
const COL_GLUCOSE: &str = "Dexcom GL";
const COL_CARBS: &str = "Carb Category";
const COL_STATUS: &str = "Diabetes Status";
const COL_MEAL: &str = "Meal Phase";

/// Where CSV text comes from. Fetching is the only suspension point of a load.
#[allow(async_fn_in_trait)]
pub trait DataSource {
    async fn fetch(&self, resource: &str) -> Result<String, DataLoadError>;
}

#[derive(Embed)]
#[folder = "data"]
struct BundledData;

/// CSV files compiled into the binary from `ui/data/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl DataSource for EmbeddedSource {
    async fn fetch(&self, resource: &str) -> Result<String, DataLoadError> {
        let file = BundledData::get(resource).ok_or_else(|| DataLoadError::Unreachable {
            resource: resource.to_string(),
            reason: "not bundled".to_string(),
        })?;
        String::from_utf8(file.data.into_owned()).map_err(|err| DataLoadError::Unreachable {
            resource: resource.to_string(),
            reason: err.to_string(),
        })
    }
}

/// Resources held in memory; handy for previews and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    resources: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resource: impl Into<String>, csv: impl Into<String>) -> Self {
        self.resources.insert(resource.into(), csv.into());
        self
    }
}

impl DataSource for MemorySource {
    async fn fetch(&self, resource: &str) -> Result<String, DataLoadError> {
        self.resources
            .get(resource)
            .cloned()
            .ok_or_else(|| DataLoadError::Unreachable {
                resource: resource.to_string(),
                reason: "no such resource".to_string(),
            })
    }
}

/// Loads one dataset per gut-health level and keeps it for the session.
pub struct DatasetLoader<S> {
    source: S,
    resources: DataResources,
    cache: RefCell<HashMap<GutHealth, Rc<Dataset>>>,
    fetches: Cell<usize>,
}

impl<S: DataSource> DatasetLoader<S> {
    pub fn new(source: S, resources: DataResources) -> Self {
        Self {
            source,
            resources,
            cache: RefCell::new(HashMap::new()),
            fetches: Cell::new(0),
        }
    }

    /// Return the dataset for `level`, fetching and parsing it on first use.
    pub async fn load(&self, level: GutHealth) -> Result<Rc<Dataset>, DataLoadError> {
        if let Some(hit) = self.cached(level) {
            debug!(?level, "dataset cache hit");
            return Ok(hit);
        }

        let resource = self.resources.path(level).to_string();
        self.fetches.set(self.fetches.get() + 1);
        let text = self.source.fetch(&resource).await?;
        let dataset = Rc::new(parse_dataset(level, &resource, &text)?);
        info!(
            ?level,
            resource = %resource,
            rows = dataset.len(),
            dropped = dataset.dropped_rows(),
            "dataset loaded"
        );

        // Two overlapping loads for the same level keep whichever finished first.
        let mut cache = self.cache.borrow_mut();
        Ok(cache.entry(level).or_insert(dataset).clone())
    }

    pub fn cached(&self, level: GutHealth) -> Option<Rc<Dataset>> {
        self.cache.borrow().get(&level).cloned()
    }

    /// Number of times the source was actually hit.
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

/// Parse CSV text into a dataset, dropping rows whose carb category or meal
/// phase is blank.
pub fn parse_dataset(
    level: GutHealth,
    resource: &str,
    text: &str,
) -> Result<Dataset, DataLoadError> {
    let csv_err = |err: csv::Error| DataLoadError::Csv {
        resource: resource.to_string(),
        message: err.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(csv_err)?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataLoadError::MissingColumn {
                resource: resource.to_string(),
                column: name,
            })
    };
    let subject_col = column(COL_SUBJECT)?;
    let timestamp_col = column(COL_TIMESTAMP)?;
    let glucose_col = column(COL_GLUCOSE)?;
    let carbs_col = column(COL_CARBS)?;
    let status_col = column(COL_STATUS)?;
    let meal_col = column(COL_MEAL)?;

    let mut samples = Vec::new();
    let mut dropped_rows = 0usize;

    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let carbs_raw = cell(carbs_col);
        let meal_raw = cell(meal_col);
        if carbs_raw.is_empty() || meal_raw.is_empty() {
            dropped_rows += 1;
            continue;
        }

        let unknown = |column: &'static str, value: &str| DataLoadError::UnknownCategory {
            resource: resource.to_string(),
            line,
            column,
            value: value.to_string(),
        };

        let carb_category =
            CarbCategory::parse(carbs_raw).ok_or_else(|| unknown(COL_CARBS, carbs_raw))?;
        let meal_phase =
            MealPhase::parse(meal_raw).ok_or_else(|| unknown(COL_MEAL, meal_raw))?;
        let status_raw = cell(status_col);
        let diabetes_status =
            DiabetesStatus::parse(status_raw).ok_or_else(|| unknown(COL_STATUS, status_raw))?;

        let glucose_raw = cell(glucose_col);
        let glucose_level = glucose_raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DataLoadError::InvalidGlucose {
                resource: resource.to_string(),
                line,
                value: glucose_raw.to_string(),
            })?;

        let timestamp_raw = cell(timestamp_col);
        let timestamp =
            parse_timestamp(timestamp_raw).ok_or_else(|| DataLoadError::InvalidTimestamp {
                resource: resource.to_string(),
                line,
                value: timestamp_raw.to_string(),
            })?;

        samples.push(GlucoseSample {
            subject: cell(subject_col).to_string(),
            timestamp,
            glucose_level,
            carb_category,
            diabetes_status,
            meal_phase,
        });
    }

    Ok(Dataset::new(level, samples, dropped_rows))
}

/// Dexcom exports use `YYYY-MM-DD HH:MM:SS` without an offset; those are read as UTC.
fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts);
    }
    let seconds = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let minutes = format_description!("[year]-[month]-[day] [hour]:[minute]");
    PrimitiveDateTime::parse(raw, &seconds)
        .or_else(|_| PrimitiveDateTime::parse(raw, &minutes))
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}
