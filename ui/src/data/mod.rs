//! Glucose datasets: the typed sample model, the cached CSV loader and the
//! meal/carb projection the charts consume.

mod error;
pub use error::DataLoadError;

mod sample;
pub use sample::{Dataset, GlucoseSample};

mod loader;
pub use loader::{parse_dataset, DataSource, DatasetLoader, EmbeddedSource, MemorySource};

mod projection;
pub use projection::{project, SeriesByStatus};
