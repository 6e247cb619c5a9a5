//! The narrative: its sections, the choices each offers, scroll-to-step
//! tracking and the session state machine that ties them to the charts.

mod section;
pub use section::Section;

mod options;
pub use options::ChoiceTable;

mod scroll;
pub use scroll::{ScrollSample, StepTracker};

mod machine;
pub use machine::{SelectionState, StoryCommand, StoryEvent, StorySession};
