//! Reader walkthroughs driven through the public session API, with the
//! loader and scroll tracker standing in for the browser.

use futures::executor::block_on;

use ui::config::StoryConfig;
use ui::core::categories::{CarbCategory, DiabetesStatus, GutHealth, MealPhase};
use ui::data::{DatasetLoader, MemorySource};
use ui::story::{Section, StepTracker, StoryCommand, StoryEvent, StorySession};

const VIEWPORT: f64 = 800.0;

fn csv() -> String {
    let mut text =
        String::from("subject,Timestamp,Dexcom GL,Carb Category,Diabetes Status,Meal Phase");
    let statuses = ["No Diabetes", "Pre-Diabetes", "Type 2 Diabetes"];
    for (s, status) in statuses.iter().enumerate() {
        for (c, carbs) in ["Low", "Moderate", "High"].iter().enumerate() {
            for step in 0..4 {
                let glucose = 90 + s * 30 + c * 20 + step * 5;
                let minute = step * 15;
                text.push_str(&format!(
                    "\n{s},2020-02-13 08:{minute:02}:00,{glucose},{carbs},{status},Breakfast Phase"
                ));
            }
        }
    }
    // Rows the loader must drop.
    text.push_str("\n9,2020-02-13 08:00:00,120,,No Diabetes,Breakfast Phase");
    text.push_str("\n9,2020-02-13 12:00:00,120,Low,No Diabetes,");
    text
}

struct Reader {
    session: StorySession,
    tracker: StepTracker,
    loader: DatasetLoader<MemorySource>,
    clock: f64,
}

impl Reader {
    fn new() -> Self {
        let config = StoryConfig::default();
        let source = MemorySource::new().with(config.resources.path(GutHealth::Good), csv());
        Self {
            loader: DatasetLoader::new(source, config.resources.clone()),
            tracker: StepTracker::new(Section::ALL.len()),
            session: StorySession::new(config),
            clock: 0.0,
        }
    }

    fn scroll_to(&mut self, section: Section) -> Vec<StoryCommand> {
        let events = self
            .tracker
            .observe(section.index() as f64 * VIEWPORT, VIEWPORT);
        let mut commands = Vec::new();
        for event in events {
            commands.extend(self.send(event));
        }
        commands
    }

    fn click(&mut self, label: &str) -> Vec<StoryCommand> {
        let choices = self.session.choices();
        let section = choices.section().expect("buttons on screen");
        let generation = choices.generation();
        self.send(StoryEvent::ChoiceMade {
            section,
            generation,
            value: label.to_string(),
        })
    }

    /// Run load commands to completion, like the UI coroutine does.
    fn run(&mut self, commands: Vec<StoryCommand>) -> Vec<StoryCommand> {
        let mut rest = Vec::new();
        for command in commands {
            match command {
                StoryCommand::LoadDataset { level } => {
                    let result = block_on(self.loader.load(level));
                    rest.extend(self.send(StoryEvent::DatasetLoaded { level, result }));
                }
                other => rest.push(other),
            }
        }
        rest
    }

    fn send(&mut self, event: StoryEvent) -> Vec<StoryCommand> {
        self.clock += 16.0;
        self.session.dispatch(event, self.clock)
    }
}

#[test]
fn choosing_high_carb_at_breakfast_rerenders_the_charts() {
    let mut reader = Reader::new();

    reader.scroll_to(Section::Intro);
    reader.scroll_to(Section::GutHealth);
    let commands = reader.click("Good Gut Health");
    assert!(reader.run(commands).is_empty());

    let dataset = reader.session.dataset().expect("dataset loaded");
    assert_eq!(dataset.level(), GutHealth::Good);
    assert_eq!(dataset.len(), 36);
    assert_eq!(dataset.dropped_rows(), 2);

    assert!(reader.scroll_to(Section::Breakfast).is_empty());
    assert_eq!(
        reader.session.selection().carbs(MealPhase::Breakfast),
        Some(CarbCategory::Low)
    );
    let handles = reader
        .session
        .charts()
        .handles(MealPhase::Breakfast)
        .expect("breakfast charts");
    assert_eq!(handles.len(), 3);
    for status in DiabetesStatus::ALL {
        let handle = &handles[status.index()];
        assert_eq!(handle.status(), status);
        assert_eq!(handle.bound_len(), 4);
        assert_eq!(handle.update_count(), 1);
    }
    let low_peak = handles[0].y_domain().1;

    reader.click("High Carb");
    assert_eq!(
        reader.session.selection().carbs(MealPhase::Breakfast),
        Some(CarbCategory::High)
    );
    assert_eq!(reader.session.choices().active(), Some("high-carb"));

    let handles = reader.session.charts().handles(MealPhase::Breakfast).unwrap();
    assert!(handles.iter().all(|h| h.update_count() == 2));
    assert!(handles[0].y_domain().1 > low_peak);
    assert!(reader.session.charts().is_animating(reader.clock));
}

#[test]
fn skipping_ahead_is_sent_back_to_gut_health() {
    let mut reader = Reader::new();
    reader.scroll_to(Section::Intro);

    let commands = reader.scroll_to(Section::Lunch);
    assert_eq!(commands, vec![StoryCommand::ScrollToSection { index: 1 }]);
    assert_eq!(reader.session.active_section(), Some(Section::GutHealth));
    assert!(reader.session.choices().is_visible());

    reader.scroll_to(Section::GutHealth);
    let commands = reader.click("good-gut-health");
    reader.run(commands);
    assert!(reader.scroll_to(Section::Lunch).is_empty());
    assert_eq!(reader.session.active_section(), Some(Section::Lunch));
}

#[test]
fn missing_resource_leaves_the_reader_able_to_retry() {
    let mut reader = Reader::new();
    reader.scroll_to(Section::GutHealth);

    let commands = reader.click("Bad Gut Health");
    reader.run(commands);
    assert!(reader.session.dataset().is_none());
    assert!(reader.session.last_error().is_some());
    assert_eq!(reader.session.selection().gut_health, None);

    let commands = reader.click("Good Gut Health");
    reader.run(commands);
    assert_eq!(
        reader.session.dataset().map(|d| d.level()),
        Some(GutHealth::Good)
    );
    assert_eq!(reader.session.last_error(), None);
}

#[test]
fn each_meal_remembers_its_own_choice() {
    let mut reader = Reader::new();
    reader.scroll_to(Section::GutHealth);
    let commands = reader.click("Good Gut Health");
    reader.run(commands);

    reader.scroll_to(Section::Breakfast);
    reader.click("Moderate Carb");
    reader.scroll_to(Section::Lunch);
    reader.scroll_to(Section::Dinner);
    reader.click("High Carb");
    reader.scroll_to(Section::Breakfast);

    let selection = reader.session.selection();
    assert_eq!(selection.carbs(MealPhase::Breakfast), Some(CarbCategory::Moderate));
    assert_eq!(selection.carbs(MealPhase::Lunch), Some(CarbCategory::Low));
    assert_eq!(selection.carbs(MealPhase::Dinner), Some(CarbCategory::High));
    assert_eq!(reader.session.choices().active(), Some("moderate-carb"));
    assert_eq!(reader.loader.fetch_count(), 1);
}
