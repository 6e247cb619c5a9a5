use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use futures_channel::mpsc::UnboundedSender;
use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::charts::{plot_frames, GlucoseCharts};
use crate::config::{Canvas, StoryConfig};
use crate::core::{format, platform, timing};
use crate::data::{DatasetLoader, EmbeddedSource};
use crate::interaction::ChoiceBar;
use crate::story::{ScrollSample, Section, StepTracker, StoryCommand, StoryEvent, StorySession};
use crate::t;

const DEFAULT_BACKGROUND: &str = "#FFFFFF";

/// Reports scroll position and viewport size on every scroll or resize.
const SCROLL_LISTENER_JS: &str = r#"
const report = () => dioxus.send({
    scroll_y: window.scrollY,
    width: window.innerWidth,
    height: window.innerHeight,
});
window.addEventListener("scroll", report, { passive: true });
window.addEventListener("resize", report);
report();
await new Promise(() => {});
"#;

type EventSlot = Rc<RefCell<Option<UnboundedSender<StoryEvent>>>>;

#[component]
pub fn Story() -> Element {
    let config = use_hook(StoryConfig::default);
    let loader = use_hook({
        let resources = config.resources.clone();
        move || Rc::new(DatasetLoader::new(EmbeddedSource, resources))
    });
    let session = use_signal({
        let config = config.clone();
        move || StorySession::new(config)
    });
    let mut viewport = use_signal(|| ScrollSample {
        scroll_y: 0.0,
        width: 1280.0,
        height: 800.0,
    });
    let clock = use_signal(timing::now_ms);
    let step_offset = config.step_offset;

    // Re-render on language switches provided by the platform shell.
    let _lang = try_use_context::<Signal<String>>().map(|code| code());

    let sender_slot: EventSlot = use_hook(|| Rc::new(RefCell::new(None)));
    let sender_slot_for_loop = sender_slot.clone();

    let coroutine = use_coroutine(move |mut rx: UnboundedReceiver<StoryEvent>| {
        let sender_slot = sender_slot_for_loop.clone();
        let loader = loader.clone();
        let mut session = session;
        let mut clock = clock;

        async move {
            while let Some(event) = rx.next().await {
                let now = timing::now_ms();
                let commands = session.with_mut(|s| s.dispatch(event, now));
                clock.set(now);
                for command in commands {
                    run_command(command, &loader, &sender_slot);
                }
            }
        }
    });
    sender_slot.borrow_mut().replace(coroutine.tx());

    use_future(move || async move {
        let mut eval = document::eval(SCROLL_LISTENER_JS);
        let mut tracker = StepTracker::new(Section::ALL.len()).with_offset(step_offset);
        loop {
            match eval.recv::<ScrollSample>().await {
                Ok(sample) => {
                    let resized = {
                        let current = viewport.peek();
                        current.width != sample.width || current.height != sample.height
                    };
                    if resized {
                        viewport.set(sample);
                    }
                    for event in tracker.observe(sample.scroll_y, sample.height) {
                        coroutine.send(event);
                    }
                }
                Err(err) => {
                    warn!(error = ?err, "scroll listener stopped");
                    break;
                }
            }
        }
    });

    // Drives path transitions: fast ticks while a chart animates, slow otherwise.
    use_future(move || async move {
        let mut clock = clock;
        let mut was_animating = false;
        loop {
            let now = timing::now_ms();
            let animating = session.peek().charts().is_animating(now);
            if animating || was_animating {
                clock.set(now);
            }
            was_animating = animating;
            timing::sleep_ms(if animating { 16 } else { 100 }).await;
        }
    });

    let now = clock();
    let sample = viewport();
    let session = session.read();
    let config = session.config();
    let canvas = config.canvas(sample.width, sample.height);
    let background = session.background().unwrap_or(DEFAULT_BACKGROUND);
    let transition_ms = config.transition_ms;

    rsx! {
        main {
            class: "story",
            style: "background-color: {background}; transition: background-color {transition_ms}ms ease;",
            for section in Section::ALL {
                {render_step(section, &session, canvas, now, coroutine)}
            }
        }
    }
}

fn render_step(
    section: Section,
    session: &StorySession,
    canvas: Canvas,
    now_ms: f64,
    events: Coroutine<StoryEvent>,
) -> Element {
    let (title, body) = section_copy(section);
    let id = section.id();
    let index = section.index();
    let class = if session.active_section() == Some(section) {
        "step step--active"
    } else {
        "step"
    };

    let choices = session.choices();
    let show_choices = choices.is_visible() && choices.section() == Some(section);
    let options = choices.options().to_vec();
    let active = choices.active().map(str::to_string);
    let generation = choices.generation();
    let prompt = match section {
        Section::GutHealth => t!("choose-gut-health"),
        _ => t!("choose-carbs"),
    };

    let config = session.config();
    let margin = config.margin;
    let frames = section
        .meal()
        .and_then(|meal| session.charts().handles(meal))
        .map(|handles| plot_frames(handles, config, canvas, now_ms));

    rsx! {
        article {
            key: "{id}",
            id: "{id}",
            class: "{class}",
            "data-step": "{index}",
            div { class: "step__text",
                h2 { class: "step__title", "{title}" }
                p { class: "step__body", "{body}" }
                if section == Section::GutHealth {
                    {render_gut_status(session)}
                }
                if show_choices {
                    div { class: "step__choices",
                        p { class: "step__prompt", "{prompt}" }
                        ChoiceBar {
                            key: "{generation}",
                            options: options,
                            active: active,
                            on_choice: move |value: String| {
                                debug!(?section, generation, value = %value, "choice clicked");
                                events.send(StoryEvent::ChoiceMade { section, generation, value });
                            },
                        }
                    }
                }
            }
            if let Some(frames) = frames {
                div { class: "step__chart",
                    GlucoseCharts { frames: frames, canvas: canvas, margin: margin }
                }
            }
        }
    }
}

fn render_gut_status(session: &StorySession) -> Element {
    let message = if let Some(reason) = session.last_error() {
        Some((
            "gut-panel gut-panel--error",
            t!("gut-load-failed", reason = reason.to_string()),
        ))
    } else if session.is_loading() {
        Some(("gut-panel gut-panel--loading", t!("gut-loading")))
    } else {
        session.dataset().map(|dataset| {
            let count = format::format_number(dataset.len() as f64, 0);
            ("gut-panel", t!("gut-loaded", count = count))
        })
    };

    match message {
        Some((class, text)) => rsx! {
            div { class: "{class}", role: "status", "{text}" }
        },
        None => rsx! {},
    }
}

fn section_copy(section: Section) -> (String, String) {
    match section {
        Section::Intro => (t!("section-intro-title"), t!("section-intro-body")),
        Section::GutHealth => (t!("section-gut-title"), t!("section-gut-body")),
        Section::Breakfast => (t!("section-breakfast-title"), t!("section-breakfast-body")),
        Section::Lunch => (t!("section-lunch-title"), t!("section-lunch-body")),
        Section::Dinner => (t!("section-dinner-title"), t!("section-dinner-body")),
    }
}

fn run_command(
    command: StoryCommand,
    loader: &Rc<DatasetLoader<EmbeddedSource>>,
    sender_slot: &EventSlot,
) {
    match command {
        StoryCommand::LoadDataset { level } => {
            let Some(sender) = sender_slot.borrow().as_ref().cloned() else {
                return;
            };
            let loader = loader.clone();
            platform::spawn_future(async move {
                let result = loader.load(level).await;
                let _ = sender.unbounded_send(StoryEvent::DatasetLoaded { level, result });
            });
        }
        StoryCommand::ScrollToSection { index } => {
            debug!(index, "scrolling to section");
            let _ = document::eval(&format!(
                "window.scrollTo({{ top: {index} * window.innerHeight, behavior: 'smooth' }});"
            ));
        }
    }
}
