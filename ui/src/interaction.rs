//! Choice buttons shown under the active narrative step.
//!
//! [`ChoiceSurface`] is the state the session owns; [`ChoiceBar`] renders it.
//! Every `present` call bumps a generation counter and the rendered buttons
//! are keyed by it, so a click can only be accepted for the set of buttons
//! currently on screen.

use dioxus::prelude::*;

use crate::core::categories::canonical_token;
use crate::story::Section;

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub label: String,
    /// Canonical token handed to the session, e.g. `high-carb`.
    pub value: String,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let value = canonical_token(&label);
        Self { label, value }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChoiceSurface {
    section: Option<Section>,
    options: Vec<ChoiceOption>,
    active: Option<String>,
    visible: bool,
    generation: u64,
}

impl ChoiceSurface {
    /// Replace whatever is shown with one button per label.
    pub fn present(&mut self, section: Section, labels: &[String], active: Option<String>) -> u64 {
        self.generation += 1;
        self.section = Some(section);
        self.options = labels.iter().map(ChoiceOption::new).collect();
        self.active = active.filter(|value| self.options.iter().any(|o| &o.value == value));
        self.visible = !self.options.is_empty();
        self.generation
    }

    pub fn hide(&mut self) {
        self.generation += 1;
        self.visible = false;
        self.options.clear();
        self.active = None;
        self.section = None;
    }

    /// Accept a click made on the buttons of `generation` in `section`.
    /// Returns the canonical value once, or `None` when the click is stale
    /// or names an option that was never offered.
    pub fn accept(&mut self, section: Section, generation: u64, value: &str) -> Option<String> {
        if !self.visible || generation != self.generation || self.section != Some(section) {
            return None;
        }
        let value = canonical_token(value);
        if !self.options.iter().any(|o| o.value == value) {
            return None;
        }
        self.active = Some(value.clone());
        Some(value)
    }

    pub fn section(&self) -> Option<Section> {
        self.section
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[component]
pub fn ChoiceBar(
    options: Vec<ChoiceOption>,
    active: Option<String>,
    on_choice: EventHandler<String>,
) -> Element {
    rsx! {
        div { class: "choice-bar choice-bar--active",
            for (i, option) in options.into_iter().enumerate() {
                {
                    let is_active = active.as_deref() == Some(option.value.as_str());
                    render_choice_button(i, option, is_active, on_choice)
                }
            }
        }
    }
}

fn render_choice_button(
    index: usize,
    option: ChoiceOption,
    is_active: bool,
    on_choice: EventHandler<String>,
) -> Element {
    let ChoiceOption { label, value } = option;
    let class = if is_active {
        "button choice-bar__button choice-bar__button--active"
    } else {
        "button choice-bar__button"
    };
    let delay = format!("transition-delay: {:.1}s", index as f64 * 0.2);
    let chosen = value.clone();

    rsx! {
        button {
            key: "{value}",
            r#type: "button",
            class: "{class}",
            style: "{delay}",
            "data-value": "{value}",
            onclick: move |_| on_choice.call(chosen.clone()),
            "{label}"
        }
    }
}
