#![cfg(test)]
//! Selectors the story components emit must keep a rule in the shared theme.
//!
//! A substring check is enough to catch a renamed or dropped class. When a
//! component changes its markup, update `REQUIRED_SELECTORS` with it.

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

const NAVBAR_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/styling/navbar.css"
));

const REQUIRED_SELECTORS: &[&str] = &[
    ":root",
    "body {",
    // Narrative steps
    ".story {",
    ".step {",
    ".step--active",
    ".step__title",
    ".step__body",
    ".step__prompt",
    ".step__chart",
    // Choice buttons
    ".button {",
    ".choice-bar {",
    ".choice-bar--active",
    ".choice-bar__button {",
    ".choice-bar__button--active",
    // Gut-health status
    ".gut-panel {",
    ".gut-panel--loading",
    ".gut-panel--error",
    // Charts
    ".story-chart {",
    ".story-chart__axis",
    ".story-chart__title",
    ".story-chart__line",
    ".story-chart__empty",
    "@media",
];

const NAVBAR_SELECTORS: &[&str] = &[
    ".navbar {",
    ".navbar__inner",
    ".navbar__brand-mark",
    ".navbar__locale",
    ".visually-hidden",
];

#[test]
fn theme_contains_required_selectors() {
    let missing: Vec<_> = REQUIRED_SELECTORS
        .iter()
        .filter(|s| !THEME_CSS.contains(*s))
        .collect();
    assert!(missing.is_empty(), "theme is missing selectors: {missing:?}");
}

#[test]
fn navbar_stylesheet_contains_required_selectors() {
    let missing: Vec<_> = NAVBAR_SELECTORS
        .iter()
        .filter(|s| !NAVBAR_CSS.contains(*s))
        .collect();
    assert!(missing.is_empty(), "navbar css is missing selectors: {missing:?}");
}

#[test]
fn meal_backgrounds_fade() {
    assert!(THEME_CSS.contains("transition: background-color 1000ms"));
}
