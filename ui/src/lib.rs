//! Shared UI crate for Glucoscroll: the scroll-driven glucose story and
//! everything behind it. Platform crates only launch [`views::Story`].

pub mod charts;
pub mod config;
pub mod core;
pub mod data;
pub mod i18n;
pub mod interaction;
pub mod story;
pub mod views;

pub mod components {
    pub mod app_navbar;
    pub use app_navbar::AppNavbar;
}
