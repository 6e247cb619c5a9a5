mod story;
pub use story::Story;
