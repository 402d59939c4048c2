//! Swipe-to-switch page UI

pub mod compose;
pub mod pages;

pub use compose::{draw_slide, show_page};
pub use pages::{Page, PageController, Settle};
