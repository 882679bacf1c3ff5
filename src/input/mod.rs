//! Input handling
//!
//! Polls macroquad's keyboard, mouse and window state once per frame and
//! turns it into a list of `InputEvent`s for the app to apply.

mod actions;
mod state;

pub use actions::*;
pub use state::*;
