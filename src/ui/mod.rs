//! Terminal User Interface components

mod app;
mod panels;
pub mod theme;
mod widgets;

pub use app::{grid_cell, session_sink, App, AppState, AppView};
pub use panels::{AimField, DigitSpanPanel, ReactionPanel, SequenceGrid, TypingPassage};
pub use theme::ThemeColors;
pub use widgets::*;
