//! Terminal front end: key handling and rendering around [`crate::App`].

pub mod actions;
pub mod events;
pub mod state;
pub mod terminal;
pub mod theme;
pub mod ui;

pub use actions::process_state;
pub use events::handle_event;
pub use state::TuiState;
pub use terminal::{restore_terminal, setup_terminal};
pub use theme::Theme;
pub use ui::render;
