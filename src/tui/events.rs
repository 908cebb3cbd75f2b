use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::state::{Focus, TuiState};
use crate::navigator::ViewMode;

/// Main event handler that dispatches to the appropriate screen handler.
pub fn handle_event(event: Event, state: &mut TuiState) {
    if let Event::Key(key_event) = event {
        if key_event.kind != KeyEventKind::Press {
            return;
        }

        if key_event.code == KeyCode::Char('c') && key_event.modifiers == KeyModifiers::CONTROL {
            state.should_quit = true;
            return;
        }

        match (state.app.view_state().mode(), state.focus) {
            (ViewMode::List, Focus::Search) => handle_search_input(key_event, state),
            (ViewMode::List, Focus::List) => handle_item_list(key_event, state),
            (ViewMode::Detail, _) => handle_item_detail(key_event, state),
        }
    }
}

fn handle_search_input(event: KeyEvent, state: &mut TuiState) {
    match event.code {
        KeyCode::Char(c)
            if !event
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            state.insert_search_char(c)
        }
        KeyCode::Backspace => state.delete_search_char_before(),
        KeyCode::Delete => state.delete_search_char_at(),
        KeyCode::Left => {
            if state.search_cursor_position > 0 {
                state.search_cursor_position -= 1;
            }
        }
        KeyCode::Right => {
            if state.search_cursor_position < state.search_len() {
                state.search_cursor_position += 1;
            }
        }
        KeyCode::Home => {
            state.search_cursor_position = 0;
        }
        KeyCode::End => {
            state.search_cursor_position = state.search_len();
        }
        KeyCode::Enter | KeyCode::Esc | KeyCode::Down => {
            state.focus = Focus::List;
        }
        _ => {}
    }
}

fn handle_item_list(event: KeyEvent, state: &mut TuiState) {
    match event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            if state.selected_row > 0 {
                state.selected_row -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.selected_row < state.app.visible_len().saturating_sub(1) {
                state.selected_row += 1;
            }
        }
        KeyCode::Char('/') => {
            state.focus = Focus::Search;
            state.search_cursor_position = state.search_len();
        }
        KeyCode::Tab => state.cycle_category(true),
        KeyCode::BackTab => state.cycle_category(false),
        KeyCode::Char('f') => {
            state.app.toggle_favorites_only();
            state.clamp_selection();
        }
        KeyCode::Char(' ') => {
            if let Some(id) = state.selected_id() {
                state.app.toggle_favorite(id);
                state.clamp_selection();
            }
        }
        KeyCode::Enter => {
            if let Some(id) = state.selected_id() {
                state.app.view(id);
            }
        }
        KeyCode::Char('r') => state.app.load(),
        KeyCode::Char('d') => {
            state.app.toggle_display_mode();
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            state.should_quit = true;
        }
        _ => {}
    }
}

fn handle_item_detail(event: KeyEvent, state: &mut TuiState) {
    match event.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
            state.app.back();
            state.clamp_selection();
        }
        KeyCode::Char(' ') => {
            if let Some(id) = state.app.view_state().selected() {
                state.app.toggle_favorite(id);
            }
        }
        KeyCode::Char('d') => {
            state.app.toggle_display_mode();
        }
        KeyCode::Char('q') => {
            state.should_quit = true;
        }
        _ => {}
    }
}
