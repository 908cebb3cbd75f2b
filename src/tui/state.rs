use crate::app::App;
use crate::filter::CategoryFilter;
use crate::models::ItemId;

/// Which widget on the list screen receives typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    /// Keys navigate the item table.
    List,
    /// Keys edit the search text.
    Search,
}

/// Terminal front-end state wrapped around the application core.
pub struct TuiState {
    /// The application core.
    pub(crate) app: App,
    /// Widget receiving typed keys on the list screen.
    pub(crate) focus: Focus,
    /// Currently selected row in the visible list.
    pub(crate) selected_row: usize,
    /// Cursor position (in chars) in the search input.
    pub(crate) search_cursor_position: usize,
    /// Should the application quit?
    pub should_quit: bool,
}

impl TuiState {
    pub fn new(app: App) -> Self {
        Self {
            app,
            focus: Focus::List,
            selected_row: 0,
            search_cursor_position: 0,
            should_quit: false,
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Keep the row selection inside the visible list.
    pub(crate) fn clamp_selection(&mut self) {
        let len = self.app.visible_len();
        if len == 0 {
            self.selected_row = 0;
        } else if self.selected_row >= len {
            self.selected_row = len - 1;
        }
    }

    /// Identifier of the highlighted row, if any.
    pub(crate) fn selected_id(&self) -> Option<ItemId> {
        self.app
            .visible()
            .get(self.selected_row)
            .map(|item| item.id)
    }

    /// Position of the active category in the category list.
    pub(crate) fn category_index(&self) -> usize {
        let label = self.app.criteria().category.label();
        self.app
            .categories()
            .iter()
            .position(|c| c == label)
            .unwrap_or(0)
    }

    /// Step the category selector forwards or backwards, wrapping around.
    pub(crate) fn cycle_category(&mut self, forward: bool) {
        let len = self.app.categories().len();
        if len == 0 {
            return;
        }
        let current = self.category_index();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        let label = self.app.categories()[next].clone();
        self.app.set_category(CategoryFilter::from_label(&label));
        self.selected_row = 0;
    }

    fn search_chars(&self) -> Vec<char> {
        self.app.criteria().search_term.chars().collect()
    }

    pub(crate) fn insert_search_char(&mut self, c: char) {
        let mut chars = self.search_chars();
        let at = self.search_cursor_position.min(chars.len());
        chars.insert(at, c);
        self.search_cursor_position = at + 1;
        self.app.set_search_term(chars.into_iter().collect::<String>());
        self.selected_row = 0;
    }

    pub(crate) fn delete_search_char_before(&mut self) {
        let mut chars = self.search_chars();
        let at = self.search_cursor_position.min(chars.len());
        if at == 0 {
            return;
        }
        chars.remove(at - 1);
        self.search_cursor_position = at - 1;
        self.app.set_search_term(chars.into_iter().collect::<String>());
        self.selected_row = 0;
    }

    pub(crate) fn delete_search_char_at(&mut self) {
        let mut chars = self.search_chars();
        if self.search_cursor_position >= chars.len() {
            return;
        }
        chars.remove(self.search_cursor_position);
        self.app.set_search_term(chars.into_iter().collect::<String>());
        self.selected_row = 0;
    }

    pub(crate) fn search_len(&self) -> usize {
        self.app.criteria().search_term.chars().count()
    }
}
