use tracing::debug;

use crate::models::ItemId;

/// Which of the two screens is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    List,
    Detail,
}

/// Navigation state. A selection exists exactly when in `Detail`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    List,
    Detail { item_id: ItemId },
}

impl ViewState {
    pub fn mode(&self) -> ViewMode {
        match self {
            ViewState::List => ViewMode::List,
            ViewState::Detail { .. } => ViewMode::Detail,
        }
    }

    pub fn selected(&self) -> Option<ItemId> {
        match self {
            ViewState::List => None,
            ViewState::Detail { item_id } => Some(*item_id),
        }
    }
}

/// Two-state list/detail machine.
#[derive(Debug, Default)]
pub struct ViewNavigator {
    state: ViewState,
}

impl ViewNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Inspect `item_id`. From `Detail` this re-targets the selection.
    pub fn view(&mut self, item_id: ItemId) {
        debug!(item_id, from = ?self.state.mode(), "view item");
        self.state = ViewState::Detail { item_id };
    }

    /// Return to the list. Returns `false` if already there.
    pub fn back(&mut self) -> bool {
        match self.state {
            ViewState::List => false,
            ViewState::Detail { .. } => {
                self.state = ViewState::List;
                true
            }
        }
    }
}
