//! The composed application state.
//!
//! [`App`] owns exactly one of each component and re-derives the visible list
//! synchronously after every mutation that can affect it. All mutation
//! happens through `&mut self`, on the thread that owns the `App`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::client::CatalogService;
use crate::display::{DisplayMode, DisplayModePersistence};
use crate::favorites::FavoritesSet;
use crate::filter::{self, CategoryFilter, FilterCriteria};
use crate::models::{Item, ItemId};
use crate::navigator::{ViewNavigator, ViewState};
use crate::store::{CatalogStore, LoadStatus};

pub struct App {
    store: CatalogStore,
    criteria: FilterCriteria,
    favorites: FavoritesSet,
    navigator: ViewNavigator,
    display: DisplayModePersistence,
    /// Catalog positions of the visible items, ascending.
    visible: Vec<usize>,
    categories: Vec<String>,
}

impl App {
    pub fn new(service: Arc<dyn CatalogService>, display: DisplayModePersistence) -> Self {
        let mut app = Self {
            store: CatalogStore::new(service),
            criteria: FilterCriteria::default(),
            favorites: FavoritesSet::new(),
            navigator: ViewNavigator::new(),
            display,
            visible: Vec::new(),
            categories: Vec::new(),
        };
        app.rederive();
        app
    }

    fn rederive(&mut self) {
        let catalog = self.store.catalog().unwrap_or(&[]);
        self.visible = filter::derive_indices(catalog, &self.criteria, &self.favorites);
        self.categories = filter::categories(catalog);
    }

    // -- fetch lifecycle ----------------------------------------------------

    /// Fetch (or re-fetch) the catalog. Also the manual retry after a failure.
    pub fn load(&mut self) {
        self.store.load();
        self.rederive();
    }

    /// Commit any completed fetches. Returns `true` if state changed.
    pub fn poll(&mut self) -> bool {
        let changed = self.store.poll();
        if changed {
            self.rederive();
        }
        changed
    }

    /// Block for one completed fetch, committing it if still current.
    pub fn wait(&mut self, timeout: Duration) -> Option<bool> {
        let committed = self.store.wait(timeout)?;
        if committed {
            self.rederive();
        }
        Some(committed)
    }

    // -- filter criteria ----------------------------------------------------

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.criteria.search_term = term.into();
        self.rederive();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        debug!(category = category.label(), "category selected");
        self.criteria.category = category;
        self.rederive();
    }

    pub fn toggle_favorites_only(&mut self) {
        self.criteria.show_favorites_only = !self.criteria.show_favorites_only;
        self.rederive();
    }

    // -- favorites ----------------------------------------------------------

    /// Returns `true` if `id` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, id: ItemId) -> bool {
        let now = self.favorites.toggle(id);
        debug!(id, favorite = now, "favorite toggled");
        self.rederive();
        now
    }

    pub fn is_favorite(&self, id: ItemId) -> bool {
        self.favorites.has(id)
    }

    // -- navigation ---------------------------------------------------------

    /// Open the detail view for `id` and fetch a fresh copy of the item.
    pub fn view(&mut self, id: ItemId) {
        self.navigator.view(id);
        self.store.load_one(id);
    }

    /// Return to the list, abandoning any pending item fetch.
    pub fn back(&mut self) -> bool {
        let moved = self.navigator.back();
        if moved {
            self.store.cancel_one();
        }
        moved
    }

    // -- display mode -------------------------------------------------------

    pub fn toggle_display_mode(&mut self) -> DisplayMode {
        let mode = self.display.toggle();
        info!(?mode, "display mode toggled");
        mode
    }

    // -- read access --------------------------------------------------------

    pub fn status(&self) -> LoadStatus {
        self.store.status()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.store.last_error()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    pub fn view_state(&self) -> ViewState {
        self.navigator.state()
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display.mode()
    }

    /// `"All"` followed by the catalog's categories.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The filtered list, in catalog order.
    pub fn visible(&self) -> Vec<&Item> {
        let catalog = self.store.catalog().unwrap_or(&[]);
        self.visible
            .iter()
            .filter_map(|&index| catalog.get(index))
            .collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Number of items in the loaded catalog, zero until ready.
    pub fn catalog_len(&self) -> usize {
        self.store.catalog().map_or(0, <[Item]>::len)
    }

    /// The item under inspection: the freshly fetched copy when available,
    /// otherwise the catalog's copy.
    pub fn selected_item(&self) -> Option<&Item> {
        let id = self.navigator.state().selected()?;
        self.store
            .detail()
            .filter(|item| item.id == id)
            .or_else(|| self.store.find(id))
    }

    pub fn detail_status(&self) -> LoadStatus {
        self.store.detail_status()
    }

    pub fn detail_error(&self) -> Option<&str> {
        self.store.detail_error()
    }
}
