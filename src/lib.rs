//! Catalog browser core for Rust.
//!
//! Loads a product catalog from a remote HTTP service and keeps the client-side
//! browsing state around it: free-text search, category filter, a favorites
//! set, a list/detail view switch and a persisted light/dark display mode.
//! Fetches run on worker threads; their results are committed on the thread
//! that owns the [`App`], and only the newest request of each kind is kept.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use catalog_browser::{App, CatalogClient, DisplayModePersistence, MemoryStore};
//!
//! let client = CatalogClient::new("https://fakestoreapi.com", Duration::from_secs(15)).unwrap();
//! let display = DisplayModePersistence::load(Box::new(MemoryStore::new()));
//! let mut app = App::new(Arc::new(client), display);
//!
//! app.load();
//! app.wait(Duration::from_secs(15));
//! app.set_search_term("shirt");
//! for item in app.visible() {
//!     println!("{} {}", item.title, item.formatted_price());
//! }
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod favorites;
pub mod fetch;
pub mod filter;
pub mod logging;
pub mod models;
pub mod navigator;
pub mod store;
pub mod tui;

// Re-export the main public types at the crate root for convenience.
pub use app::App;
pub use client::{CatalogClient, CatalogService};
pub use config::{Config, ServiceConfig};
pub use display::{DisplayMode, DisplayModePersistence, JsonFileStore, MemoryStore, PreferenceStore};
pub use error::{CatalogError, Result};
pub use favorites::FavoritesSet;
pub use fetch::{FetchController, FetchKind, RequestToken};
pub use filter::{categories, derive, CategoryFilter, FilterCriteria};
pub use models::{Item, ItemId, Rating};
pub use navigator::{ViewMode, ViewNavigator, ViewState};
pub use store::{CatalogStore, LoadStatus};
