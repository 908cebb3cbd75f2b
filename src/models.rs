use serde::{Deserialize, Serialize};

/// Identifier of a catalog item, unique within one catalog snapshot.
pub type ItemId = u64;

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

/// Review score attached to every item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average score in `[0, 5]`.
    pub rate: f64,
    /// Number of reviews behind `rate`.
    pub count: u64,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// A single catalog entry exactly as returned by the catalog service.
///
/// Items are never edited once fetched; a refresh replaces the whole catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating: Rating,
}

impl Item {
    /// Price rendered with a currency sign and two decimals, e.g. `$109.95`.
    pub fn formatted_price(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// Short rating summary, e.g. `3.9 (120)`.
    pub fn rating_summary(&self) -> String {
        format!("{:.1} ({})", self.rating.rate, self.rating.count)
    }
}
