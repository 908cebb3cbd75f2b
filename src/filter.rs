//! Derivation of the visible item list from the catalog and the user's
//! filter choices.
//!
//! [`derive`] is a pure function: it never fails, never reorders, and an
//! empty result is a valid answer. The three predicates (search text,
//! category, favorites-only) are combined with AND and commute.

use crate::favorites::FavoritesSet;
use crate::models::Item;

/// Label of the category sentinel that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Category selector: everything, or one exact category label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Build a selector from a label as listed by [`categories`].
    pub fn from_label(label: &str) -> Self {
        if label == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(label) => label,
        }
    }

    /// Case-sensitive exact match.
    fn admits(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(label) => label == category,
        }
    }
}

/// The user's current filter choices. Always fully defined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_term: String,
    pub category: CategoryFilter,
    pub show_favorites_only: bool,
}

impl FilterCriteria {
    /// True when no predicate is active.
    pub fn is_unfiltered(&self) -> bool {
        self.search_term.is_empty()
            && self.category == CategoryFilter::All
            && !self.show_favorites_only
    }
}

/// Compiled form of the criteria, so the search term is lowercased once.
struct Predicate<'a> {
    needle: Option<String>,
    category: &'a CategoryFilter,
    favorites: Option<&'a FavoritesSet>,
}

impl<'a> Predicate<'a> {
    fn new(criteria: &'a FilterCriteria, favorites: &'a FavoritesSet) -> Self {
        Self {
            needle: (!criteria.search_term.is_empty())
                .then(|| criteria.search_term.to_lowercase()),
            category: &criteria.category,
            favorites: criteria.show_favorites_only.then_some(favorites),
        }
    }

    fn matches(&self, item: &Item) -> bool {
        if let Some(needle) = &self.needle {
            if !item.title.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if !self.category.admits(&item.category) {
            return false;
        }
        self.favorites.map_or(true, |favorites| favorites.has(item.id))
    }
}

/// Items of `catalog` admitted by `criteria`, in catalog order.
pub fn derive<'a>(
    catalog: &'a [Item],
    criteria: &FilterCriteria,
    favorites: &FavoritesSet,
) -> Vec<&'a Item> {
    let predicate = Predicate::new(criteria, favorites);
    catalog.iter().filter(|item| predicate.matches(item)).collect()
}

/// Positions in `catalog` admitted by `criteria`, ascending.
pub fn derive_indices(
    catalog: &[Item],
    criteria: &FilterCriteria,
    favorites: &FavoritesSet,
) -> Vec<usize> {
    let predicate = Predicate::new(criteria, favorites);
    catalog
        .iter()
        .enumerate()
        .filter(|(_, item)| predicate.matches(item))
        .map(|(index, _)| index)
        .collect()
}

/// `"All"` followed by each distinct category of `catalog`, first-seen order.
pub fn categories(catalog: &[Item]) -> Vec<String> {
    let mut labels = vec![ALL_CATEGORIES.to_string()];
    for item in catalog {
        if !labels.iter().any(|label| label == &item.category) {
            labels.push(item.category.clone());
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;

    fn item(id: u64, title: &str, category: &str) -> Item {
        Item {
            id,
            title: title.into(),
            price: 10.0,
            description: String::new(),
            category: category.into(),
            image: String::new(),
            rating: Rating { rate: 3.0, count: 10 },
        }
    }

    fn shirt_and_mug() -> Vec<Item> {
        vec![
            item(1, "Red Shirt", "clothing"),
            item(2, "Blue Mug", "home"),
        ]
    }

    fn ids(items: &[&Item]) -> Vec<u64> {
        items.iter().map(|item| item.id).collect()
    }

    #[test]
    fn unfiltered_returns_catalog_in_order() {
        let catalog = vec![
            item(3, "C", "x"),
            item(1, "A", "y"),
            item(2, "B", "x"),
        ];
        let criteria = FilterCriteria::default();
        assert!(criteria.is_unfiltered());
        let out = derive(&catalog, &criteria, &FavoritesSet::new());
        assert_eq!(ids(&out), vec![3, 1, 2]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = shirt_and_mug();
        let criteria = FilterCriteria {
            search_term: "shirt".into(),
            ..Default::default()
        };
        let out = derive(&catalog, &criteria, &FavoritesSet::new());
        assert_eq!(ids(&out), vec![1]);

        let criteria = FilterCriteria {
            search_term: "MUG".into(),
            ..Default::default()
        };
        let out = derive(&catalog, &criteria, &FavoritesSet::new());
        assert_eq!(ids(&out), vec![2]);
    }

    #[test]
    fn favorites_only_keeps_favorites() {
        let catalog = shirt_and_mug();
        let favorites: FavoritesSet = [2].into_iter().collect();
        let criteria = FilterCriteria {
            show_favorites_only: true,
            ..Default::default()
        };
        let out = derive(&catalog, &criteria, &favorites);
        assert_eq!(ids(&out), vec![2]);
    }

    #[test]
    fn category_is_exact_and_case_sensitive() {
        let catalog = vec![
            item(1, "Ring", "jewelery"),
            item(2, "Band", "Jewelery"),
        ];
        let criteria = FilterCriteria {
            category: CategoryFilter::from_label("jewelery"),
            ..Default::default()
        };
        let out = derive(&catalog, &criteria, &FavoritesSet::new());
        assert_eq!(ids(&out), vec![1]);
    }

    #[test]
    fn unknown_category_yields_empty() {
        let catalog = shirt_and_mug();
        let criteria = FilterCriteria {
            category: CategoryFilter::Only("electronics".into()),
            ..Default::default()
        };
        assert!(derive(&catalog, &criteria, &FavoritesSet::new()).is_empty());
    }

    #[test]
    fn predicates_combine_with_and() {
        let catalog = vec![
            item(1, "Red Shirt", "clothing"),
            item(2, "Red Mug", "home"),
            item(3, "Red Scarf", "clothing"),
        ];
        let favorites: FavoritesSet = [2, 3].into_iter().collect();
        let criteria = FilterCriteria {
            search_term: "red".into(),
            category: CategoryFilter::Only("clothing".into()),
            show_favorites_only: true,
        };
        let out = derive(&catalog, &criteria, &favorites);
        assert_eq!(ids(&out), vec![3]);
        assert_eq!(derive_indices(&catalog, &criteria, &favorites), vec![2]);
    }

    #[test]
    fn categories_are_distinct_in_first_seen_order() {
        let catalog = vec![
            item(1, "a", "home"),
            item(2, "b", "clothing"),
            item(3, "c", "home"),
            item(4, "d", "toys"),
        ];
        assert_eq!(categories(&catalog), vec!["All", "home", "clothing", "toys"]);
        assert_eq!(categories(&[]), vec!["All"]);
    }

    #[test]
    fn literal_all_category_folds_into_sentinel() {
        let catalog = vec![item(1, "a", "All"), item(2, "b", "home")];
        assert_eq!(categories(&catalog), vec!["All", "home"]);
        assert_eq!(CategoryFilter::from_label("All"), CategoryFilter::All);
    }

    #[test]
    fn category_label_round_trips() {
        let filter = CategoryFilter::from_label("electronics");
        assert_eq!(filter.label(), "electronics");
        assert_eq!(CategoryFilter::All.label(), ALL_CATEGORIES);
    }
}
