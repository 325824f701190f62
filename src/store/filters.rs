//! Search and browse filter selections.
//!
//! Pure local state: no validation, no network calls, no persistence.
//! Updates go through [`FilterUpdate`], one variant per field.
//!
//! # Examples
//!
//! ```rust
//! use atlas::store::{FilterUpdate, FiltersStore, SortKey};
//!
//! let filters = FiltersStore::new();
//! filters.set_filter(FilterUpdate::Query("transcription".to_string()));
//! filters.set_filter(FilterUpdate::Sort(SortKey::Trending));
//!
//! let current = filters.snapshot();
//! assert_eq!(current.query, "transcription");
//!
//! filters.clear_filters();
//! assert_eq!(filters.snapshot().sort, SortKey::TopRated);
//! ```

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Ordering of tool listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    TopRated,
    MostBookmarked,
    Trending,
    Newest,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::TopRated => "top_rated",
            SortKey::MostBookmarked => "most_bookmarked",
            SortKey::Trending => "trending",
            SortKey::Newest => "newest",
        }
    }
}

/// Pricing bucket a tool falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    Free,
    Freemium,
    Paid,
}

impl PriceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTier::Free => "free",
            PriceTier::Freemium => "freemium",
            PriceTier::Paid => "paid",
        }
    }
}

/// Current filter selections.
///
/// The default value is the cleared state: empty query, no category,
/// price, rating floor or platform, sorted by top rating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    pub query: String,
    pub category: Option<String>,
    pub price: Option<PriceTier>,
    pub min_rating: Option<f64>,
    pub platform: Option<String>,
    pub sort: SortKey,
}

impl Filters {
    /// Query parameters for the tool listing endpoints.
    ///
    /// Unset fields are left out; `sort` is always present.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if !self.query.is_empty() {
            query.push(("q", self.query.clone()));
        }
        if let Some(category) = &self.category {
            query.push(("category", category.clone()));
        }
        if let Some(price) = self.price {
            query.push(("price", price.as_str().to_string()));
        }
        if let Some(min_rating) = self.min_rating {
            query.push(("min_rating", min_rating.to_string()));
        }
        if let Some(platform) = &self.platform {
            query.push(("platform", platform.clone()));
        }
        query.push(("sort", self.sort.as_str().to_string()));
        query
    }
}

/// A change to a single filter field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterUpdate {
    Query(String),
    Category(Option<String>),
    Price(Option<PriceTier>),
    MinRating(Option<f64>),
    Platform(Option<String>),
    Sort(SortKey),
}

impl FilterUpdate {
    fn apply(self, filters: &mut Filters) {
        match self {
            FilterUpdate::Query(query) => filters.query = query,
            FilterUpdate::Category(category) => filters.category = category,
            FilterUpdate::Price(price) => filters.price = price,
            FilterUpdate::MinRating(min_rating) => filters.min_rating = min_rating,
            FilterUpdate::Platform(platform) => filters.platform = platform,
            FilterUpdate::Sort(sort) => filters.sort = sort,
        }
    }
}

#[derive(Debug, Default)]
pub struct FiltersStore {
    state: Mutex<Filters>,
}

impl FiltersStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current filter values.
    pub fn snapshot(&self) -> Filters {
        self.state.lock().clone()
    }

    /// Applies one field update.
    pub fn set_filter(&self, update: FilterUpdate) {
        update.apply(&mut self.state.lock());
    }

    /// Resets every field to its default.
    pub fn clear_filters(&self) {
        *self.state.lock() = Filters::default();
    }
}
