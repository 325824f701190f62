//! Public catalog endpoints: tools, categories, reviews and reports.
//!
//! These calls hold no local state. Listings come back as the full
//! [`ApiResponse`] so pagination metadata stays available; single records
//! are unwrapped from their `data` envelope.
//!
//! # Examples
//!
//! ```rust,no_run
//! use atlas::prelude::*;
//!
//! # async fn example(atlas: &Atlas) -> atlas::Result<()> {
//! atlas.filters().set_filter(FilterUpdate::Query("speech to text".to_string()));
//!
//! let results = atlas
//!     .catalog()
//!     .search_tools(&atlas.filters().snapshot(), Page::default())
//!     .await?;
//!
//! for tool in &results.data {
//!     println!("{} ({:.1})", tool.name, tool.avg_rating_overall);
//! }
//! # Ok(())
//! # }
//! ```

use crate::{
    error::Result,
    net::ApiClient,
    store::Filters,
    types::{Alternatives, ApiResponse, Category, CreateReviewInput, Report, ReportInput, Review, Tool},
};

/// Which page of a listing to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

impl Page {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            ..self
        }
    }

    pub(crate) fn to_query(self) -> [(&'static str, String); 2] {
        [
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ]
    }
}

/// Ordering of a tool's reviews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReviewSort {
    #[default]
    Newest,
    MostHelpful,
    Highest,
    Lowest,
}

impl ReviewSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewSort::Newest => "newest",
            ReviewSort::MostHelpful => "most_helpful",
            ReviewSort::Highest => "highest",
            ReviewSort::Lowest => "lowest",
        }
    }
}

/// Read access to the public catalog, plus review and report submission.
#[derive(Debug, Clone)]
pub struct Catalog {
    api: ApiClient,
}

impl Catalog {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Browses tools with the given filters.
    pub async fn list_tools(&self, filters: &Filters, page: Page) -> Result<ApiResponse<Vec<Tool>>> {
        self.api.get("/tools", &listing_query(filters, page)).await
    }

    /// Full-text search; `filters.query` is sent as `q`.
    pub async fn search_tools(
        &self,
        filters: &Filters,
        page: Page,
    ) -> Result<ApiResponse<Vec<Tool>>> {
        self.api.get("/search/tools", &listing_query(filters, page)).await
    }

    pub async fn tool(&self, slug: &str) -> Result<Tool> {
        self.api.get_data(&tool_path(slug, ""), &[]).await
    }

    /// Tools in the same category and tools explicitly listed as alternatives.
    pub async fn alternatives(&self, slug: &str) -> Result<Alternatives> {
        self.api.get_data(&tool_path(slug, "/alternatives"), &[]).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.api.get_data("/categories", &[]).await
    }

    /// Tools of one category. The backend only pages this listing; it does
    /// not apply search filters.
    pub async fn category_tools(&self, slug: &str, page: Page) -> Result<ApiResponse<Vec<Tool>>> {
        let path = format!("/categories/{}/tools", urlencoding::encode(slug));
        self.api.get(&path, &page.to_query()).await
    }

    pub async fn reviews(
        &self,
        slug: &str,
        sort: ReviewSort,
        page: Page,
    ) -> Result<ApiResponse<Vec<Review>>> {
        let mut query = page.to_query().to_vec();
        query.push(("sort", sort.as_str().to_string()));
        self.api.get(&tool_path(slug, "/reviews"), &query).await
    }

    /// Posts a review as the signed-in user.
    ///
    /// # Errors
    ///
    /// The backend answers 401 without a session and 409 when the user has
    /// already reviewed the tool; both surface as [`Error::Api`](crate::Error::Api).
    pub async fn create_review(&self, slug: &str, input: &CreateReviewInput) -> Result<Review> {
        let response: ApiResponse<Review> = self.api.post(&tool_path(slug, "/reviews"), input).await?;
        Ok(response.data)
    }

    /// Reviews written by the signed-in user.
    pub async fn my_reviews(&self, page: Page) -> Result<ApiResponse<Vec<Review>>> {
        self.api.get("/me/reviews", &page.to_query()).await
    }

    pub async fn report_tool(&self, slug: &str, input: &ReportInput) -> Result<Report> {
        let response: ApiResponse<Report> = self.api.post(&tool_path(slug, "/report"), input).await?;
        Ok(response.data)
    }

    pub async fn report_review(&self, review_id: u64, input: &ReportInput) -> Result<Report> {
        let path = format!("/reviews/{}/report", review_id);
        let response: ApiResponse<Report> = self.api.post(&path, input).await?;
        Ok(response.data)
    }
}

fn tool_path(slug: &str, suffix: &str) -> String {
    format!("/tools/{}{}", urlencoding::encode(slug), suffix)
}

fn listing_query(filters: &Filters, page: Page) -> Vec<(&'static str, String)> {
    let mut query = filters.to_query();
    query.extend(page.to_query());
    query
}
