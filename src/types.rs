//! Data-transfer types for the Atlas API.
//!
//! This module defines the shapes exchanged with the backend:
//!
//! - [`Tool`] - A catalog entry with its rating statistics and relations
//! - [`Category`], [`Tag`], [`Badge`], [`Media`] - Reference data attached to tools
//! - [`Review`] - A user's review of a tool
//! - [`Bookmark`] - Membership of a tool in a user's saved set
//! - [`User`] - An account and its [`Role`]
//! - [`ApiResponse`] / [`ApiErrorBody`] - The success and error envelopes
//!
//! Create/update inputs for the admin surface live here as well.
//!
//! # Examples
//!
//! ```rust
//! use atlas::types::{ApiResponse, Tool};
//!
//! let body = r#"{"data": [{"id": 7, "slug": "whisper", "name": "Whisper",
//!                          "primary_category_id": 2, "avg_rating_overall": 4.5}],
//!                "meta": {"page": 1, "page_size": 20, "total": 1}}"#;
//!
//! let response: ApiResponse<Vec<Tool>> = serde_json::from_str(body).unwrap();
//! assert_eq!(response.data[0].slug, "whisper");
//! assert_eq!(response.meta.unwrap().total, 1);
//! ```

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a tool; the primary key the bookmark and comparison stores use.
pub type ToolId = u64;

/// Success envelope: every successful response wraps its payload in `data`.
///
/// Listing endpoints add pagination metadata in `meta`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

/// Pagination metadata of listing responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,

    /// Echo of the search query on `/search/tools`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Capability level of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
    Moderator,

    /// Any role string this client does not know about
    #[serde(other)]
    Unknown,
}

/// An authenticated account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

/// Category as listed on the admin surface, with its tool count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    #[serde(default)]
    pub tool_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagWithCount {
    #[serde(flatten)]
    pub tag: Tag,
    #[serde(default)]
    pub tool_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Screenshot,
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: u64,
    pub tool_id: ToolId,
    #[serde(rename = "type")]
    pub kind: MediaType,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: u64,
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolFeature {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Feature list of a tool.
///
/// Older records carry features as free text instead of a structured list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Features {
    List(Vec<ToolFeature>),
    Text(String),
}

/// A catalog entry.
///
/// Identity is `id`; `slug` is the human-readable alternate key used in
/// URLs.
///
/// # Examples
///
/// ```rust
/// use atlas::types::Tool;
///
/// let tool = Tool {
///     id: 1,
///     slug: "copilot".to_string(),
///     name: "Copilot".to_string(),
///     has_free_tier: true,
///     ..Default::default()
/// };
/// assert!(tool.tags.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: ToolId,
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_for: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_use_cases: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_roles: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<String>,
    #[serde(default)]
    pub has_free_tier: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,
    #[serde(default)]
    pub primary_category_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_category: Option<Category>,

    // Rating statistics maintained by the backend
    #[serde(default)]
    pub avg_rating_overall: f64,
    #[serde(default)]
    pub review_count: u64,
    #[serde(default)]
    pub bookmark_count: u64,
    #[serde(default)]
    pub trending_score: f64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<Media>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<Badge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Features>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

/// Response of `GET /tools/{slug}/alternatives`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Alternatives {
    #[serde(default)]
    pub similar: Vec<Tool>,
    #[serde(default)]
    pub alternatives: Vec<Tool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewUser {
    pub id: u64,
    #[serde(default)]
    pub display_name: String,
}

/// A review of a tool by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    #[serde(default)]
    pub tool_id: Option<ToolId>,
    #[serde(default)]
    pub user_id: Option<u64>,
    pub rating_overall: u8,
    #[serde(default)]
    pub rating_ease_of_use: Option<u8>,
    #[serde(default)]
    pub rating_value: Option<u8>,
    #[serde(default)]
    pub rating_accuracy: Option<u8>,
    #[serde(default)]
    pub rating_speed: Option<u8>,
    #[serde(default)]
    pub rating_support: Option<u8>,
    #[serde(default)]
    pub pros: Option<String>,
    #[serde(default)]
    pub cons: Option<String>,
    #[serde(default)]
    pub primary_use_case: Option<String>,
    #[serde(default)]
    pub reviewer_role: Option<String>,
    #[serde(default)]
    pub company_size: Option<String>,
    #[serde(default)]
    pub usage_context: Option<String>,
    #[serde(default)]
    pub helpful_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<ReviewUser>,
}

/// Server-side record of a bookmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: u64,
    #[serde(default)]
    pub user_id: Option<u64>,
    pub tool_id: ToolId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A user report against a tool or review, awaiting moderation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: u64,
    /// `tool` or `review`
    pub reportable_type: String,
    pub reportable_id: u64,
    #[serde(default)]
    pub reporter_user_id: Option<u64>,
    pub reason: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reviewed_by: Option<u64>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Moderation queue entry: the report plus the object it points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportWithContext {
    #[serde(flatten)]
    pub report: Report,
    #[serde(default)]
    pub tool: Option<Tool>,
    #[serde(default)]
    pub review: Option<Review>,
}

/// Input for `POST /admin/tools`.
///
/// # Examples
///
/// ```rust
/// use atlas::types::CreateToolInputBuilder;
///
/// let input = CreateToolInputBuilder::default()
///     .slug("whisper")
///     .name("Whisper")
///     .primary_category_id(3u64)
///     .has_free_tier(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(input.slug, "whisper");
/// assert!(input.tagline.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Builder)]
#[builder(setter(into))]
pub struct CreateToolInput {
    pub slug: String,
    pub name: String,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_for: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_use_cases: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_summary: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_roles: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<String>,
    #[builder(default)]
    pub has_free_tier: bool,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,
    pub primary_category_id: u64,
}

/// Partial update for `PATCH /admin/tools/{id}`; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateToolInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_for: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_use_cases: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_roles: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_free_tier: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_category_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateCategoryInput {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    pub display_order: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateCategoryInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateTagInput {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTagInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Input for `POST /tools/{slug}/reviews`.
///
/// Ratings are 1 to 5; the backend rejects anything else.
#[derive(Debug, Clone, Default, Serialize, Builder)]
#[builder(setter(into))]
pub struct CreateReviewInput {
    pub rating_overall: u8,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_ease_of_use: Option<u8>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_value: Option<u8>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_accuracy: Option<u8>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_speed: Option<u8>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_support: Option<u8>,
    #[builder(default)]
    pub pros: String,
    #[builder(default)]
    pub cons: String,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_use_case: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_role: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_context: Option<String>,
}

/// Input for reporting a tool or review to moderators.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportInput {
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Optional notes attached to a moderation action.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModerationActionInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
