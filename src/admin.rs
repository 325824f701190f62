//! Admin and moderation endpoints.
//!
//! Every call here needs a session with the `admin` role; the backend
//! answers 401 without a session and 403 for other roles, surfaced as
//! [`Error::Api`](crate::Error::Api). Deletions and archival answer with
//! no body.

use serde::de::IgnoredAny;
use serde_json::Value;
use tracing::info;

use crate::{
    catalog::Page,
    error::Result,
    net::ApiClient,
    types::{
        ApiResponse, Category, CategoryWithCount, CreateCategoryInput, CreateTagInput,
        CreateToolInput, ModerationActionInput, ReportWithContext, Review, Tag, TagWithCount,
        Tool, UpdateCategoryInput, UpdateTagInput, UpdateToolInput,
    },
};

/// Filter for the admin tool listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminToolQuery {
    /// Name substring to match
    pub search: Option<String>,
    pub include_archived: bool,
    pub page: Page,
}

impl AdminToolQuery {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.page.to_query().to_vec();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if self.include_archived {
            query.push(("archived", "true".to_string()));
        }
        query
    }
}

/// Filter for the moderation queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueQuery {
    /// `tool` or `review`; `None` lists both
    pub kind: Option<String>,
    /// Report status, `pending` unless changed
    pub status: String,
    pub page: Page,
}

impl Default for QueueQuery {
    fn default() -> Self {
        Self {
            kind: None,
            status: "pending".to_string(),
            page: Page::default(),
        }
    }
}

impl QueueQuery {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.page.to_query().to_vec();
        if let Some(kind) = &self.kind {
            query.push(("type", kind.clone()));
        }
        query.push(("status", self.status.clone()));
        query
    }
}

/// What a moderator does with a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Hide,
    Remove,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::Approve => "approve",
            ModerationAction::Hide => "hide",
            ModerationAction::Remove => "remove",
        }
    }
}

/// Catalog management and review moderation.
///
/// # Examples
///
/// ```rust,no_run
/// use atlas::prelude::*;
/// use atlas::admin::{ModerationAction, QueueQuery};
///
/// # async fn example(atlas: &Atlas) -> atlas::Result<()> {
/// let queue = atlas.admin().moderation_queue(&QueueQuery::default()).await?;
///
/// for item in queue.data {
///     if let Some(review) = item.review {
///         atlas
///             .admin()
///             .moderate_review(review.id, ModerationAction::Hide, Some("spam"))
///             .await?;
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Admin {
    api: ApiClient,
}

impl Admin {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_tools(&self, query: &AdminToolQuery) -> Result<ApiResponse<Vec<Tool>>> {
        self.api.get("/admin/tools", &query.to_query()).await
    }

    pub async fn create_tool(&self, input: &CreateToolInput) -> Result<Tool> {
        let response: ApiResponse<Tool> = self.api.post("/admin/tools", input).await?;
        info!(tool_id = response.data.id, slug = %response.data.slug, "created tool");
        Ok(response.data)
    }

    pub async fn tool(&self, id: u64) -> Result<Tool> {
        self.api.get_data(&format!("/admin/tools/{}", id), &[]).await
    }

    pub async fn update_tool(&self, id: u64, input: &UpdateToolInput) -> Result<Tool> {
        let response: ApiResponse<Tool> = self.api.patch(&format!("/admin/tools/{}", id), input).await?;
        Ok(response.data)
    }

    /// Archives a tool. Archived tools drop out of public listings but keep
    /// their reviews and bookmarks.
    pub async fn archive_tool(&self, id: u64) -> Result<()> {
        self.api.delete::<IgnoredAny>(&format!("/admin/tools/{}", id)).await?;
        info!(tool_id = id, "archived tool");
        Ok(())
    }

    pub async fn categories(&self) -> Result<Vec<CategoryWithCount>> {
        self.api.get_data("/admin/categories", &[]).await
    }

    pub async fn create_category(&self, input: &CreateCategoryInput) -> Result<Category> {
        let response: ApiResponse<Category> = self.api.post("/admin/categories", input).await?;
        Ok(response.data)
    }

    pub async fn category(&self, id: u64) -> Result<Category> {
        self.api.get_data(&format!("/admin/categories/{}", id), &[]).await
    }

    pub async fn update_category(&self, id: u64, input: &UpdateCategoryInput) -> Result<Category> {
        let path = format!("/admin/categories/{}", id);
        let response: ApiResponse<Category> = self.api.patch(&path, input).await?;
        Ok(response.data)
    }

    /// Deletes a category. The backend refuses while tools still use it.
    pub async fn delete_category(&self, id: u64) -> Result<()> {
        self.api.delete::<IgnoredAny>(&format!("/admin/categories/{}", id)).await?;
        Ok(())
    }

    pub async fn tags(&self) -> Result<Vec<TagWithCount>> {
        self.api.get_data("/admin/tags", &[]).await
    }

    pub async fn create_tag(&self, input: &CreateTagInput) -> Result<Tag> {
        let response: ApiResponse<Tag> = self.api.post("/admin/tags", input).await?;
        Ok(response.data)
    }

    pub async fn tag(&self, id: u64) -> Result<Tag> {
        self.api.get_data(&format!("/admin/tags/{}", id), &[]).await
    }

    pub async fn update_tag(&self, id: u64, input: &UpdateTagInput) -> Result<Tag> {
        let response: ApiResponse<Tag> = self.api.patch(&format!("/admin/tags/{}", id), input).await?;
        Ok(response.data)
    }

    pub async fn delete_tag(&self, id: u64) -> Result<()> {
        self.api.delete::<IgnoredAny>(&format!("/admin/tags/{}", id)).await?;
        Ok(())
    }

    /// Reports awaiting moderation, each with the tool or review it targets.
    pub async fn moderation_queue(
        &self,
        query: &QueueQuery,
    ) -> Result<ApiResponse<Vec<ReportWithContext>>> {
        self.api.get("/admin/moderation/queue", &query.to_query()).await
    }

    /// Applies a moderation action to a review and returns the updated review.
    pub async fn moderate_review(
        &self,
        review_id: u64,
        action: ModerationAction,
        notes: Option<&str>,
    ) -> Result<Review> {
        let path = format!("/admin/moderation/reviews/{}/{}", review_id, action.as_str());
        let body = ModerationActionInput {
            notes: notes.map(str::to_string),
        };

        let response: ApiResponse<Review> = self.api.patch(&path, &body).await?;
        info!(review_id, action = action.as_str(), "moderated review");
        Ok(response.data)
    }

    /// Dashboard counters. The shape is owned by the backend and returned
    /// untyped.
    pub async fn analytics_overview(&self) -> Result<Value> {
        self.api.get_data("/admin/analytics/overview", &[]).await
    }
}
