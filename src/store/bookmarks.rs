//! The user's bookmarked tools.
//!
//! Additions wait for the backend before touching local state; removals are
//! optimistic and, if the backend refuses, put the removed entry back where
//! it was. Both collections
//! (`tool_ids` and `tools`) change together under one lock, so readers never
//! see them disagree outside a removal's optimistic window.
//!
//! # Examples
//!
//! ```rust,no_run
//! use atlas::prelude::*;
//!
//! # async fn example(atlas: &Atlas, tool: &Tool) -> atlas::Result<()> {
//! let bookmarks = atlas.bookmarks();
//! bookmarks.fetch_bookmarks().await;
//!
//! if bookmarks.is_bookmarked(tool.id) {
//!     bookmarks.remove_bookmark(tool.id).await?;
//! } else {
//!     bookmarks.add_bookmark(tool).await?;
//! }
//! # Ok(())
//! # }
//! ```

use parking_lot::Mutex;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

use super::{InFlight, Loading, optimistic};
use crate::{
    Error, Result,
    net::ApiClient,
    storage::{self, Persisted, Storage},
    types::{ApiResponse, Tool, ToolId},
};

const BOOKMARKS_PATH: &str = "/me/bookmarks";

/// Snapshot of the bookmark collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookmarkState {
    /// Bookmarked ids in insertion order
    pub tool_ids: Vec<ToolId>,

    /// Full records for the same ids
    pub tools: Vec<Tool>,
}

/// Entries a removal took out, with the positions they held.
#[derive(Debug, Default)]
struct Removed {
    id_at: Option<usize>,
    tool: Option<(usize, Tool)>,
}

impl BookmarkState {
    fn take(&mut self, tool_id: ToolId) -> Removed {
        let id_at = self.tool_ids.iter().position(|&id| id == tool_id);
        if let Some(at) = id_at {
            self.tool_ids.remove(at);
        }
        let tool = self
            .tools
            .iter()
            .position(|t| t.id == tool_id)
            .map(|at| (at, self.tools.remove(at)));

        Removed { id_at, tool }
    }

    /// Undoes a failed [`take`](Self::take). Entries are clamped to the
    /// current length and skipped if something re-added them meanwhile.
    fn restore(&mut self, tool_id: ToolId, removed: Removed) {
        if let Some(at) = removed.id_at {
            if !self.tool_ids.contains(&tool_id) {
                self.tool_ids.insert(at.min(self.tool_ids.len()), tool_id);
            }
        }
        if let Some((at, tool)) = removed.tool {
            if !self.tools.iter().any(|t| t.id == tool_id) {
                self.tools.insert(at.min(self.tools.len()), tool);
            }
        }
    }

    fn insert(&mut self, tool: &Tool) {
        if !self.tool_ids.contains(&tool.id) {
            self.tool_ids.push(tool.id);
        }
        if !self.tools.iter().any(|t| t.id == tool.id) {
            self.tools.push(tool.clone());
        }
    }
}

/// Unversioned camelCase shape, written before snapshots had an envelope.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyBookmarks {
    #[serde(default)]
    bookmarked_tool_ids: Vec<ToolId>,
    #[serde(default)]
    bookmarked_tools: Vec<Tool>,
}

impl Persisted for BookmarkState {
    const KEY: &'static str = "bookmarks";
    const VERSION: u32 = 1;

    fn migrate(version: u32, data: Value) -> Result<Self> {
        match version {
            0 => {
                let legacy: LegacyBookmarks = serde_json::from_value(data)?;
                Ok(BookmarkState {
                    tool_ids: legacy.bookmarked_tool_ids,
                    tools: legacy.bookmarked_tools,
                })
            }
            other => Err(Error::storage(format!(
                "no migration from bookmarks schema version {}",
                other
            ))),
        }
    }
}

/// Mirrors the user's bookmarks and persists them across restarts.
pub struct BookmarksStore {
    api: ApiClient,
    storage: Arc<dyn Storage>,
    state: Mutex<BookmarkState>,
    loading: AtomicBool,
    in_flight: InFlight<ToolId>,
}

impl BookmarksStore {
    /// Creates the store, restoring any persisted bookmarks.
    pub fn new(api: ApiClient, storage: Arc<dyn Storage>) -> Self {
        let state: BookmarkState = storage::restore_or_default(storage.as_ref());
        debug!(count = state.tool_ids.len(), "restored bookmarks");

        Self {
            api,
            storage,
            state: Mutex::new(state),
            loading: AtomicBool::new(false),
            in_flight: InFlight::new(),
        }
    }

    /// Bookmarked ids in insertion order.
    pub fn bookmarked_tool_ids(&self) -> Vec<ToolId> {
        self.state.lock().tool_ids.clone()
    }

    /// Full records of the bookmarked tools.
    pub fn bookmarked_tools(&self) -> Vec<Tool> {
        self.state.lock().tools.clone()
    }

    /// Both collections, read under one lock.
    pub fn snapshot(&self) -> BookmarkState {
        self.state.lock().clone()
    }

    /// Whether a fetch is running.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Whether `tool_id` is bookmarked locally.
    pub fn is_bookmarked(&self, tool_id: ToolId) -> bool {
        self.state.lock().tool_ids.contains(&tool_id)
    }

    /// Replaces local bookmarks with the backend's list.
    ///
    /// Failures are logged and leave the current state untouched; they are
    /// never returned to the caller.
    pub async fn fetch_bookmarks(&self) {
        let _loading = Loading::start(&self.loading);

        match self.api.get::<ApiResponse<Vec<Tool>>>(BOOKMARKS_PATH, &[]).await {
            Ok(response) => {
                let mut state = self.state.lock();
                state.tool_ids = response.data.iter().map(|t| t.id).collect();
                state.tools = response.data;
                storage::save_logged(self.storage.as_ref(), &*state);
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch bookmarks");
            }
        }
    }

    /// Bookmarks `tool` once the backend confirms it.
    ///
    /// Nothing changes locally until the request succeeds; the record is then
    /// inserted if it is not already present.
    ///
    /// # Errors
    ///
    /// * [`Error::InFlight`] - If a mutation for the same tool is still pending
    /// * Any transport error from the request, with no local change
    pub async fn add_bookmark(&self, tool: &Tool) -> Result<()> {
        let _guard = self.in_flight.acquire(tool.id)?;

        let body = json!({ "tool_id": tool.id });
        if let Err(e) = self.api.post::<IgnoredAny, _>(BOOKMARKS_PATH, &body).await {
            warn!(tool_id = tool.id, error = %e, "failed to add bookmark");
            return Err(e);
        }

        let mut state = self.state.lock();
        state.insert(tool);
        storage::save_logged(self.storage.as_ref(), &*state);
        Ok(())
    }

    /// Removes the bookmark immediately, then confirms with the backend.
    ///
    /// If the backend refuses, the id and record go back to the positions
    /// they held and the error is returned. Changes confirmed by other calls
    /// while this one was pending are kept.
    ///
    /// # Errors
    ///
    /// * [`Error::InFlight`] - If a mutation for the same tool is still pending
    /// * Any transport error from the request, after rollback
    pub async fn remove_bookmark(&self, tool_id: ToolId) -> Result<()> {
        let _guard = self.in_flight.acquire(tool_id)?;
        let path = format!("{}/{}", BOOKMARKS_PATH, tool_id);

        let result = optimistic(
            &self.state,
            |state| state.take(tool_id),
            |state, removed| state.restore(tool_id, removed),
            |state| storage::save_logged(self.storage.as_ref(), state),
            self.api.delete::<IgnoredAny>(&path),
        )
        .await;

        if let Err(e) = &result {
            warn!(tool_id, error = %e, "failed to remove bookmark, rolled back");
        }
        result.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn tool(id: ToolId) -> Tool {
        Tool {
            id,
            slug: format!("tool-{}", id),
            name: format!("Tool {}", id),
            ..Default::default()
        }
    }

    #[test]
    fn test_state_insert_is_idempotent() {
        let mut state = BookmarkState::default();
        state.insert(&tool(1));
        state.insert(&tool(1));
        assert_eq!(state.tool_ids, vec![1]);
        assert_eq!(state.tools.len(), 1);

        state.take(1);
        assert!(state.tool_ids.is_empty());
        assert!(state.tools.is_empty());
    }

    #[test]
    fn test_restore_returns_entry_to_its_position() {
        let mut state = BookmarkState::default();
        for id in [1, 2, 3] {
            state.insert(&tool(id));
        }
        let before = state.clone();

        let removed = state.take(2);
        state.restore(2, removed);
        assert_eq!(state, before);

        let removed = state.take(3);
        state.take(1);
        state.restore(3, removed);
        assert_eq!(state.tool_ids, vec![2, 3]);

        let removed = state.take(2);
        state.insert(&tool(2));
        state.restore(2, removed);
        assert_eq!(state.tool_ids, vec![3, 2]);
        assert_eq!(state.tools.len(), 2);
    }

    #[test]
    fn test_legacy_payload_migrates() {
        let storage = MemoryStorage::new();
        storage
            .write(
                "bookmarks",
                br#"{"bookmarkedToolIds": [2], "bookmarkedTools": [{"id": 2, "slug": "b", "name": "B"}], "loading": false}"#,
            )
            .unwrap();

        let state: BookmarkState = storage::load(&storage).unwrap().unwrap();
        assert_eq!(state.tool_ids, vec![2]);
        assert_eq!(state.tools[0].slug, "b");
    }
}
