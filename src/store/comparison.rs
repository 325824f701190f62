//! Side-by-side comparison selection.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    Error, Result,
    storage::{self, Persisted, Storage},
    types::{Tool, ToolId},
};

/// Largest number of tools that can be compared at once.
pub const MAX_COMPARE_TOOLS: usize = 4;

const COMPARE_PATH: &str = "/compare";

/// The selected tools, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonState {
    pub tools: Vec<Tool>,
}

impl ComparisonState {
    /// Drops duplicates and anything past the size limit.
    fn normalized(mut self) -> Self {
        let mut seen = Vec::with_capacity(MAX_COMPARE_TOOLS);
        self.tools.retain(|t| {
            if seen.contains(&t.id) || seen.len() >= MAX_COMPARE_TOOLS {
                false
            } else {
                seen.push(t.id);
                true
            }
        });
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyComparison {
    #[serde(default)]
    selected_tools: Vec<Tool>,
}

impl Persisted for ComparisonState {
    const KEY: &'static str = "comparison";
    const VERSION: u32 = 1;

    fn migrate(version: u32, data: Value) -> Result<Self> {
        match version {
            0 => {
                let legacy: LegacyComparison = serde_json::from_value(data)?;
                Ok(ComparisonState {
                    tools: legacy.selected_tools,
                })
            }
            other => Err(Error::storage(format!(
                "no migration from comparison schema version {}",
                other
            ))),
        }
    }
}

/// Bounded, duplicate-free selection of tools for comparison.
///
/// # Examples
///
/// ```rust
/// use atlas::storage::MemoryStorage;
/// use atlas::store::ComparisonStore;
/// use atlas::types::Tool;
/// use std::sync::Arc;
///
/// let compare = ComparisonStore::new(Arc::new(MemoryStorage::new()));
/// assert_eq!(compare.compare_url(), "/compare");
///
/// let tool = Tool { id: 1, slug: "a".into(), name: "A".into(), ..Default::default() };
/// assert!(compare.add_tool(tool.clone()));
/// assert!(!compare.add_tool(tool));
/// assert_eq!(compare.compare_url(), "/compare?tools=a");
/// ```
pub struct ComparisonStore {
    storage: Arc<dyn Storage>,
    state: Mutex<ComparisonState>,
}

impl ComparisonStore {
    /// Creates the store, restoring any persisted selection.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let state: ComparisonState = storage::restore_or_default(storage.as_ref());
        Self {
            storage,
            state: Mutex::new(state.normalized()),
        }
    }

    /// Selected tools in the order they were added.
    pub fn selected_tools(&self) -> Vec<Tool> {
        self.state.lock().tools.clone()
    }

    /// Number of selected tools.
    pub fn count(&self) -> usize {
        self.state.lock().tools.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.state.lock().tools.is_empty()
    }

    /// Whether the selection has reached [`MAX_COMPARE_TOOLS`].
    pub fn is_full(&self) -> bool {
        self.state.lock().tools.len() >= MAX_COMPARE_TOOLS
    }

    /// Whether `tool_id` is selected.
    pub fn is_in_comparison(&self, tool_id: ToolId) -> bool {
        self.state.lock().tools.iter().any(|t| t.id == tool_id)
    }

    /// Adds `tool` to the selection.
    ///
    /// Returns `false`, leaving the selection unchanged, when it is already
    /// full or already contains the tool.
    pub fn add_tool(&self, tool: Tool) -> bool {
        let mut state = self.state.lock();
        if state.tools.len() >= MAX_COMPARE_TOOLS || state.tools.iter().any(|t| t.id == tool.id) {
            return false;
        }
        state.tools.push(tool);
        storage::save_logged(self.storage.as_ref(), &*state);
        true
    }

    /// Drops `tool_id` from the selection, if present.
    pub fn remove_tool(&self, tool_id: ToolId) {
        let mut state = self.state.lock();
        state.tools.retain(|t| t.id != tool_id);
        storage::save_logged(self.storage.as_ref(), &*state);
    }

    /// Empties the selection.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.tools.clear();
        storage::save_logged(self.storage.as_ref(), &*state);
    }

    /// Shareable path for the current selection.
    ///
    /// `/compare` when nothing is selected, otherwise
    /// `/compare?tools=<slug>,<slug>...` in selection order.
    pub fn compare_url(&self) -> String {
        let state = self.state.lock();
        if state.tools.is_empty() {
            return COMPARE_PATH.to_string();
        }

        let slugs: Vec<_> = state
            .tools
            .iter()
            .map(|t| urlencoding::encode(&t.slug))
            .collect();
        format!("{}?tools={}", COMPARE_PATH, slugs.join(","))
    }
}
