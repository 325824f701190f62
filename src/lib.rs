//! # Atlas - client library for the AI Tools Atlas directory
//!
//! Atlas talks to the AI Tools Atlas REST API and keeps the pieces of
//! client state an application needs: the signed-in user, bookmarks, a
//! comparison selection and search filters. Bookmarks and the comparison
//! selection survive restarts through a small versioned on-disk store.
//!
//! ## Features
//!
//! - **Typed transport**: JSON requests with the session cookie attached and
//!   backend error bodies decoded into [`Error::Api`]
//! - **Optimistic bookmarks**: removals apply immediately and roll back
//!   exactly when the backend refuses
//! - **Bounded comparison**: up to four tools, shareable as a `/compare` link
//! - **Route table**: path resolution and role checks for every view
//! - **Catalog and admin endpoints**: listings, reviews, reports, catalog
//!   management and moderation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use atlas::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> atlas::Result<()> {
//!     let atlas = Atlas::new(ClientConfig::from_env())?;
//!     atlas.bootstrap().await;
//!
//!     let tools = atlas
//!         .catalog()
//!         .list_tools(&atlas.filters().snapshot(), Page::default())
//!         .await?;
//!
//!     if let Some(tool) = tools.data.first() {
//!         atlas.comparison().add_tool(tool.clone());
//!         if atlas.session().is_authenticated() {
//!             atlas.bookmarks().add_bookmark(tool).await?;
//!         }
//!     }
//!
//!     println!("compare: {}", atlas.comparison().compare_url());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`app`]: the [`Atlas`] context that owns the stores
//! - [`store`]: session, bookmarks, comparison and filter state
//! - [`net`]: the [`Transport`](net::Transport) seam and [`ApiClient`]
//! - [`catalog`] / [`admin`]: stateless endpoint wrappers
//! - [`router`]: route table and access checks
//! - [`storage`]: durable, versioned store snapshots
//! - [`config`]: base URL, state directory and timeouts
//! - [`types`]: wire types shared by everything above
//! - [`error`]: the crate-wide [`Error`] and [`Result`]
//!
//! ## Logging
//!
//! Atlas emits [`tracing`] events and installs no subscriber; the embedding
//! application decides where they go.

pub mod admin;
pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod net;
pub mod router;
pub mod storage;
pub mod store;
pub mod types;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use atlas::prelude::*;
///
/// // Now you have access to:
/// // - Atlas, ClientConfig, ApiClient
/// // - the stores and their update types
/// // - Router, RouteName, Access
/// // - Tool, User, Category, Review
/// ```
pub mod prelude {
    pub use crate::{
        app::Atlas,
        catalog::{Page, ReviewSort},
        config::ClientConfig,
        net::ApiClient,
        router::{Access, RouteName, Router},
        store::{
            BookmarksStore, ComparisonStore, FilterUpdate, Filters, FiltersStore, PriceTier,
            SessionStore, SortKey,
        },
        types::{Category, Review, Tool, ToolId, User},
    };
}

// Re-export main types at crate root for direct access
pub use app::Atlas;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use net::ApiClient;
pub use types::{Tool, ToolId, User};
