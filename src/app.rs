//! The application context that owns every store.

use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    admin::Admin,
    catalog::Catalog,
    config::ClientConfig,
    error::Result,
    net::ApiClient,
    router::Router,
    storage::{FileStorage, Storage},
    store::{BookmarksStore, ComparisonStore, FiltersStore, SessionStore},
};

/// One client session against the Atlas backend.
///
/// `Atlas` wires a single [`ApiClient`] and a single [`Storage`] into all
/// stores. Share it across tasks behind an [`Arc`]; every store is
/// `Send + Sync`.
///
/// # Examples
///
/// ```rust,no_run
/// use atlas::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> atlas::Result<()> {
///     let atlas = Atlas::new(ClientConfig::from_env())?;
///     atlas.bootstrap().await;
///
///     match atlas.session().user() {
///         Some(user) => println!("signed in as {}", user.email),
///         None => println!("browsing anonymously"),
///     }
///     println!("{} bookmarks", atlas.bookmarks().bookmarked_tool_ids().len());
///     Ok(())
/// }
/// ```
pub struct Atlas {
    api: ApiClient,
    session: SessionStore,
    bookmarks: BookmarksStore,
    comparison: ComparisonStore,
    filters: FiltersStore,
    catalog: Catalog,
    admin: Admin,
    router: &'static Router,
}

impl Atlas {
    /// Builds the context over HTTP, persisting to `config.state_dir`.
    ///
    /// # Errors
    ///
    /// * [`Error::Network`](crate::Error::Network) - If the HTTP client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api = ApiClient::http(&config)?;
        let storage = Arc::new(FileStorage::new(config.state_dir.clone()));

        info!(
            base_url = %config.base_url,
            state_dir = %config.state_dir.display(),
            "atlas client ready"
        );
        Ok(Self::with_parts(api, storage))
    }

    /// Builds the context from an existing client and storage backend.
    ///
    /// Persisted store state is restored from `storage` immediately.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use atlas::prelude::*;
    /// use atlas::net::HttpTransport;
    /// use atlas::storage::MemoryStorage;
    /// use std::sync::Arc;
    ///
    /// # fn main() -> atlas::Result<()> {
    /// let config = ClientConfig::default().with_base_url("http://127.0.0.1:9000/api/v1");
    /// let client = ApiClient::new(Arc::new(HttpTransport::new(&config)?));
    ///
    /// let atlas = Atlas::with_parts(client, Arc::new(MemoryStorage::new()));
    /// assert!(atlas.comparison().is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_parts(api: ApiClient, storage: Arc<dyn Storage>) -> Self {
        let atlas = Self {
            session: SessionStore::new(api.clone()),
            bookmarks: BookmarksStore::new(api.clone(), storage.clone()),
            comparison: ComparisonStore::new(storage),
            filters: FiltersStore::new(),
            catalog: Catalog::new(api.clone()),
            admin: Admin::new(api.clone()),
            router: Router::shared(),
            api,
        };
        debug!(
            bookmarks = atlas.bookmarks.bookmarked_tool_ids().len(),
            compared = atlas.comparison.count(),
            "stores restored"
        );
        atlas
    }

    /// Loads the session and the bookmark list concurrently.
    ///
    /// Both fetches settle on failure (signed out, bookmarks unchanged), so
    /// this never fails.
    pub async fn bootstrap(&self) {
        futures::join!(
            self.session.fetch_current_user(),
            self.bookmarks.fetch_bookmarks()
        );
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn bookmarks(&self) -> &BookmarksStore {
        &self.bookmarks
    }

    pub fn comparison(&self) -> &ComparisonStore {
        &self.comparison
    }

    pub fn filters(&self) -> &FiltersStore {
        &self.filters
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn admin(&self) -> &Admin {
        &self.admin
    }

    pub fn router(&self) -> &Router {
        self.router
    }
}

impl std::fmt::Debug for Atlas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Atlas")
            .field("api", &self.api)
            .field("authenticated", &self.session.is_authenticated())
            .finish_non_exhaustive()
    }
}
