//! Client-side route table.
//!
//! Maps URL paths to views and tags each route with the access it needs.
//! The router does not enforce access itself: callers ask
//! [`RouteMeta::check`] before showing a view and redirect on anything but
//! [`Access::Allowed`].
//!
//! # Examples
//!
//! ```rust
//! use atlas::router::{Access, RouteName, Router, View};
//!
//! let router = Router::shared();
//!
//! let matched = router.resolve("/tools/whisper?tab=reviews").unwrap();
//! assert_eq!(matched.route.name, RouteName::ToolProfile);
//! assert_eq!(matched.param("slug"), Some("whisper"));
//!
//! let admin = router.get(RouteName::AdminTools).unwrap();
//! assert_eq!(admin.view, View::AdminTools);
//! assert_eq!(admin.meta.check(None), Access::LoginRequired);
//!
//! let href = router.href(RouteName::Category, &[("slug", "audio")]).unwrap();
//! assert_eq!(href, "/categories/audio");
//! ```

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::{
    error::{Error, Result},
    types::User,
};

static ROUTER: Lazy<Router> = Lazy::new(Router::new);

/// Stable names of the application's routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Home,
    ToolProfile,
    Category,
    Search,
    Compare,
    Bookmarks,
    Profile,
    AdminTools,
    AdminCategories,
    AdminTags,
    AdminAnalytics,
    ModerationQueue,
}

impl RouteName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Home => "home",
            RouteName::ToolProfile => "tool-profile",
            RouteName::Category => "category",
            RouteName::Search => "search",
            RouteName::Compare => "compare",
            RouteName::Bookmarks => "bookmarks",
            RouteName::Profile => "profile",
            RouteName::AdminTools => "admin-tools",
            RouteName::AdminCategories => "admin-categories",
            RouteName::AdminTags => "admin-tags",
            RouteName::AdminAnalytics => "admin-analytics",
            RouteName::ModerationQueue => "moderation-queue",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ROUTER
            .routes
            .iter()
            .map(|r| r.name)
            .find(|name| name.as_str() == s)
            .ok_or_else(|| Error::not_found(format!("route '{}'", s)))
    }
}

/// The screen a route renders.
///
/// Search and category listings share [`View::SearchResults`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    ToolProfile,
    SearchResults,
    Compare,
    Bookmarks,
    Profile,
    AdminTools,
    AdminCategories,
    AdminTags,
    AdminAnalytics,
    ModerationQueue,
}

/// Access requirements attached to a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_admin: bool,
}

/// Outcome of checking a route's requirements against a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    /// No one is signed in; send the user to login
    LoginRequired,
    /// Signed in, but without the required role
    Forbidden,
}

impl RouteMeta {
    const PUBLIC: RouteMeta = RouteMeta {
        requires_auth: false,
        requires_admin: false,
    };
    const AUTH: RouteMeta = RouteMeta {
        requires_auth: true,
        requires_admin: false,
    };
    const ADMIN: RouteMeta = RouteMeta {
        requires_auth: true,
        requires_admin: true,
    };

    /// Decides whether `user` may open a route with these requirements.
    ///
    /// Admin routes admit only the `admin` role; moderators are forbidden
    /// like any other non-admin account.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use atlas::router::{Access, RouteMeta};
    /// use atlas::types::{Role, User};
    ///
    /// let meta = RouteMeta { requires_auth: true, requires_admin: true };
    /// let user = User {
    ///     id: 1,
    ///     email: "mod@example.com".into(),
    ///     display_name: None,
    ///     role: Role::Moderator,
    ///     created_at: None,
    ///     updated_at: None,
    /// };
    ///
    /// assert_eq!(meta.check(Some(&user)), Access::Forbidden);
    /// ```
    pub fn check(&self, user: Option<&User>) -> Access {
        match user {
            None if self.requires_auth || self.requires_admin => Access::LoginRequired,
            Some(user) if self.requires_admin && !user.is_admin() => Access::Forbidden,
            _ => Access::Allowed,
        }
    }
}

/// One entry of the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: RouteName,
    /// Path pattern; `:name` segments capture a parameter
    pub path: &'static str,
    pub view: View,
    /// View is loaded on first navigation rather than up front
    pub lazy: bool,
    /// Path parameters are handed to the view as properties
    pub props: bool,
    pub meta: RouteMeta,
}

impl Route {
    const fn new(name: RouteName, path: &'static str, view: View, meta: RouteMeta) -> Self {
        Self {
            name,
            path,
            view,
            lazy: true,
            props: false,
            meta,
        }
    }

    const fn eager(mut self) -> Self {
        self.lazy = false;
        self
    }

    const fn with_props(mut self) -> Self {
        self.props = true;
        self
    }

    fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        let pattern: Vec<&str> = segments(self.path).collect();
        let actual: Vec<&str> = segments(path).collect();
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (expected, value) in pattern.iter().zip(actual) {
            match expected.strip_prefix(':') {
                Some(name) => {
                    let value = urlencoding::decode(value)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| value.to_string());
                    params.insert(name.to_string(), value);
                }
                None if *expected == value => {}
                None => return None,
            }
        }
        Some(params)
    }
}

/// A resolved path: the route it matched and the captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: HashMap<String, String>,
}

impl RouteMatch<'_> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// The application's route table, indexed by name.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
    by_name: HashMap<RouteName, usize>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Builds the full route table.
    pub fn new() -> Self {
        use RouteName as N;

        let routes = vec![
            Route::new(N::Home, "/", View::Home, RouteMeta::PUBLIC).eager(),
            Route::new(N::ToolProfile, "/tools/:slug", View::ToolProfile, RouteMeta::PUBLIC),
            Route::new(N::Category, "/categories/:slug", View::SearchResults, RouteMeta::PUBLIC)
                .with_props(),
            Route::new(N::Search, "/search", View::SearchResults, RouteMeta::PUBLIC),
            Route::new(N::Compare, "/compare", View::Compare, RouteMeta::PUBLIC),
            Route::new(N::Bookmarks, "/bookmarks", View::Bookmarks, RouteMeta::PUBLIC),
            Route::new(N::Profile, "/profile", View::Profile, RouteMeta::AUTH),
            Route::new(N::AdminTools, "/admin/tools", View::AdminTools, RouteMeta::ADMIN),
            Route::new(
                N::AdminCategories,
                "/admin/categories",
                View::AdminCategories,
                RouteMeta::ADMIN,
            ),
            Route::new(N::AdminTags, "/admin/tags", View::AdminTags, RouteMeta::ADMIN),
            Route::new(
                N::AdminAnalytics,
                "/admin/analytics",
                View::AdminAnalytics,
                RouteMeta::ADMIN,
            ),
            Route::new(
                N::ModerationQueue,
                "/moderation/queue",
                View::ModerationQueue,
                RouteMeta::ADMIN,
            ),
        ];

        let by_name = routes
            .iter()
            .enumerate()
            .map(|(index, route)| (route.name, index))
            .collect();

        Self { routes, by_name }
    }

    /// The process-wide route table.
    pub fn shared() -> &'static Router {
        &ROUTER
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn get(&self, name: RouteName) -> Option<&Route> {
        self.by_name.get(&name).and_then(|&index| self.routes.get(index))
    }

    /// Finds the route for `path`.
    ///
    /// Query string, fragment and trailing slashes are ignored. Returns
    /// `None` for paths outside the table.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = path.split(['?', '#']).next().unwrap_or_default();

        self.routes.iter().find_map(|route| {
            route
                .match_path(path)
                .map(|params| RouteMatch { route, params })
        })
    }

    /// Builds the concrete path of a named route.
    ///
    /// Parameter values are percent-encoded. Extra parameters are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the route needs a parameter that is
    /// not in `params`.
    pub fn href(&self, name: RouteName, params: &[(&str, &str)]) -> Result<String> {
        let route = self
            .get(name)
            .ok_or_else(|| Error::not_found(format!("route '{}'", name)))?;

        let mut parts = Vec::new();
        for segment in segments(route.path) {
            match segment.strip_prefix(':') {
                Some(param) => {
                    let value = params
                        .iter()
                        .find(|(key, _)| *key == param)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| {
                            Error::not_found(format!(
                                "route parameter '{}' for '{}'",
                                param, name
                            ))
                        })?;
                    parts.push(urlencoding::encode(value).into_owned());
                }
                None => parts.push(segment.to_string()),
            }
        }

        Ok(format!("/{}", parts.join("/")))
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
