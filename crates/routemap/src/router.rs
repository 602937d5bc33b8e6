//! Main router implementation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::{Result, RouterError};
use crate::method::Method;
use crate::pattern::normalize_path;
use crate::route::{Route, RouteEntry, RouteMap, RouteOptions};
use crate::variables::RouteVariables;

/// The outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute<H> {
    /// Handler of the matched route.
    pub handler: H,
    /// Route defaults overlaid with the values captured from the path.
    pub variables: RouteVariables,
}

/// A per-method table of routes.
///
/// Routes are kept in insertion order inside each method bucket and the first
/// matching route wins, so register the more specific of two overlapping
/// patterns first.
///
/// Resolution only needs `&self`; build the table once, then share it. To
/// change routes at runtime build a new `Router` and swap it in whole.
#[derive(Debug, Clone)]
pub struct Router<H> {
    /// Route buckets keyed by method.
    routes: BTreeMap<Method, Vec<Route<H>>>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Router<H> {
    /// Creates a new empty router.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            routes: BTreeMap::new(),
        }
    }

    /// Creates a router holding the given routes.
    pub fn with_routes<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<RouteEntry<H>>,
    {
        let mut router = Self::new();
        router.add_routes(entries)?;
        Ok(router)
    }

    /// Appends a compiled route to its method bucket.
    pub fn add_route(&mut self, route: Route<H>) -> &mut Self {
        debug!(method = %route.method(), pattern = route.pattern(), "registered route");
        self.routes.entry(route.method()).or_default().push(route);
        self
    }

    /// Appends several routes, compiling raw maps on the way.
    ///
    /// Stops at the first invalid entry; entries before it stay registered.
    pub fn add_routes<I>(&mut self, entries: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<RouteEntry<H>>,
    {
        for entry in entries {
            let route = entry.into().into_route()?;
            self.add_route(route);
        }
        Ok(self)
    }

    /// Compiles and adds a route with rules and defaults.
    pub fn route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
        options: RouteOptions,
    ) -> Result<&mut Self> {
        let route = Route::with_options(method, pattern, handler, options)?;
        Ok(self.add_route(route))
    }

    /// Adds a GET route.
    pub fn get(&mut self, pattern: &str, handler: H) -> Result<&mut Self> {
        self.route(Method::Get, pattern, handler, RouteOptions::default())
    }

    /// Adds a POST route.
    pub fn post(&mut self, pattern: &str, handler: H) -> Result<&mut Self> {
        self.route(Method::Post, pattern, handler, RouteOptions::default())
    }

    /// Adds a PUT route.
    pub fn put(&mut self, pattern: &str, handler: H) -> Result<&mut Self> {
        self.route(Method::Put, pattern, handler, RouteOptions::default())
    }

    /// Adds a PATCH route.
    pub fn patch(&mut self, pattern: &str, handler: H) -> Result<&mut Self> {
        self.route(Method::Patch, pattern, handler, RouteOptions::default())
    }

    /// Adds a DELETE route.
    pub fn delete(&mut self, pattern: &str, handler: H) -> Result<&mut Self> {
        self.route(Method::Delete, pattern, handler, RouteOptions::default())
    }

    /// Adds a HEAD route.
    pub fn head(&mut self, pattern: &str, handler: H) -> Result<&mut Self> {
        self.route(Method::Head, pattern, handler, RouteOptions::default())
    }

    /// Adds an OPTIONS route.
    pub fn options(&mut self, pattern: &str, handler: H) -> Result<&mut Self> {
        self.route(Method::Options, pattern, handler, RouteOptions::default())
    }

    /// Adds a TRACE route.
    pub fn trace(&mut self, pattern: &str, handler: H) -> Result<&mut Self> {
        self.route(Method::Trace, pattern, handler, RouteOptions::default())
    }

    /// Adds the same route to every method bucket.
    ///
    /// The pattern is compiled once and shared by all copies.
    pub fn all(&mut self, pattern: &str, handler: H, options: RouteOptions) -> Result<&mut Self>
    where
        H: Clone,
    {
        let route = Route::with_options(Method::Get, pattern, handler, options)?;
        for method in Method::ALL.into_iter().skip(1) {
            self.add_route(route.with_method(method));
        }
        Ok(self.add_route(route))
    }

    /// Iterates over every route, bucket by bucket, in insertion order.
    pub fn routes(&self) -> impl Iterator<Item = &Route<H>> {
        self.routes.values().flatten()
    }

    /// Returns the routes registered under one method.
    pub fn routes_for(&self, method: Method) -> &[Route<H>] {
        self.routes.get(&method).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    /// Returns true when no route is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds the route matching `path` under `method`, without cloning the
    /// handler.
    ///
    /// See [`Router::resolve`] for the failure modes.
    pub fn find_route(&self, path: &str, method: Method) -> Result<(&Route<H>, RouteVariables)> {
        let route = normalize_path(path);

        for candidate in self.routes_for(method) {
            if let Some(variables) = candidate.match_path(route) {
                debug!(%method, route, pattern = candidate.pattern(), "route matched");
                return Ok((candidate, variables));
            }
        }

        let allowed = self.methods_matching(route, Some(method));
        if allowed.is_empty() {
            debug!(%method, route, "no route matched");
            Err(RouterError::RouteNotFound {
                route: route.to_string(),
            })
        } else {
            debug!(%method, route, ?allowed, "route matched under other methods only");
            Err(RouterError::MethodNotAllowed {
                allowed,
                route: route.to_string(),
                method,
            })
        }
    }

    /// Methods under which some route matches `path`, sorted by name.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        self.methods_matching(normalize_path(path), None)
    }

    fn methods_matching(&self, route: &str, except: Option<Method>) -> Vec<Method> {
        let mut methods: Vec<Method> = self
            .routes
            .iter()
            .filter(|(method, _)| Some(**method) != except)
            .filter(|(_, routes)| routes.iter().any(|r| r.matches(route)))
            .map(|(method, _)| *method)
            .collect();
        methods.sort_by_key(Method::as_str);
        methods.dedup();
        methods
    }
}

impl<H: Clone> Router<H> {
    /// Resolves a path for a method given by name.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InvalidMethod`] if `method` is not a known HTTP verb
    /// - [`RouterError::MethodNotAllowed`] if the path only matches under
    ///   other methods
    /// - [`RouterError::RouteNotFound`] if nothing matches
    ///
    /// # Example
    ///
    /// ```
    /// use routemap::Router;
    ///
    /// let mut router = Router::new();
    /// router.get("articles/:article_id", "ArticleController").unwrap();
    ///
    /// let resolved = router.parse_route("/articles/4", "GET").unwrap();
    /// assert_eq!(resolved.handler, "ArticleController");
    /// assert_eq!(resolved.variables.get("article_id"), Some("4"));
    /// ```
    pub fn parse_route(&self, path: &str, method: &str) -> Result<ResolvedRoute<H>> {
        self.resolve(path, method.parse()?)
    }

    /// Resolves a path for a method.
    pub fn resolve(&self, path: &str, method: Method) -> Result<ResolvedRoute<H>> {
        let (route, variables) = self.find_route(path, method)?;
        Ok(ResolvedRoute {
            handler: route.handler().clone(),
            variables,
        })
    }
}

impl<H: Serialize> Router<H> {
    /// Serializes the whole table as a JSON list of route definitions.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<H: DeserializeOwned> Router<H> {
    /// Restores a table written by [`Router::to_json`], recompiling every
    /// pattern.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds a table from a JSON array of raw route maps.
    pub fn from_route_maps_json(json: &str) -> Result<Self> {
        let maps: Vec<RouteMap<H>> = serde_json::from_str(json)?;
        Self::with_routes(maps)
    }

    /// Reads a JSON route file; see [`Router::from_route_maps_json`].
    pub fn load_route_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading route file");
        let json = std::fs::read_to_string(path)?;
        Self::from_route_maps_json(&json)
    }
}

impl<H: Serialize> Serialize for Router<H> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.routes())
    }
}

impl<'de, H: Deserialize<'de>> Deserialize<'de> for Router<H> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let routes = Vec::<Route<H>>::deserialize(deserializer)?;
        let mut router = Self::new();
        for route in routes {
            router.add_route(route);
        }
        Ok(router)
    }
}
