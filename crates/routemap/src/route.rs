//! Route definitions.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, RouterError};
use crate::method::Method;
use crate::pattern::PathPattern;
use crate::variables::RouteVariables;

/// Per-variable rules and default values attached to a route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteOptions {
    /// Custom capture bodies keyed by variable name.
    pub rules: BTreeMap<String, String>,
    /// Fallback values keyed by variable name.
    pub defaults: BTreeMap<String, String>,
}

impl RouteOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a validation rule for a variable.
    #[must_use]
    pub fn with_rule(mut self, variable: impl Into<String>, rule: impl Into<String>) -> Self {
        self.rules.insert(variable.into(), rule.into());
        self
    }

    /// Adds a default value for a variable.
    #[must_use]
    pub fn with_default(mut self, variable: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(variable.into(), value.into());
        self
    }
}

/// A single compiled route.
///
/// The pattern is compiled when the route is built, so a `Route` value is
/// always matchable and never changes afterwards.
#[derive(Debug, Clone)]
pub struct Route<H> {
    method: Method,
    handler: H,
    rules: BTreeMap<String, String>,
    defaults: BTreeMap<String, String>,
    pattern: Arc<PathPattern>,
}

impl<H> Route<H> {
    /// Creates a route without rules or defaults.
    pub fn new(method: Method, pattern: &str, handler: H) -> Result<Self> {
        Self::with_options(method, pattern, handler, RouteOptions::default())
    }

    /// Creates a route with rules and defaults.
    pub fn with_options(
        method: Method,
        pattern: &str,
        handler: H,
        options: RouteOptions,
    ) -> Result<Self> {
        let compiled = PathPattern::compile(pattern, &options.rules)?;
        Ok(Self {
            method,
            handler,
            rules: options.rules,
            defaults: options.defaults,
            pattern: Arc::new(compiled),
        })
    }

    /// The HTTP method this route is registered under.
    pub const fn method(&self) -> Method {
        self.method
    }

    /// The original pattern string.
    pub fn pattern(&self) -> &str {
        self.pattern.pattern()
    }

    /// The handler identifier.
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// The validation rules the pattern was compiled with.
    pub const fn rules(&self) -> &BTreeMap<String, String> {
        &self.rules
    }

    /// The default variable values.
    pub const fn defaults(&self) -> &BTreeMap<String, String> {
        &self.defaults
    }

    /// The variable names captured by the pattern, in declaration order.
    pub fn variables(&self) -> &[String] {
        self.pattern.variables()
    }

    /// The compiled pattern.
    pub fn compiled(&self) -> &PathPattern {
        &self.pattern
    }

    /// Returns true if `path` (already normalized) matches this route.
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }

    /// Matches a normalized path, returning the defaults overlaid with the
    /// captured values.
    pub fn match_path(&self, path: &str) -> Option<RouteVariables> {
        self.pattern.match_with_defaults(path, &self.defaults)
    }

    /// Copies this route into another method bucket, sharing the compiled
    /// pattern.
    pub(crate) fn with_method(&self, method: Method) -> Self
    where
        H: Clone,
    {
        Self {
            method,
            handler: self.handler.clone(),
            rules: self.rules.clone(),
            defaults: self.defaults.clone(),
            pattern: Arc::clone(&self.pattern),
        }
    }

    #[cfg(test)]
    pub(crate) fn shares_pattern_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pattern, &other.pattern)
    }
}

/// A raw route definition, as found in configuration files.
///
/// `pattern` and `controller` are required when the map is turned into a
/// [`Route`]; `method` defaults to `GET`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMap<H> {
    /// The route pattern.
    pub pattern: Option<String>,
    /// The handler identifier.
    #[serde(alias = "handler")]
    pub controller: Option<H>,
    /// The HTTP method name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Custom capture bodies keyed by variable name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, String>,
    /// Fallback values keyed by variable name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defaults: BTreeMap<String, String>,
}

impl<H> RouteMap<H> {
    /// Creates a GET route map.
    pub fn new(pattern: impl Into<String>, controller: H) -> Self {
        Self {
            pattern: Some(pattern.into()),
            controller: Some(controller),
            method: None,
            rules: BTreeMap::new(),
            defaults: BTreeMap::new(),
        }
    }

    /// Sets the HTTP method name.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Adds a validation rule for a variable.
    #[must_use]
    pub fn rule(mut self, variable: impl Into<String>, rule: impl Into<String>) -> Self {
        self.rules.insert(variable.into(), rule.into());
        self
    }

    /// Adds a default value for a variable.
    #[must_use]
    pub fn default_value(mut self, variable: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(variable.into(), value.into());
        self
    }
}

impl<H> TryFrom<RouteMap<H>> for Route<H> {
    type Error = RouterError;

    fn try_from(map: RouteMap<H>) -> Result<Self> {
        let pattern = map.pattern.ok_or_else(|| {
            RouterError::MapDefinition("Route map must contain a pattern variable.".to_string())
        })?;
        let controller = map.controller.ok_or_else(|| {
            RouterError::MapDefinition("Route map must contain a controller variable.".to_string())
        })?;
        let method = match map.method.as_deref() {
            Some(name) => name.parse()?,
            None => Method::Get,
        };

        Self::with_options(
            method,
            &pattern,
            controller,
            RouteOptions {
                rules: map.rules,
                defaults: map.defaults,
            },
        )
    }
}

/// Either a compiled route or a raw map, accepted by
/// [`Router::add_routes`](crate::Router::add_routes).
#[derive(Debug, Clone)]
pub enum RouteEntry<H> {
    /// An already compiled route.
    Route(Route<H>),
    /// A raw definition still to be validated and compiled.
    Map(RouteMap<H>),
}

impl<H> RouteEntry<H> {
    /// Validates and compiles the entry.
    pub fn into_route(self) -> Result<Route<H>> {
        match self {
            Self::Route(route) => Ok(route),
            Self::Map(map) => Route::try_from(map),
        }
    }
}

impl<H> From<Route<H>> for RouteEntry<H> {
    fn from(route: Route<H>) -> Self {
        Self::Route(route)
    }
}

impl<H> From<RouteMap<H>> for RouteEntry<H> {
    fn from(map: RouteMap<H>) -> Self {
        Self::Map(map)
    }
}

/// Borrowed view used to persist a route as its definition.
#[derive(Serialize)]
struct RouteDefinition<'a, H> {
    method: Method,
    pattern: &'a str,
    controller: &'a H,
    #[serde(skip_serializing_if = "is_empty")]
    rules: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "is_empty")]
    defaults: &'a BTreeMap<String, String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_empty(map: &&BTreeMap<String, String>) -> bool {
    map.is_empty()
}

impl<H: Serialize> Serialize for Route<H> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        RouteDefinition {
            method: self.method,
            pattern: self.pattern(),
            controller: &self.handler,
            rules: &self.rules,
            defaults: &self.defaults,
        }
        .serialize(serializer)
    }
}

impl<'de, H: Deserialize<'de>> Deserialize<'de> for Route<H> {
    /// Deserializes a definition and compiles it again.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = RouteMap::<H>::deserialize(deserializer)?;
        Self::try_from(map).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_accessors() {
        let route = Route::with_options(
            Method::Get,
            "user/:name/:id",
            "UserController",
            RouteOptions::new()
                .with_rule("id", r"(\d+)")
                .with_default("tab", "profile"),
        )
        .unwrap();

        assert_eq!(route.method(), Method::Get);
        assert_eq!(route.pattern(), "user/:name/:id");
        assert_eq!(*route.handler(), "UserController");
        assert_eq!(route.variables(), ["name", "id"]);
        assert_eq!(route.rules().get("id").map(String::as_str), Some(r"(\d+)"));
        assert_eq!(route.defaults().len(), 1);
    }

    #[test]
    fn test_match_path_merges_defaults() {
        let route = Route::with_options(
            Method::Get,
            "default_option/:article_id",
            (),
            RouteOptions::new()
                .with_default("option", "content")
                .with_default("article_id", "0"),
        )
        .unwrap();

        let vars = route.match_path("default_option/4").unwrap();
        assert_eq!(vars.get("article_id"), Some("4"));
        assert_eq!(vars.get("option"), Some("content"));
        assert!(route.match_path("other/4").is_none());
    }

    #[test]
    fn test_with_method_shares_pattern() {
        let route = Route::new(Method::Get, "login", "login").unwrap();
        let copy = route.with_method(Method::Post);
        assert_eq!(copy.method(), Method::Post);
        assert!(route.shares_pattern_with(&copy));
    }

    #[test]
    fn test_map_requires_pattern() {
        let map: RouteMap<&str> = RouteMap {
            pattern: None,
            controller: Some("login"),
            method: None,
            rules: BTreeMap::new(),
            defaults: BTreeMap::new(),
        };
        let err = Route::try_from(map).unwrap_err();
        assert!(matches!(err, RouterError::MapDefinition(ref m) if m.contains("pattern")));
    }

    #[test]
    fn test_map_requires_controller() {
        let map: RouteMap<&str> = RouteMap {
            pattern: Some("login".into()),
            controller: None,
            method: None,
            rules: BTreeMap::new(),
            defaults: BTreeMap::new(),
        };
        let err = Route::try_from(map).unwrap_err();
        assert!(matches!(err, RouterError::MapDefinition(ref m) if m.contains("controller")));
    }

    #[test]
    fn test_map_method_defaults_to_get() {
        let route = Route::try_from(RouteMap::new("login", "login")).unwrap();
        assert_eq!(route.method(), Method::Get);

        let route = Route::try_from(RouteMap::new("login", "submit").method("post")).unwrap();
        assert_eq!(route.method(), Method::Post);

        let err = Route::try_from(RouteMap::new("login", "x").method("FETCH")).unwrap_err();
        assert!(matches!(err, RouterError::InvalidMethod(_)));
    }

    #[test]
    fn test_serde_round_trip_recompiles() {
        let route = Route::with_options(
            Method::Put,
            "requests/:request_id",
            "request".to_string(),
            RouteOptions::new().with_rule("request_id", r"(\d+)"),
        )
        .unwrap();

        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "method": "PUT",
                "pattern": "requests/:request_id",
                "controller": "request",
                "rules": {"request_id": "(\\d+)"}
            })
        );

        let back: Route<String> = serde_json::from_value(json).unwrap();
        assert_eq!(back.method(), Method::Put);
        assert_eq!(back.compiled().regex(), route.compiled().regex());
        assert!(back.matches("requests/12"));
        assert!(!back.matches("requests/abc"));
    }

    #[test]
    fn test_deserialize_accepts_handler_alias() {
        let route: Route<String> =
            serde_json::from_str(r#"{"pattern": "login", "handler": "LoginController"}"#).unwrap();
        assert_eq!(route.handler(), "LoginController");
        assert_eq!(route.method(), Method::Get);
    }
}
