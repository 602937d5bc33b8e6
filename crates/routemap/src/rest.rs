//! Legacy REST router that derives controller names from the HTTP method.
//!
//! Routes are registered once for every method and the resolved controller
//! name gets a method-specific suffix appended, so `articles/:id` mapped to
//! `Article` resolves to `ArticleGet`, `ArticleCreate`, `ArticleUpdate`, ...
//! New code should register one handler per method on a [`Router`] instead.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::{Result, RouterError};
use crate::method::Method;
use crate::route::RouteOptions;
use crate::router::{ResolvedRoute, Router};

/// A [`Router`] wrapper that appends a method suffix to controller names.
///
/// Deprecated: kept for applications still relying on suffixed controllers.
#[derive(Debug, Clone)]
pub struct RestRouter {
    router: Router<String>,
    suffixes: HashMap<Method, String>,
    method_in_post_request: bool,
}

impl Default for RestRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl RestRouter {
    /// Creates an empty REST router with the standard suffix map.
    #[must_use]
    pub fn new() -> Self {
        let suffixes = [
            (Method::Get, "Get"),
            (Method::Post, "Create"),
            (Method::Put, "Update"),
            (Method::Patch, "Update"),
            (Method::Delete, "Delete"),
            (Method::Head, "Head"),
            (Method::Options, "Options"),
        ]
        .into_iter()
        .map(|(method, suffix)| (method, suffix.to_string()))
        .collect();

        Self {
            router: Router::new(),
            suffixes,
            method_in_post_request: false,
        }
    }

    /// Maps `pattern` to a controller base name for every method.
    pub fn add_map(
        &mut self,
        pattern: &str,
        controller: impl Into<String>,
        rules: BTreeMap<String, String>,
    ) -> Result<&mut Self> {
        self.router.all(
            pattern,
            controller.into(),
            RouteOptions {
                rules,
                defaults: BTreeMap::new(),
            },
        )?;
        Ok(self)
    }

    /// Sets the controller suffix used for a method.
    pub fn set_http_method_suffix(&mut self, method: Method, suffix: impl Into<String>) -> &mut Self {
        self.suffixes.insert(method, suffix.into());
        self
    }

    /// Whether POST requests may override their method.
    #[must_use]
    pub const fn is_method_in_post_request(&self) -> bool {
        self.method_in_post_request
    }

    /// Allows or forbids POST requests to override their method.
    pub fn set_method_in_post_request(&mut self, value: bool) {
        self.method_in_post_request = value;
    }

    /// The wrapped router.
    #[must_use]
    pub const fn router(&self) -> &Router<String> {
        &self.router
    }

    /// Resolves `path` and appends the suffix of the effective method to the
    /// controller name.
    ///
    /// `method_override` is the `_method` value sent with the request, if any;
    /// it only counts for POST requests when overriding is enabled and the
    /// override has a suffix.
    pub fn parse_route(
        &self,
        path: &str,
        method: &str,
        method_override: Option<&str>,
    ) -> Result<ResolvedRoute<String>> {
        let method: Method = method.parse()?;
        let mut resolved = self.router.resolve(path, method)?;

        let suffix = self.controller_suffix(method, method_override)?;
        resolved.handler.push_str(&suffix);
        debug!(%method, controller = %resolved.handler, "resolved REST controller");
        Ok(resolved)
    }

    fn controller_suffix(&self, method: Method, method_override: Option<&str>) -> Result<String> {
        let base = self
            .suffixes
            .get(&method)
            .ok_or(RouterError::UnsupportedMethod(method))?;

        if self.method_in_post_request && method == Method::Post {
            let overridden = method_override
                .and_then(|name| name.parse::<Method>().ok())
                .and_then(|m| self.suffixes.get(&m));
            if let Some(suffix) = overridden {
                return Ok(upper_first(suffix));
            }
        }

        Ok(upper_first(base))
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rest_router() -> RestRouter {
        let mut router = RestRouter::new();
        router
            .add_map("articles/:article_id", "Article", BTreeMap::new())
            .unwrap();
        router
    }

    #[test]
    fn test_suffix_per_method() {
        let router = rest_router();
        let cases = [
            ("GET", "ArticleGet"),
            ("POST", "ArticleCreate"),
            ("PUT", "ArticleUpdate"),
            ("PATCH", "ArticleUpdate"),
            ("DELETE", "ArticleDelete"),
            ("HEAD", "ArticleHead"),
            ("OPTIONS", "ArticleOptions"),
        ];
        for (method, expected) in cases {
            let resolved = router.parse_route("articles/4", method, None).unwrap();
            assert_eq!(resolved.handler, expected, "method {method}");
            assert_eq!(resolved.variables.get("article_id"), Some("4"));
        }
    }

    #[test]
    fn test_unsupported_method() {
        let router = rest_router();
        let err = router.parse_route("articles/4", "TRACE", None).unwrap_err();
        assert!(matches!(err, RouterError::UnsupportedMethod(Method::Trace)));
    }

    #[test]
    fn test_unknown_path_is_checked_before_suffix() {
        let router = rest_router();
        let err = router.parse_route("missing", "TRACE", None).unwrap_err();
        assert!(matches!(err, RouterError::RouteNotFound { ref route } if route == "missing"));
    }

    #[test]
    fn test_custom_suffix_is_upper_cased() {
        let mut router = rest_router();
        router.set_http_method_suffix(Method::Trace, "trace");
        let resolved = router.parse_route("articles/4", "TRACE", None).unwrap();
        assert_eq!(resolved.handler, "ArticleTrace");
    }

    #[test]
    fn test_method_override_in_post() {
        let mut router = rest_router();

        let resolved = router.parse_route("articles/4", "POST", Some("delete")).unwrap();
        assert_eq!(resolved.handler, "ArticleCreate");

        router.set_method_in_post_request(true);
        assert!(router.is_method_in_post_request());

        let resolved = router.parse_route("articles/4", "POST", Some("delete")).unwrap();
        assert_eq!(resolved.handler, "ArticleDelete");

        let resolved = router.parse_route("articles/4", "POST", Some("bogus")).unwrap();
        assert_eq!(resolved.handler, "ArticleCreate");

        let resolved = router.parse_route("articles/4", "GET", Some("delete")).unwrap();
        assert_eq!(resolved.handler, "ArticleGet");
    }

    #[test]
    fn test_unknown_path() {
        let router = rest_router();
        let err = router.parse_route("missing", "GET", None).unwrap_err();
        assert!(matches!(err, RouterError::RouteNotFound { .. }));
    }

    #[test]
    fn test_upper_first() {
        assert_eq!(upper_first("get"), "Get");
        assert_eq!(upper_first("Update"), "Update");
        assert_eq!(upper_first(""), "");
    }
}
