#![allow(dead_code)]

use routemap::{ResolvedRoute, RouteMap, Router, RouterError};

/// The route set used by most resolution tests.
pub fn content_router() -> Router<&'static str> {
    Router::with_routes(vec![
        RouteMap::new("login", "LoginController"),
        RouteMap::new("logout", "LogoutController"),
        RouteMap::new("articles", "ArticlesController"),
        RouteMap::new("articles/:article_id", "ArticleController"),
        RouteMap::new("test/:seg1/path/:seg2", "TestController"),
        RouteMap::new("content/:/\\*", "ContentController"),
        RouteMap::new("content/*category/:article", "ArticleController"),
    ])
    .unwrap_or_else(|e| panic!("Failed to build content router: {e}"))
}

pub fn resolve<H: Clone>(router: &Router<H>, path: &str, method: &str) -> ResolvedRoute<H> {
    router
        .parse_route(path, method)
        .unwrap_or_else(|e| panic!("Failed to resolve {method} {path}: {e}"))
}

pub fn resolve_err<H: Clone + std::fmt::Debug>(
    router: &Router<H>,
    path: &str,
    method: &str,
) -> RouterError {
    router
        .parse_route(path, method)
        .expect_err(&format!("Expected resolution error for {method} {path}"))
}

/// Collects resolved variables as sorted `(name, value)` pairs.
pub fn vars<H>(resolved: &ResolvedRoute<H>) -> Vec<(&str, &str)> {
    resolved.variables.iter().collect()
}
