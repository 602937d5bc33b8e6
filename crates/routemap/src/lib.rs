//! # routemap
//!
//! A path router that maps a request path and HTTP method to a handler
//! identifier plus the variables captured from the path.
//!
//! This crate provides:
//! - Route patterns with named variables, custom variable rules and wildcards
//! - Per-method route tables with first-match-wins resolution
//! - Method-not-allowed detection across method buckets
//! - Default variable values
//! - JSON route files and persisted route tables
//! - A text listing of registered routes
//!
//! The handler is an opaque type parameter: the router stores and returns it,
//! it never calls it.
//!
//! ## Quick Start
//!
//! ```
//! use routemap::{Router, RouterError};
//!
//! let mut router = Router::new();
//! router
//!     .get("articles", "ArticlesController")?
//!     .get("articles/:article_id", "ArticleController")?
//!     .post("articles", "CreateArticleController")?;
//!
//! let resolved = router.parse_route("/articles/4", "GET")?;
//! assert_eq!(resolved.handler, "ArticleController");
//! assert_eq!(resolved.variables.get("article_id"), Some("4"));
//!
//! match router.parse_route("articles", "DELETE") {
//!     Err(RouterError::MethodNotAllowed { allowed, .. }) => {
//!         assert_eq!(allowed.len(), 2);
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! # Ok::<(), RouterError>(())
//! ```
//!
//! ## Pattern Syntax
//!
//! | Segment    | Meaning                                             |
//! |------------|-----------------------------------------------------|
//! | `literal`  | matched exactly                                     |
//! | `:name`    | one path segment captured as `name`                 |
//! | `:`        | one path segment, not captured                      |
//! | `*name`    | the rest of the path, `/` included, as `name`       |
//! | `*`        | the rest of the path, not captured                  |
//! | `\:text`   | literal segment starting with `:`                   |
//! | `\*text`   | literal segment starting with `*`                   |
//!
//! ## Rules and Defaults
//!
//! ```
//! use routemap::{Method, RouteOptions, Router};
//!
//! let mut router = Router::new();
//! router.route(
//!     Method::Get,
//!     "user/:name/:id",
//!     "UserController",
//!     RouteOptions::new()
//!         .with_rule("id", r"\d+")
//!         .with_default("tab", "profile"),
//! )?;
//!
//! let resolved = router.parse_route("user/ada/42", "GET")?;
//! assert_eq!(resolved.variables.get("id"), Some("42"));
//! assert_eq!(resolved.variables.get("tab"), Some("profile"));
//! assert!(router.parse_route("user/ada/abc", "GET").is_err());
//! # Ok::<(), routemap::RouterError>(())
//! ```

mod error;
mod listing;
mod method;
mod pattern;
mod rest;
mod route;
mod router;
mod variables;

pub use error::{Result, RouterError};
pub use listing::{RouteListing, NO_ROUTES};
pub use method::Method;
pub use pattern::{normalize_path, PathPattern, PathSegment};
pub use rest::RestRouter;
pub use route::{Route, RouteEntry, RouteMap, RouteOptions};
pub use router::{ResolvedRoute, Router};
pub use variables::RouteVariables;
