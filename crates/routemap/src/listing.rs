//! Text listing of a router's routes.

use std::fmt;

use crate::router::Router;

/// Message printed instead of a table when no route is registered.
pub const NO_ROUTES: &str = "The router has no routes.";

type Describe<'a, H> = Box<dyn Fn(&H) -> String + 'a>;

/// Renders the routes of a [`Router`] as an aligned table.
///
/// Handlers are opaque to the router, so the controller column only appears
/// when a description function is supplied through
/// [`RouteListing::show_handlers`].
///
/// # Example
///
/// ```
/// use routemap::{RouteListing, Router};
///
/// let mut router = Router::new();
/// router.get("login", "LoginController").unwrap();
///
/// let table = RouteListing::new(&router).to_string();
/// assert!(table.contains("login"));
/// assert!(!table.contains("LoginController"));
///
/// let table = RouteListing::new(&router)
///     .show_handlers(|h| (*h).to_string())
///     .to_string();
/// assert!(table.contains("LoginController"));
/// ```
pub struct RouteListing<'a, H> {
    router: &'a Router<H>,
    describe: Option<Describe<'a, H>>,
}

impl<'a, H> RouteListing<'a, H> {
    /// Creates a listing that shows methods and paths only.
    pub const fn new(router: &'a Router<H>) -> Self {
        Self {
            router,
            describe: None,
        }
    }

    /// Adds a controller column rendered through `describe`.
    #[must_use]
    pub fn show_handlers(mut self, describe: impl Fn(&H) -> String + 'a) -> Self {
        self.describe = Some(Box::new(describe));
        self
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.router
            .routes()
            .map(|route| {
                let mut row = vec![route.method().to_string(), route.pattern().to_string()];
                if let Some(describe) = &self.describe {
                    row.push(describe(route.handler()));
                }
                row
            })
            .collect()
    }

    fn headers(&self) -> Vec<&'static str> {
        if self.describe.is_some() {
            vec!["Method", "Path", "Controller"]
        } else {
            vec!["Method", "Path"]
        }
    }
}

impl<H> fmt::Display for RouteListing<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.router.is_empty() {
            return writeln!(f, "{NO_ROUTES}");
        }

        let headers = self.headers();
        let rows = self.rows();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let separator = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ");

        write_row(f, headers.iter().copied(), &widths)?;
        writeln!(f, "{separator}")?;
        for row in &rows {
            write_row(f, row.iter().map(String::as_str), &widths)?;
        }
        Ok(())
    }
}

fn write_row<'c>(
    f: &mut fmt::Formatter<'_>,
    cells: impl Iterator<Item = &'c str>,
    widths: &[usize],
) -> fmt::Result {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(f, "{}", line.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::route::{Route, RouteOptions};

    fn configured_router() -> Router<&'static str> {
        let mut router = Router::new();
        router
            .add_route(Route::new(Method::Get, "login", "login").unwrap())
            .add_route(Route::new(Method::Post, "login", "submitLogin").unwrap())
            .add_route(
                Route::with_options(
                    Method::Get,
                    "user/:name/:id",
                    "UserController",
                    RouteOptions::new()
                        .with_rule("name", r"(\s+)")
                        .with_rule("id", r"(\d+)"),
                )
                .unwrap(),
            );
        router
    }

    #[test]
    fn test_empty_router() {
        let router: Router<&str> = Router::new();
        assert_eq!(RouteListing::new(&router).to_string(), format!("{NO_ROUTES}\n"));
    }

    #[test]
    fn test_handlers_hidden_by_default() {
        let router = configured_router();
        let output = RouteListing::new(&router).to_string();
        assert!(output.contains("user/:name/:id"));
        assert!(!output.contains("UserController"));
        assert!(!output.contains("Controller"));
    }

    #[test]
    fn test_handlers_shown_on_request() {
        let router = configured_router();
        let output = RouteListing::new(&router)
            .show_handlers(|h| (*h).to_string())
            .to_string();
        assert!(output.contains("user/:name/:id"));
        assert!(output.contains("UserController"));
        assert!(output.contains("submitLogin"));
    }

    #[test]
    fn test_table_layout() {
        let router = configured_router();
        let output = RouteListing::new(&router).to_string();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Method  Path",
                "------  --------------",
                "GET     login",
                "GET     user/:name/:id",
                "POST    login",
            ]
        );
    }
}
