//! Explicit registry of the path+method pairs an API exposes.
//!
//! A client with a registry attached refuses calls to undeclared routes
//! before anything is sent. Without one, any path is accepted.

use indexmap::IndexSet;

use crate::http::HttpMethod;
use crate::path::path_tokens;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    pub method: HttpMethod,
    pub path: String,
}

/// A `:name` token declared by a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParam {
    pub name: String,
    pub optional: bool,
}

impl Route {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn params(&self) -> Vec<RouteParam> {
        path_tokens(&self.path)
            .into_iter()
            .map(|token| RouteParam {
                name: token.name.to_string(),
                optional: token.optional,
            })
            .collect()
    }
}

/// Routes in registration order.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: IndexSet<Route>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, method: HttpMethod, path: impl Into<String>) -> &mut Self {
        self.routes.insert(Route::new(method, path));
        self
    }

    pub fn route(mut self, method: HttpMethod, path: impl Into<String>) -> Self {
        self.register(method, path);
        self
    }

    pub fn contains(&self, method: HttpMethod, path: &str) -> bool {
        self.routes.contains(&Route::new(method, path))
    }

    pub fn methods_for(&self, path: &str) -> Vec<HttpMethod> {
        self.routes
            .iter()
            .filter(|r| r.path == path)
            .map(|r| r.method)
            .collect()
    }

    pub fn paths_for(&self, method: HttpMethod) -> Vec<&str> {
        self.routes
            .iter()
            .filter(|r| r.method == method)
            .map(|r| r.path.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl FromIterator<Route> for RouteRegistry {
    fn from_iter<I: IntoIterator<Item = Route>>(iter: I) -> Self {
        Self {
            routes: iter.into_iter().collect(),
        }
    }
}
