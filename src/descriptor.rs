use crate::pattern::Route;

use indexmap::IndexMap;
use serde::Deserialize;

/// A Swagger 2.0 shaped document exposing handlers under `paths`.
///
/// Each key of `paths` is a URI template and each value is the payload
/// returned when that template matches, typically a map of HTTP methods to
/// handlers. Fields other than `paths` are ignored.
///
/// ```rust
/// use routeswitch::RouteDescriptor;
///
/// let document: RouteDescriptor<serde_json::Value> = serde_json::from_str(r#"{
///     "swagger": "2.0",
///     "paths": {
///         "/v1/hello": { "get": { "operationId": "hello" } }
///     }
/// }"#).unwrap();
/// assert_eq!(document.paths.len(), 1);
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct RouteDescriptor<V> {
    #[serde(default)]
    pub paths: IndexMap<String, V>,
}

impl<V> RouteDescriptor<V> {
    pub fn new() -> Self {
        RouteDescriptor {
            paths: IndexMap::new(),
        }
    }

    /// Adds a path, replacing any previous payload for the same template.
    pub fn path(mut self, template: impl Into<String>, value: V) -> Self {
        self.paths.insert(template.into(), value);
        self
    }

    /// Flattens the document into routes, in document order.
    pub fn into_routes(self) -> impl Iterator<Item = Route<V>> {
        self.paths
            .into_iter()
            .map(|(template, value)| Route::new(template, value))
    }
}

impl<V> Default for RouteDescriptor<V> {
    fn default() -> Self {
        RouteDescriptor::new()
    }
}
