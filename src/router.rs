use crate::config::Config;
use crate::descriptor::RouteDescriptor;
use crate::error::RouteError;
use crate::matcher::RawMatch;
use crate::params::Params;
use crate::pattern::Route;
use crate::table::{CompiledRoute, RouteTable};

use std::fmt;

/// A successful match.
#[derive(Debug)]
pub struct Match<'r, 'p, V> {
    /// The value of the matched route.
    pub value: &'r V,
    /// The parameters extracted from the path.
    pub params: Params<'r, 'p>,
    /// The sort key of the matched route.
    pub sort_key: &'r str,
    /// The pattern of the matched route, as text.
    pub template: &'r str,
    /// The matched route as it was registered.
    pub route: &'r Route<V>,
}

/// `Router` dispatches paths to values through a table of URI templates.
///
/// Templates are compiled into regular expressions and merged into a single
/// matcher. Matching a path returns the first template that matches it in
/// dispatch order, its value, and the extracted parameters.
///
/// Here is a simple example:
/// ```rust
/// use routeswitch::{Route, Router};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let router = Router::new(vec![
///     Route::new("/{foo}/{bar}/html", "looks like html"),
///     Route::new("/{foo}/baz/{+path}", "looks like some arbitrary path"),
/// ])?;
///
/// let matched = router.at("/some/thing/html").unwrap();
/// assert_eq!(*matched.value, "looks like html");
/// assert_eq!(matched.params.get("bar"), Some("thing"));
/// # Ok(())
/// # }
/// ```
///
/// The registered templates can contain three types of variables:
/// ```ignore
///  Syntax    Type
///  {name}    segment
///  {+name}   reserved expansion
///  {/name}   optional segment
/// ```
///
/// Segment variables match anything until the next '/' or the path end:
/// ```ignore
///  Template: /blog/{category}/{post}
///
///  Paths:
///   /blog/rust/request-routers            match: category="rust", post="request-routers"
///   /blog/rust/request-routers/           no match
///   /blog/rust/                           no match
///   /blog/rust/request-routers/comments   no match
/// ```
///
/// Reserved expansions match one or more characters of any kind, slashes
/// included:
/// ```ignore
///  Template: /files/{+path}
///
///  Paths:
///   /files/LICENSE                      match: path="LICENSE"
///   /files/templates/article.html       match: path="templates/article.html"
///   /files/                             no match
/// ```
///
/// Optional segments match a '/value' suffix that may be absent:
/// ```ignore
///  Template: /wiki/{title}{/revision}
///
///  Paths:
///   /wiki/Main_Page                     match: title="Main_Page"
///   /wiki/Main_Page/1234                match: title="Main_Page", revision="1234"
/// ```
///
/// A template of the form `re:/body/flags` is a raw regular expression in
/// the syntax of the [`regex`] crate. Look-around and backreferences are not
/// supported; a body using them fails to compile like any invalid regex.
///
/// Dispatch order is the lexical order of each template's sort key, where
/// every variable is collapsed to `{}`, `{+}` or `{/}`. Raw regexes sort
/// before all templates except the empty one. Two templates with the same
/// sort key cannot both be live: the one registered last wins.
pub struct Router<V> {
    table: RouteTable<V>,
}

impl<V> Router<V> {
    /// Compiles the routes with the default [`Config`].
    pub fn new<I>(routes: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = Route<V>>,
    {
        Router::with_config(routes, Config::default())
    }

    pub fn with_config<I>(routes: I, config: Config) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = Route<V>>,
    {
        Ok(Router {
            table: RouteTable::build(routes, config)?,
        })
    }

    /// Flattens the `paths` of every descriptor, in order, into one route
    /// list.
    ///
    /// ```rust
    /// use routeswitch::{RouteDescriptor, Router};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let router = Router::from_descriptors(vec![
    ///     RouteDescriptor::new().path("/v1/hello", "hello"),
    ///     RouteDescriptor::new().path("/v1/fortune", "fortune"),
    /// ])?;
    ///
    /// assert_eq!(router.at("/v1/fortune").map(|m| *m.value), Some("fortune"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_descriptors<I>(descriptors: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = RouteDescriptor<V>>,
    {
        Router::new(descriptors.into_iter().flat_map(RouteDescriptor::into_routes))
    }

    /// Tries to match a path against the live routes.
    ///
    /// Not matching is an ordinary outcome and yields `None`.
    ///
    /// ```rust
    /// use routeswitch::{Route, Router};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let router = Router::new(vec![Route::new("/home", "Welcome!")])?;
    ///
    /// let matched = router.at("/home").unwrap();
    /// assert_eq!(*matched.value, "Welcome!");
    /// assert!(matched.params.is_empty());
    ///
    /// assert!(router.at("/foobar").is_none());
    /// # Ok(())
    /// # }
    /// ```
    pub fn at<'r, 'p>(&'r self, path: &'p str) -> Option<Match<'r, 'p, V>> {
        match self.table.at(path) {
            Some((route, raw)) => {
                trace!("'{}' matched '{}'", path, route.template());
                Some(resolve(route, raw))
            }
            None => {
                trace!("'{}' matched no route", path);
                None
            }
        }
    }

    /// Registers a route.
    ///
    /// On error the router is left unchanged.
    pub fn add_route(&mut self, route: Route<V>) -> Result<(), RouteError> {
        self.table.add(route)
    }

    /// Registers every path of a descriptor with a single rebuild.
    pub fn add_descriptor(&mut self, descriptor: RouteDescriptor<V>) -> Result<(), RouteError> {
        self.table.extend(descriptor.into_routes())
    }

    /// Unregisters every route the predicate accepts and returns them.
    ///
    /// ```rust
    /// use routeswitch::{Route, Router};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut router = Router::new(vec![
    ///     Route::new("/a", 1),
    ///     Route::new("/b", 2),
    /// ])?;
    ///
    /// let removed = router.remove_route(|route| route.value == 1)?;
    /// assert_eq!(removed.len(), 1);
    /// assert!(router.at("/a").is_none());
    /// # Ok(())
    /// # }
    /// ```
    pub fn remove_route<F>(&mut self, predicate: F) -> Result<Vec<Route<V>>, RouteError>
    where
        F: FnMut(&Route<V>) -> bool,
    {
        self.table.remove(predicate)
    }

    pub fn table(&self) -> &RouteTable<V> {
        &self.table
    }

    /// Returns the number of registered routes, shadowed ones included.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<V> Default for Router<V> {
    fn default() -> Self {
        Router {
            table: RouteTable::new(Config::default()),
        }
    }
}

impl<V> fmt::Display for Router<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.table, f)
    }
}

impl<V: fmt::Debug> fmt::Debug for Router<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("table", &self.table).finish()
    }
}

// Group 0 is the whole match, so the `i`th key names group `i + 1` once folded.
fn resolve<'r, 'p, V>(compiled: &'r CompiledRoute<V>, raw: RawMatch<'p>) -> Match<'r, 'p, V> {
    Match {
        value: &compiled.route().value,
        params: Params::new(compiled.keys(), compiled.fold(raw.groups)),
        sort_key: compiled.sort_key(),
        template: compiled.template(),
        route: compiled.route(),
    }
}
