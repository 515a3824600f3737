use crate::config::Config;
use crate::error::RouteError;
use crate::matcher::{Matcher, RawMatch};
use crate::pattern::Route;
use crate::template;

use regex::Regex;
use std::fmt;

/// A route together with everything derived from its pattern.
#[derive(Debug)]
pub struct CompiledRoute<V> {
    route: Route<V>,
    regex: Regex,
    keys: Vec<String>,
    groups: Vec<usize>,
    sort_key: String,
    template: String,
}

impl<V> CompiledRoute<V> {
    /// `index` is the route's position in its batch, for error reporting.
    pub(crate) fn new(route: Route<V>, index: usize, config: &Config) -> Result<Self, RouteError> {
        let pattern = route
            .pattern
            .as_ref()
            .ok_or(RouteError::MissingPattern { index })?;

        let compiled = template::compile_pattern(pattern)?;
        let template = pattern.to_string();
        let regex = config
            .regex(&compiled.regex)
            .map_err(|err| RouteError::regex(&template, err))?;

        Ok(CompiledRoute {
            route,
            regex,
            keys: compiled.keys,
            groups: compiled.groups,
            sort_key: compiled.sort_key,
            template,
        })
    }

    /// The route as it was registered.
    pub fn route(&self) -> &Route<V> {
        &self.route
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Variable names, in template order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    // Folds the regex's capture groups into one group per key.
    pub(crate) fn fold<'p>(&self, groups: Vec<Option<&'p str>>) -> Vec<Option<&'p str>> {
        if self.groups.len() == self.keys.len() {
            return groups;
        }

        let mut folded = vec![None; self.keys.len() + 1];
        folded[0] = groups.first().copied().flatten();
        for (group, &key) in groups.iter().skip(1).zip(&self.groups) {
            if group.is_some() {
                folded[key + 1] = *group;
            }
        }
        folded
    }

    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    /// The pattern as text: the template string, or `/source/` for a
    /// prebuilt regex.
    pub fn template(&self) -> &str {
        &self.template
    }
}

/// The registered routes and the combined matcher derived from them.
///
/// Routes are kept in registration order. Dispatch order is derived on every
/// change: routes are stably sorted by sort key, and each run of routes that
/// share a sort key is collapsed to the one registered last. Shadowed routes
/// stay registered, so removing the live one re-exposes its predecessor.
///
/// Every mutation either fully succeeds or leaves the table untouched.
pub struct RouteTable<V> {
    config: Config,
    routes: Vec<CompiledRoute<V>>,
    // indices into `routes`, in dispatch order
    live: Vec<usize>,
    matcher: Matcher,
}

impl<V> RouteTable<V> {
    /// Creates an empty table.
    pub fn new(config: Config) -> Self {
        RouteTable {
            config,
            routes: Vec::new(),
            live: Vec::new(),
            matcher: Matcher::empty(),
        }
    }

    /// Compiles every route and builds the matcher once.
    pub fn build<I>(routes: I, config: Config) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = Route<V>>,
    {
        let routes = routes
            .into_iter()
            .enumerate()
            .map(|(i, route)| CompiledRoute::new(route, i, &config))
            .collect::<Result<Vec<_>, _>>()?;

        let (live, matcher) = plan(&routes, |_| true, &config)?;
        debug!(
            "built route table: {} routes, {} live",
            routes.len(),
            live.len()
        );

        Ok(RouteTable {
            config,
            routes,
            live,
            matcher,
        })
    }

    /// Registers a batch of routes with a single rebuild.
    pub fn extend<I>(&mut self, routes: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = Route<V>>,
    {
        let compiled = routes
            .into_iter()
            .enumerate()
            .map(|(i, route)| CompiledRoute::new(route, i, &self.config))
            .collect::<Result<Vec<_>, _>>()?;

        if compiled.is_empty() {
            return Ok(());
        }

        let before = self.routes.len();
        self.routes.extend(compiled);

        match plan(&self.routes, |_| true, &self.config) {
            Ok((live, matcher)) => {
                debug!(
                    "added {} routes: {} registered, {} live",
                    self.routes.len() - before,
                    self.routes.len(),
                    live.len()
                );
                self.live = live;
                self.matcher = matcher;
                Ok(())
            }
            Err(err) => {
                self.routes.truncate(before);
                Err(err)
            }
        }
    }

    /// Registers one route.
    pub fn add(&mut self, route: Route<V>) -> Result<(), RouteError> {
        self.extend(Some(route))
    }

    /// Unregisters every route the predicate accepts and returns them in
    /// registration order.
    pub fn remove<F>(&mut self, mut predicate: F) -> Result<Vec<Route<V>>, RouteError>
    where
        F: FnMut(&Route<V>) -> bool,
    {
        let doomed: Vec<bool> = self.routes.iter().map(|c| predicate(&c.route)).collect();
        if !doomed.contains(&true) {
            return Ok(Vec::new());
        }

        let (live, matcher) = plan(&self.routes, |i| !doomed[i], &self.config)?;

        // shift surviving indices down past the removed entries
        let mut shifted = Vec::with_capacity(doomed.len());
        let mut gone = 0;
        for &d in &doomed {
            shifted.push(gone);
            if d {
                gone += 1;
            }
        }

        let mut removed = Vec::with_capacity(gone);
        let mut kept = Vec::with_capacity(self.routes.len() - gone);
        for (compiled, doomed) in self.routes.drain(..).zip(doomed) {
            if doomed {
                removed.push(compiled.route);
            } else {
                kept.push(compiled);
            }
        }

        self.routes = kept;
        self.live = live.into_iter().map(|i| i - shifted[i]).collect();
        self.matcher = matcher;

        debug!(
            "removed {} routes: {} registered, {} live",
            removed.len(),
            self.routes.len(),
            self.live.len()
        );

        Ok(removed)
    }

    /// Finds the first live route matching the whole path.
    pub fn at<'t, 'p>(&'t self, path: &'p str) -> Option<(&'t CompiledRoute<V>, RawMatch<'p>)> {
        let raw = self.matcher.at(path)?;
        let route = &self.routes[self.live[raw.index]];
        Some((route, raw))
    }

    /// Iterates over the live routes in dispatch order.
    pub fn live(&self) -> impl ExactSizeIterator<Item = &CompiledRoute<V>> + '_ {
        self.live.iter().map(move |&i| &self.routes[i])
    }

    /// Iterates over every registered route in registration order, including
    /// shadowed ones.
    pub fn routes(&self) -> impl ExactSizeIterator<Item = &CompiledRoute<V>> + '_ {
        self.routes.iter()
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<V> fmt::Display for RouteTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for route in self.live() {
            writeln!(f, "{:?} -> {}", route.sort_key, route.template)?;
        }
        Ok(())
    }
}

impl<V: fmt::Debug> fmt::Debug for RouteTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("config", &self.config)
            .field("routes", &self.routes)
            .field("live", &self.live)
            .finish()
    }
}

// Derives the dispatch order over the routes `keep` accepts and compiles
// the matcher for it.
fn plan<V>(
    routes: &[CompiledRoute<V>],
    keep: impl Fn(usize) -> bool,
    config: &Config,
) -> Result<(Vec<usize>, Matcher), RouteError> {
    let mut order: Vec<usize> = (0..routes.len()).filter(|&i| keep(i)).collect();
    // stable, so equal keys stay in registration order
    order.sort_by(|&a, &b| routes[a].sort_key.cmp(&routes[b].sort_key));

    let mut live: Vec<usize> = Vec::with_capacity(order.len());
    for i in order {
        if let Some(last) = live.last_mut() {
            if routes[*last].sort_key == routes[i].sort_key {
                debug!(
                    "route '{}' shadows '{}'",
                    routes[i].template, routes[*last].template
                );
                *last = i;
                continue;
            }
        }
        live.push(i);
    }

    let regexes = live.iter().map(|&i| routes[i].regex.clone()).collect();
    let matcher = Matcher::new(regexes, config).map_err(|source| RouteError::Combine {
        count: live.len(),
        source,
    })?;

    Ok((live, matcher))
}
