use std::collections::HashMap;
use std::{fmt, iter, slice};

/// The parameters extracted by a route match.
///
/// Parameters are available both by variable name and by capture group
/// index, where group `0` is the entire matched path and group `i + 1`
/// belongs to the `i`th variable of the template.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let router = routeswitch::Router::new(vec![
///     routeswitch::Route::new("/users/{id}/{+rest}", true),
/// ])?;
/// let matched = router.at("/users/1/posts/2").unwrap();
///
/// // Iterate through the named variables.
/// for (key, value) in matched.params.iter() {
///     println!("key: {}, value: {}", key, value);
/// }
///
/// // Get a specific value by name or by group index.
/// assert_eq!(matched.params.get("id"), Some("1"));
/// assert_eq!(matched.params.get("2"), Some("posts/2"));
/// assert_eq!(matched.params.group(0), Some("/users/1/posts/2"));
/// # Ok(())
/// # }
/// ```
#[derive(PartialEq, Eq, Clone)]
pub struct Params<'k, 'v> {
    keys: &'k [String],
    groups: Vec<Option<&'v str>>,
}

impl<'k, 'v> Params<'k, 'v> {
    // `groups[0]` is the whole match, `groups[i + 1]` belongs to `keys[i]`.
    pub(crate) fn new(keys: &'k [String], groups: Vec<Option<&'v str>>) -> Self {
        Params { keys, groups }
    }

    /// Returns the number of named variables in the matched template.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the matched template has no named variables.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the value captured for a variable name, or, if no variable has
    /// that name, for a decimal group index written without sign or leading
    /// zeros.
    ///
    /// When a template repeats a variable name, the last occurrence wins.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&'v str> {
        let key = key.as_ref();

        match self.keys.iter().rposition(|k| k == key) {
            Some(i) => self.group(i + 1),
            None => key
                .parse::<usize>()
                .ok()
                .filter(|i| i.to_string() == key)
                .and_then(|i| self.group(i)),
        }
    }

    /// Returns the text of a capture group. Optional segments that were
    /// absent from the path yield `None`.
    pub fn group(&self, index: usize) -> Option<&'v str> {
        self.groups.get(index).copied().flatten()
    }

    /// Returns an iterator over the named variables that captured a value.
    pub fn iter(&self) -> ParamsIter<'_, 'k, 'v> {
        ParamsIter {
            inner: self.keys.iter().zip(self.groups.iter().skip(1)),
        }
    }

    /// Returns an iterator over every capture group, including group `0`.
    pub fn groups(&self) -> Groups<'_, 'v> {
        Groups {
            inner: self.groups.iter().enumerate(),
        }
    }

    /// Flattens the parameters into a single map keyed by group index
    /// (`"0"`, `"1"`, ...) and by variable name. Names take precedence over
    /// indices that spell the same string.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map: HashMap<String, String> = self
            .groups()
            .filter_map(|(i, value)| Some((i.to_string(), value?.to_owned())))
            .collect();

        for (key, value) in self.keys.iter().zip(self.groups.iter().skip(1)) {
            match value {
                Some(value) => map.insert(key.clone(), (*value).to_owned()),
                None => map.remove(key),
            };
        }

        map
    }
}

impl fmt::Debug for Params<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// An iterator over the named [parameters](crate::Params) of a match.
pub struct ParamsIter<'ps, 'k, 'v> {
    inner: iter::Zip<slice::Iter<'k, String>, iter::Skip<slice::Iter<'ps, Option<&'v str>>>>,
}

impl<'ps, 'k, 'v> Iterator for ParamsIter<'ps, 'k, 'v> {
    type Item = (&'k str, &'v str);

    fn next(&mut self) -> Option<Self::Item> {
        for (key, value) in self.inner.by_ref() {
            if let Some(value) = value {
                return Some((key.as_str(), *value));
            }
        }

        None
    }
}

/// An iterator over the capture groups of a match.
pub struct Groups<'ps, 'v> {
    inner: iter::Enumerate<slice::Iter<'ps, Option<&'v str>>>,
}

impl<'ps, 'v> Iterator for Groups<'ps, 'v> {
    type Item = (usize, Option<&'v str>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(i, value)| (i, *value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Groups<'_, '_> {}
