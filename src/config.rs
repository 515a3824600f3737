use serde::Deserialize;

/// Limits applied to every regex the router compiles.
///
/// ```rust
/// use routeswitch::{Config, Router};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default().size_limit(1 << 20);
/// let router: Router<&str> = Router::with_config(Vec::new(), config)?;
/// assert!(router.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Approximate upper bound, in bytes, on the size of one compiled regex
    /// and of the combined set.
    pub size_limit: usize,
    /// Upper bound, in bytes, on the lazy DFA cache of each regex.
    pub dfa_size_limit: usize,
}

impl Config {
    pub fn size_limit(mut self, bytes: usize) -> Self {
        self.size_limit = bytes;
        self
    }

    pub fn dfa_size_limit(mut self, bytes: usize) -> Self {
        self.dfa_size_limit = bytes;
        self
    }

    pub(crate) fn regex(&self, pattern: &str) -> Result<regex::Regex, regex::Error> {
        regex::RegexBuilder::new(pattern)
            .size_limit(self.size_limit)
            .dfa_size_limit(self.dfa_size_limit)
            .build()
    }

    pub(crate) fn regex_set<I, S>(&self, patterns: I) -> Result<regex::RegexSet, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        regex::RegexSetBuilder::new(patterns)
            .size_limit(self.size_limit)
            .dfa_size_limit(self.dfa_size_limit)
            .build()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            size_limit: 10 * (1 << 20),
            dfa_size_limit: 2 * (1 << 20),
        }
    }
}
