use std::io;
use std::path::PathBuf;

/// Represents errors that can occur when compiling or inserting a route.
///
/// Every variant leaves the router it was raised from untouched.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// A route was submitted without a pattern.
    #[error("route #{index} has no pattern")]
    MissingPattern {
        /// Position of the offending route in the submitted batch.
        index: usize,
    },
    /// A `re:/.../flags` literal used a flag that has no equivalent.
    #[error("unsupported regex flag '{flag}' in pattern: {pattern}")]
    InvalidFlag {
        /// The template as submitted.
        pattern: String,
        /// The rejected flag character.
        flag: char,
    },
    /// The regex engine rejected a raw or generated pattern.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidRegex {
        /// The template as submitted.
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// The live routes could not be combined into a single matcher,
    /// usually because the combined size limit was exceeded.
    #[error("failed to combine {count} routes into one matcher: {source}")]
    Combine {
        count: usize,
        #[source]
        source: regex::Error,
    },
}

impl RouteError {
    /// Returns `true` if a single route's pattern was at fault.
    pub fn is_invalid_pattern(&self) -> bool {
        matches!(
            self,
            Self::MissingPattern { .. } | Self::InvalidFlag { .. } | Self::InvalidRegex { .. }
        )
    }

    pub(crate) fn regex(pattern: &str, source: regex::Error) -> Self {
        RouteError::InvalidRegex {
            pattern: pattern.to_owned(),
            source,
        }
    }
}

/// Errors raised while discovering route descriptors on disk.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The loader does not handle this kind of entry.
    #[error("not a route descriptor: {}", path.display())]
    Unsupported { path: PathBuf },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Any failure while building a router from directories.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Load(#[from] LoadError),
}
