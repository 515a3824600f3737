use regex::Regex;
use serde::Deserialize;
use std::fmt;

/// The pattern half of a [`Route`].
///
/// Strings are URI templates (`/{title}/{part}`) or raw regex literals
/// (`re:/^\/api\/(.*)$/i`); both are interpreted when the route is compiled.
/// A prebuilt [`Regex`] is used as-is.
///
/// The combined matcher is assembled from each regex's source text, so any
/// flags of a prebuilt `Regex` must be written inline (`(?i)...`) rather
/// than set through `RegexBuilder`.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "String")]
pub enum Pattern {
    Template(String),
    Regex(Regex),
}

impl Pattern {
    /// The text the pattern was created from.
    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Template(template) => template,
            Pattern::Regex(regex) => regex.as_str(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Template(template) => f.write_str(template),
            Pattern::Regex(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

impl From<&str> for Pattern {
    fn from(template: &str) -> Self {
        Pattern::Template(template.to_owned())
    }
}

impl From<String> for Pattern {
    fn from(template: String) -> Self {
        Pattern::Template(template)
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Pattern::Regex(regex)
    }
}

/// A route: a pattern plus the value returned when it matches.
///
/// Routes can be read from JSON:
///
/// ```rust
/// use routeswitch::Route;
///
/// let routes: Vec<Route<String>> = serde_json::from_str(r#"[
///     { "pattern": "/{title}", "value": "page" },
///     { "pattern": "re:/^\\/static\\/(.+)$/", "value": "asset" }
/// ]"#).unwrap();
/// assert_eq!(routes[0].pattern.as_ref().map(|p| p.as_str()), Some("/{title}"));
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct Route<V> {
    /// `None` is rejected when the route is compiled.
    #[serde(default)]
    pub pattern: Option<Pattern>,
    pub value: V,
}

impl<V> Route<V> {
    pub fn new(pattern: impl Into<Pattern>, value: V) -> Self {
        Route {
            pattern: Some(pattern.into()),
            value,
        }
    }
}
