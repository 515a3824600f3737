//! Compiles URI templates into regex source.
//!
//! Supported syntax:
//!
//! ```text
//!  Syntax           Captures
//!  {name}           one path segment, up to the next '/' or the end
//!  {+name}          one or more characters of any kind, including '/'
//!  {/name}          an optional '/segment'
//!  re:/body/flags   a raw regex, used verbatim
//! ```
//!
//! Everything else is matched literally. Templates are always anchored at
//! both ends, raw regexes are not.
//!
//! A segment capture must end at a segment boundary, so `/{file}.json` can
//! never match anything: the capture would have to stop before the `.`.
//!
//! Raw regexes use the syntax of the [`regex`] crate, which has no
//! look-around and no backreferences. Bodies that rely on either are
//! rejected with [`RouteError::InvalidRegex`].
use crate::error::RouteError;
use crate::pattern::Pattern;

use regex::Regex;
use std::sync::LazyLock;

static RAW_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^re:/(.*)/([a-zA-Z]*)$").unwrap());

static VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([+/])?([a-zA-Z0-9_]+)\}").unwrap());

static SORT_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([+/]?)[^}]+\}").unwrap());

// `\b` and `\B` can never both hold at one position.
const UNMATCHABLE: &str = r"\b\B";

const SEGMENT: &str = "([^/]+)";
const OPTIONAL: &str = "(?:/([^/]+))?";
const DEAD_OPTIONAL: &str = r"(?:/([^/]+)\b\B)?";
const RESERVED: &str = "(.+)";
const RESERVED_AFTER_SEGMENT: &str = "(/.*)";
// closes the alternation opened in front of a run of optional segments
const RESERVED_AFTER_OPTIONAL: &str = "(/.*)|(.+))";

/// The result of compiling one pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledTemplate {
    /// Regex source for the pattern.
    pub regex: String,
    /// Variable names in left-to-right order.
    pub keys: Vec<String>,
    /// Position in `keys` of the variable each capture group after group 0
    /// fills. A variable can own more than one group, of which at most one
    /// participates in a match. Empty for raw regexes, whose groups are
    /// positional.
    pub groups: Vec<usize>,
    /// Ordering and de-duplication key.
    pub sort_key: String,
}

/// Compiles a template string.
///
/// ```rust
/// let compiled = routeswitch::compile("/{foo}/baz/{+path}").unwrap();
/// assert_eq!(compiled.keys, ["foo", "path"]);
/// assert_eq!(compiled.sort_key, "/{}/baz/{+}");
/// ```
pub fn compile(template: &str) -> Result<CompiledTemplate, RouteError> {
    if let Some(raw) = RAW_REGEX.captures(template) {
        let regex = raw_regex(template, &raw[1], &raw[2])?;
        return Ok(CompiledTemplate {
            regex,
            keys: Vec::new(),
            groups: Vec::new(),
            // leading space sorts raw regexes before every template
            sort_key: format!(" {}", template),
        });
    }

    let pieces = tokenize(template);
    let keys = pieces
        .iter()
        .filter_map(Piece::name)
        .map(str::to_owned)
        .collect();

    let (regex, groups) = generate(&pieces);

    Ok(CompiledTemplate {
        regex,
        keys,
        groups,
        sort_key: sort_key(template),
    })
}

/// Compiles any [`Pattern`].
pub fn compile_pattern(pattern: &Pattern) -> Result<CompiledTemplate, RouteError> {
    match pattern {
        Pattern::Template(template) => compile(template),
        Pattern::Regex(regex) => Ok(CompiledTemplate {
            regex: regex.as_str().to_owned(),
            keys: Vec::new(),
            groups: Vec::new(),
            sort_key: format!(" {}", pattern),
        }),
    }
}

/// Collapses every `{name}`, `{+name}` and `{/name}` in a template to `{}`,
/// `{+}` and `{/}`.
///
/// ```rust
/// assert_eq!(routeswitch::sort_key("/{foo}/{bar}/html"), "/{}/{}/html");
/// assert_eq!(routeswitch::sort_key("/{a}/{b}/html"), "/{}/{}/html");
/// ```
pub fn sort_key(template: &str) -> String {
    SORT_TOKEN.replace_all(template, "{${1}}").into_owned()
}

fn raw_regex(template: &str, body: &str, flags: &str) -> Result<String, RouteError> {
    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' => {
                if !inline.contains(flag) {
                    inline.push(flag);
                }
            }
            // global and unicode have no bearing on a single match
            'g' | 'u' => {}
            _ => {
                return Err(RouteError::InvalidFlag {
                    pattern: template.to_owned(),
                    flag,
                })
            }
        }
    }

    if inline.is_empty() {
        Ok(body.to_owned())
    } else {
        Ok(format!("(?{}){}", inline, body))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Piece<'t> {
    Literal(&'t str),
    Segment(&'t str),
    Reserved(&'t str),
    Optional(&'t str),
}

impl<'t> Piece<'t> {
    fn name(&self) -> Option<&'t str> {
        match *self {
            Piece::Literal(_) => None,
            Piece::Segment(name) | Piece::Reserved(name) | Piece::Optional(name) => Some(name),
        }
    }
}

fn tokenize(template: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut last = 0;

    for variable in VARIABLE.captures_iter(template) {
        let (Some(whole), Some(name)) = (variable.get(0), variable.get(2)) else {
            continue;
        };

        if whole.start() > last {
            pieces.push(Piece::Literal(&template[last..whole.start()]));
        }

        let name = name.as_str();
        pieces.push(match variable.get(1).map(|m| m.as_str()) {
            Some("+") => Piece::Reserved(name),
            Some("/") => Piece::Optional(name),
            _ => Piece::Segment(name),
        });

        last = whole.end();
    }

    if last < template.len() {
        pieces.push(Piece::Literal(&template[last..]));
    }

    pieces
}

// Segment captures must be followed by '/' or the end of input. Without
// lookahead, that constraint is pushed onto whatever piece comes next.
fn generate(pieces: &[Piece<'_>]) -> (String, Vec<usize>) {
    let mut fragments: Vec<String> = Vec::with_capacity(pieces.len());
    let mut groups: Vec<usize> = Vec::with_capacity(pieces.len());
    let mut key = 0;
    // a `{name}` capture ends right here
    let mut boundary = false;
    // `{/name}` fragments that end right here if present
    let mut pending: Vec<usize> = Vec::new();
    let mut matchable = true;

    for piece in pieces {
        match *piece {
            Piece::Literal(text) if text.starts_with('/') => {
                boundary = false;
                pending.clear();
                fragments.push(regex::escape(text));
            }
            Piece::Literal(text) => {
                matchable &= !boundary;
                boundary = false;
                kill(&mut fragments, &mut pending);
                fragments.push(regex::escape(text));
            }
            Piece::Segment(_) => {
                matchable &= !boundary;
                kill(&mut fragments, &mut pending);
                fragments.push(SEGMENT.to_owned());
                groups.push(key);
                key += 1;
                boundary = true;
            }
            Piece::Reserved(_) => {
                match pending.first() {
                    // a present optional ends at a '/', an absent one
                    // constrains nothing
                    Some(&first) if !boundary => {
                        fragments[first].insert_str(0, "(?:");
                        fragments.push(RESERVED_AFTER_OPTIONAL.to_owned());
                        groups.extend([key, key]);
                    }
                    _ => {
                        let fragment = if boundary {
                            RESERVED_AFTER_SEGMENT
                        } else {
                            RESERVED
                        };
                        fragments.push(fragment.to_owned());
                        groups.push(key);
                    }
                }
                key += 1;
                boundary = false;
                pending.clear();
            }
            Piece::Optional(_) => {
                pending.push(fragments.len());
                fragments.push(OPTIONAL.to_owned());
                groups.push(key);
                key += 1;
            }
        }
    }

    let mut regex = String::from("^");
    if !matchable {
        regex.push_str(UNMATCHABLE);
    }
    for fragment in &fragments {
        regex.push_str(fragment);
    }
    regex.push('$');
    (regex, groups)
}

// The next piece cannot start with '/', so these optional segments can
// only ever be absent.
fn kill(fragments: &mut [String], pending: &mut Vec<usize>) {
    for i in pending.drain(..) {
        fragments[i] = DEAD_OPTIONAL.to_owned();
    }
}
