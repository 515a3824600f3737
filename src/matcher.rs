use crate::config::Config;

use regex::{Regex, RegexSet};

/// The winning pattern and its capture groups, before any keys are applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawMatch<'p> {
    /// Position of the winning pattern in dispatch order.
    pub index: usize,
    /// Group 0 is the whole match; groups that did not participate are `None`.
    pub groups: Vec<Option<&'p str>>,
}

/// All live patterns merged into one dispatch step.
///
/// A single [`RegexSet`] pass finds every pattern that matches; the first one
/// in dispatch order wins and is re-run on its own to extract captures.
#[derive(Clone, Debug)]
pub(crate) struct Matcher {
    set: RegexSet,
    regexes: Vec<Regex>,
}

impl Matcher {
    pub(crate) fn new(regexes: Vec<Regex>, config: &Config) -> Result<Self, regex::Error> {
        let set = if regexes.is_empty() {
            RegexSet::empty()
        } else {
            config.regex_set(regexes.iter().map(Regex::as_str))?
        };

        Ok(Matcher { set, regexes })
    }

    pub(crate) fn empty() -> Self {
        Matcher {
            set: RegexSet::empty(),
            regexes: Vec::new(),
        }
    }

    pub(crate) fn at<'p>(&self, path: &'p str) -> Option<RawMatch<'p>> {
        // `SetMatches` iterates in ascending index order
        for index in self.set.matches(path).iter() {
            if let Some(captures) = self.regexes[index].captures(path) {
                let groups = captures.iter().map(|m| m.map(|m| m.as_str())).collect();
                return Some(RawMatch { index, groups });
            }
        }

        None
    }
}
