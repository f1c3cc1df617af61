//! # Regex Wrapper
//! This modules provides mechanisms to mix `regex` and `fancy_regex` types.

/// Error wrapper for regex patterns.
#[non_exhaustive]
#[derive(Debug)]
pub enum ErrorWrapper {
    /// Error from `regex`.
    Basic(regex::Error),

    /// Error from `fancy_regex`.
    Fancy(fancy_regex::Error),
}

impl From<regex::Error> for ErrorWrapper {
    fn from(err: regex::Error) -> Self {
        Self::Basic(err)
    }
}

impl From<fancy_regex::Error> for ErrorWrapper {
    fn from(err: fancy_regex::Error) -> Self {
        Self::Fancy(err)
    }
}

impl core::fmt::Display for ErrorWrapper {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        match self {
            Self::Basic(err) => core::fmt::Display::fmt(err, f),
            Self::Fancy(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl core::error::Error for ErrorWrapper {}

/// Label for regex patterns.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum RegexWrapperPattern {
    /// This is a pattern for the `regex` crate.
    Basic(String),

    /// This is a pattern for the `fancy_regex` crate.
    Fancy(String),

    /// This pattern will try the `regex` crate first,
    /// and fallback to `fancy_regex` if it fails.
    Adaptive(String),
}

impl<S: AsRef<str>> From<S> for RegexWrapperPattern {
    fn from(pattern: S) -> Self {
        Self::Adaptive(pattern.as_ref().to_string())
    }
}

/// Backtrack budget for `fancy_regex` patterns.
///
/// The crate default (1M) is exceeded by whitespace runs of about that length.
pub const FANCY_BACKTRACK_LIMIT: usize = 100_000_000;

fn build_fancy(pattern: &str) -> Result<fancy_regex::Regex, fancy_regex::Error> {
    fancy_regex::RegexBuilder::new(pattern)
        .backtrack_limit(FANCY_BACKTRACK_LIMIT)
        .build()
}

impl RegexWrapperPattern {
    /// Get the underlying regex pattern.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(pattern) => pattern,
            Self::Fancy(pattern) => pattern,
            Self::Adaptive(pattern) => pattern,
        }
    }

    /// Compile the regex pattern into a `RegexWrapper`.
    ///
    /// Fancy patterns are built with [`FANCY_BACKTRACK_LIMIT`].
    ///
    /// ## Returns
    /// A `Result` containing the compiled `RegexWrapper` or an `ErrorWrapper`.
    pub fn compile(&self) -> Result<RegexWrapper, ErrorWrapper> {
        match self {
            Self::Basic(pattern) => regex::Regex::new(pattern)
                .map(RegexWrapper::from)
                .map_err(ErrorWrapper::from),
            Self::Fancy(pattern) => build_fancy(pattern)
                .map(RegexWrapper::from)
                .map_err(ErrorWrapper::from),
            Self::Adaptive(pattern) => regex::Regex::new(pattern)
                .map(RegexWrapper::from)
                .or_else(|_| {
                    build_fancy(pattern)
                        .map(RegexWrapper::from)
                        .map_err(ErrorWrapper::from)
                }),
        }
    }
}

/// Wrapper for compiled regex patterns.
#[derive(Debug, Clone)]
pub enum RegexWrapper {
    /// Wrapper for `regex::Regex`.
    Basic(regex::Regex),

    /// Wrapper for `fancy_regex::Regex`.
    Fancy(fancy_regex::Regex),
}

impl From<regex::Regex> for RegexWrapper {
    fn from(regex: regex::Regex) -> Self {
        Self::Basic(regex)
    }
}

impl From<fancy_regex::Regex> for RegexWrapper {
    fn from(regex: fancy_regex::Regex) -> Self {
        Self::Fancy(regex)
    }
}

impl RegexWrapper {
    /// Is this `Basic`?
    pub fn is_basic(&self) -> bool {
        matches!(self, Self::Basic(_))
    }

    /// Is this `Fancy`?
    pub fn is_fancy(&self) -> bool {
        matches!(self, Self::Fancy(_))
    }

    /// Get the underlying regex pattern.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(regex) => regex.as_str(),
            Self::Fancy(regex) => regex.as_str(),
        }
    }

    /// Wrapper for `find_iter`.
    ///
    /// If a `fancy_regex` search aborts (backtrack limit), the unmatched
    /// remainder of `haystack` is yielded as one final piece.
    ///
    /// ## Arguments
    /// * `haystack` - The string to search in.
    ///
    /// ## Returns
    /// A `MatchesWrapper` iterator over the matched substrings.
    pub fn find_iter<'r, 'h>(
        &'r self,
        haystack: &'h str,
    ) -> MatchesWrapper<'r, 'h> {
        let inner = match self {
            Self::Basic(regex) => MatchesInner::Regex(regex.find_iter(haystack)),
            Self::Fancy(regex) => MatchesInner::FancyRegex(regex.find_iter(haystack)),
        };
        MatchesWrapper {
            haystack,
            last_end: 0,
            inner: Some(inner),
        }
    }
}

enum MatchesInner<'r, 'h> {
    Regex(regex::Matches<'r, 'h>),
    FancyRegex(fancy_regex::Matches<'r, 'h>),
}

/// Wrapper for regex matches; yields the matched substrings.
pub struct MatchesWrapper<'r, 'h> {
    haystack: &'h str,
    last_end: usize,

    /// `None` once exhausted or aborted.
    inner: Option<MatchesInner<'r, 'h>>,
}

impl<'r, 'h> Iterator for MatchesWrapper<'r, 'h> {
    type Item = &'h str;

    fn next(&mut self) -> Option<Self::Item> {
        let step = match self.inner.as_mut()? {
            MatchesInner::Regex(matches) => matches.next().map(|m| Ok(m.range())),
            MatchesInner::FancyRegex(matches) => matches.next().map(|r| r.map(|m| m.range())),
        };

        match step {
            Some(Ok(range)) => {
                self.last_end = range.end;
                Some(&self.haystack[range])
            }
            Some(Err(err)) => {
                self.inner = None;
                log::warn!(
                    "regex match aborted at byte {}: {err}; yielding the remainder",
                    self.last_end
                );
                let rest = &self.haystack[self.last_end..];
                self.last_end = self.haystack.len();
                (!rest.is_empty()).then_some(rest)
            }
            None => {
                self.inner = None;
                None
            }
        }
    }
}
