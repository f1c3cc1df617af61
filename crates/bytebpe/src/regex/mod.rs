//! # Regex Utilities
//!
//! The pretokenizer pattern needs a negative lookahead (``\s+(?!\S)``), which
//! requires the extended regex machinery provided by the [`fancy_regex`] crate;
//! but naturally, this has performance costs. We'd prefer to avoid using the
//! [`fancy_regex`] crate when possible, falling back on the standard [`regex`]
//! crate when patterns permit this.
//!
//! * Labeling Patterns - [`RegexWrapperPattern`]
//!   * [`RegexWrapperPattern::Basic`] - a pattern which was written for [`regex`].
//!   * [`RegexWrapperPattern::Fancy`] - a pattern which was written for [`fancy_regex`].
//!   * [`RegexWrapperPattern::Adaptive`] - unknown target, try basic; then fall-up to fancy.
//! * Wrapping Compiled Regex - [`RegexWrapper`]
//!
//! The [`RegexWrapper`] type supports only one operation, ``find_iter()``.

pub mod regex_wrapper;

#[doc(inline)]
pub use regex_wrapper::{
    ErrorWrapper, FANCY_BACKTRACK_LIMIT, MatchesWrapper, RegexWrapper, RegexWrapperPattern,
};
