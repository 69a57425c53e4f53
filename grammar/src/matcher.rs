//! The matcher abstraction and the closed set of matcher kinds.

use crate::attrs::AttributeId;
use crate::combinator::{
    FullTextMatcher, OnceMatcher, OneOfMatcher, SequenceMatcher, TryAllMatcher,
};
use crate::dict::{AnyOrderDictMatcher, DictMatcher, Dictionary};
use crate::leaf::{WordMatcher, WordsMatcher};
use crate::options::MatchOptions;
use crate::state::MatchState;
use crate::tokenize::tokenize;

/// A single attempt to match the remaining tokens of a state.
///
/// Implementations return a matched state on success, or a failed state
/// holding the tokens they were given. A successful match always consumes
/// at least one token.
pub trait Match {
    fn apply(&self, state: MatchState) -> MatchState;
}

/// Any matcher of the grammar.
///
/// Cloning is cheap for dictionaries (shared) and keeps the identity of
/// [`OnceMatcher`]s, so a clone used in two places is still one rule.
#[derive(Debug, Clone)]
pub enum Matcher {
    Word(WordMatcher),
    Words(WordsMatcher),
    Sequence(SequenceMatcher),
    Dict(DictMatcher),
    FullText(FullTextMatcher),
    OneOf(OneOfMatcher),
    Once(OnceMatcher),
    AnyOrderDict(AnyOrderDictMatcher),
    TryAll(TryAllMatcher),
}

impl Matcher {
    /// Matches one token equal to `word`.
    pub fn word(word: impl Into<String>) -> Self {
        Self::Word(WordMatcher::new(word))
    }

    /// Matches the longest leading phrase out of `words`.
    pub fn words<I, S>(words: I, options: MatchOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Words(WordsMatcher::new(words, options))
    }

    /// Matches `children` in order, all or nothing.
    pub fn sequence(children: Vec<Matcher>, options: MatchOptions) -> Self {
        Self::Sequence(SequenceMatcher::new(children, options))
    }

    /// Matches the longest leading phrase of `dict`, recording its values
    /// under `attribute`.
    pub fn dict(dict: Dictionary, attribute: AttributeId, options: MatchOptions) -> Self {
        Self::Dict(DictMatcher::new(dict, attribute, options))
    }

    /// Covers the entire input with `children`, reused as often as needed.
    pub fn full_text(children: Vec<Matcher>) -> Self {
        Self::FullText(FullTextMatcher::new(children))
    }

    pub fn one_of(children: Vec<Matcher>) -> Self {
        Self::OneOf(OneOfMatcher::new(children))
    }

    /// Lets `child` match at most once per derivation.
    pub fn once(child: Matcher) -> Self {
        Self::Once(OnceMatcher::new(child))
    }

    /// Matches a phrase of `dict` at any position and cuts it out.
    pub fn any_order_dict(
        dict: Dictionary,
        attribute: AttributeId,
        options: MatchOptions,
    ) -> Self {
        Self::AnyOrderDict(AnyOrderDictMatcher::new(dict, attribute, options))
    }

    pub fn try_all(children: Vec<Matcher>) -> Self {
        Self::TryAll(TryAllMatcher::new(children))
    }

    /// Runs one derivation over `tokens`.
    pub fn derive(&self, tokens: Vec<String>) -> MatchState {
        self.apply(MatchState::new(tokens))
    }

    /// Tokenizes `query` on whitespace and runs one derivation over it.
    pub fn parse(&self, query: &str) -> MatchState {
        self.derive(tokenize(query))
    }
}

impl Match for Matcher {
    fn apply(&self, state: MatchState) -> MatchState {
        match self {
            Self::Word(m) => m.apply(state),
            Self::Words(m) => m.apply(state),
            Self::Sequence(m) => m.apply(state),
            Self::Dict(m) => m.apply(state),
            Self::FullText(m) => m.apply(state),
            Self::OneOf(m) => m.apply(state),
            Self::Once(m) => m.apply(state),
            Self::AnyOrderDict(m) => m.apply(state),
            Self::TryAll(m) => m.apply(state),
        }
    }
}

macro_rules! impl_from_matcher {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Matcher {
                fn from(m: $ty) -> Self {
                    Self::$variant(m)
                }
            }
        )*
    };
}

impl_from_matcher!(
    Word(WordMatcher),
    Words(WordsMatcher),
    Sequence(SequenceMatcher),
    Dict(DictMatcher),
    FullText(FullTextMatcher),
    OneOf(OneOfMatcher),
    Once(OnceMatcher),
    AnyOrderDict(AnyOrderDictMatcher),
    TryAll(TryAllMatcher),
);
