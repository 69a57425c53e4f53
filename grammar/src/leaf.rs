//! Matchers that consume tokens without touching memory.

use std::collections::HashSet;
use std::sync::Arc;

use crate::matcher::Match;
use crate::options::MatchOptions;
use crate::state::MatchState;

/// Number of tokens in a whitespace-delimited dictionary key.
pub(crate) fn key_token_count(key: &str) -> usize {
    key.split(' ').count()
}

/// Longest key, in tokens. Zero for an empty key set.
pub(crate) fn max_key_length<'a, I>(keys: I) -> usize
where
    I: IntoIterator<Item = &'a String>,
{
    keys.into_iter()
        .map(|key| key_token_count(key))
        .max()
        .unwrap_or(0)
}

/// Consumes one token equal to a fixed word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordMatcher {
    word: String,
}

impl WordMatcher {
    pub fn new(word: impl Into<String>) -> Self {
        Self { word: word.into() }
    }

    pub fn word(&self) -> &str {
        &self.word
    }
}

impl Match for WordMatcher {
    fn apply(&self, state: MatchState) -> MatchState {
        let (mut tokens, _, memory) = state.into_parts();
        if tokens.first() != Some(&self.word) {
            return MatchState::failure(tokens);
        }
        tokens.remove(0);
        MatchState::success(tokens, None, memory)
    }
}

/// Consumes the longest leading phrase found in a set of phrases.
///
/// The matched phrase is recorded as one joined element when
/// `keep_matched_tokens` is set.
#[derive(Debug, Clone)]
pub struct WordsMatcher {
    words: Arc<HashSet<String>>,
    max_key_length: usize,
    options: MatchOptions,
}

impl WordsMatcher {
    pub fn new<I, S>(words: I, options: MatchOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: HashSet<String> = words.into_iter().map(Into::into).collect();
        let max_key_length = max_key_length(&words);
        Self {
            words: Arc::new(words),
            max_key_length,
            options,
        }
    }

    /// Longest phrase of the set, in tokens.
    pub fn max_key_length(&self) -> usize {
        self.max_key_length
    }
}

impl Match for WordsMatcher {
    fn apply(&self, state: MatchState) -> MatchState {
        let (mut tokens, _, memory) = state.into_parts();
        let border = self.max_key_length.min(tokens.len());

        for len in (1..=border).rev() {
            let needle = tokens[..len].join(" ");
            if !self.words.contains(&needle) {
                continue;
            }
            let matched = self.options.keep_matched_tokens.then(|| vec![needle]);
            tokens.drain(..len);
            return MatchState::success(tokens, matched, memory);
        }

        MatchState::failure(tokens)
    }
}
