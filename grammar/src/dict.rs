//! Dictionary matchers: consume a phrase and record its values in memory.

use std::collections::HashMap;
use std::sync::Arc;

use crate::attrs::{AttributeId, ValueId};
use crate::leaf::max_key_length;
use crate::matcher::Match;
use crate::options::MatchOptions;
use crate::state::MatchState;

/// Phrase to values dictionary shared by clones of a matcher.
pub type Dictionary = HashMap<String, Vec<ValueId>>;

/// Consumes the longest leading phrase present in the dictionary and appends
/// its values to `attribute`.
///
/// Without `calculate_needle_length` every prefix length is tried, starting
/// from the whole remaining input. With it, the search starts at the longest
/// key instead; both find the same phrase.
#[derive(Debug, Clone)]
pub struct DictMatcher {
    dict: Arc<Dictionary>,
    attribute: AttributeId,
    max_key_length: Option<usize>,
    options: MatchOptions,
}

impl DictMatcher {
    pub fn new(dict: Dictionary, attribute: AttributeId, options: MatchOptions) -> Self {
        let max_key_length = options
            .calculate_needle_length
            .then(|| max_key_length(dict.keys()));
        Self {
            dict: Arc::new(dict),
            attribute,
            max_key_length,
            options,
        }
    }

    pub fn attribute(&self) -> AttributeId {
        self.attribute
    }
}

impl Match for DictMatcher {
    fn apply(&self, state: MatchState) -> MatchState {
        let (mut tokens, _, mut memory) = state.into_parts();
        let border = match self.max_key_length {
            Some(max) => max.min(tokens.len()),
            None => tokens.len(),
        };

        for len in (1..=border).rev() {
            let needle = tokens[..len].join(" ");
            let Some(values) = self.dict.get(&needle) else {
                continue;
            };
            memory.append(self.attribute, values);
            let matched: Vec<String> = tokens.drain(..len).collect();
            let matched = self.options.keep_matched_tokens.then_some(matched);
            return MatchState::success(tokens, matched, memory);
        }

        MatchState::failure(tokens)
    }
}

/// Finds a dictionary phrase anywhere in the remaining tokens and cuts it out.
///
/// Windows are scanned from the longest key length down to one token and,
/// for each length, from left to right; the first hit wins. The tokens on
/// both sides of the window are joined back in their original order.
#[derive(Debug, Clone)]
pub struct AnyOrderDictMatcher {
    dict: Arc<Dictionary>,
    attribute: AttributeId,
    max_key_length: usize,
    options: MatchOptions,
}

impl AnyOrderDictMatcher {
    pub fn new(dict: Dictionary, attribute: AttributeId, options: MatchOptions) -> Self {
        let max_key_length = max_key_length(dict.keys());
        Self {
            dict: Arc::new(dict),
            attribute,
            max_key_length,
            options,
        }
    }

    pub fn attribute(&self) -> AttributeId {
        self.attribute
    }

    /// Position and length of the winning window, if any.
    fn find(&self, tokens: &[String]) -> Option<(usize, usize, &[ValueId])> {
        let border = self.max_key_length.min(tokens.len());
        for len in (1..=border).rev() {
            for (offset, window) in tokens.windows(len).enumerate() {
                if let Some(values) = self.dict.get(&window.join(" ")) {
                    return Some((offset, len, values));
                }
            }
        }
        None
    }
}

impl Match for AnyOrderDictMatcher {
    fn apply(&self, state: MatchState) -> MatchState {
        let (mut tokens, _, mut memory) = state.into_parts();
        let Some((offset, len, values)) = self.find(&tokens) else {
            return MatchState::failure(tokens);
        };

        memory.append(self.attribute, values);
        let matched: Vec<String> = tokens.drain(offset..offset + len).collect();
        let matched = self.options.keep_matched_tokens.then_some(matched);
        MatchState::success(tokens, matched, memory)
    }
}
