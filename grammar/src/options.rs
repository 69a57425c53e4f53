use serde::{Deserialize, Serialize};

/// Options accepted by matcher constructors.
///
/// Options are independent; matchers ignore the ones that do not apply to
/// them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Record the consumed tokens in the resulting state.
    pub keep_matched_tokens: bool,

    /// Bound the needle search by the longest key of the dictionary instead
    /// of the number of remaining tokens. Only changes performance.
    pub calculate_needle_length: bool,
}

impl MatchOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keep_matched_tokens(mut self) -> Self {
        self.keep_matched_tokens = true;
        self
    }

    pub fn with_calculate_needle_length(mut self) -> Self {
        self.calculate_needle_length = true;
        self
    }
}
