//! Match state passed between matchers and the memory it carries.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::attrs::{AttrValues, AttributeId, ValueId};

static NEXT_RULE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a single-use rule inside the consumption ledger.
///
/// Every [`crate::OnceMatcher`] gets a fresh id at construction; clones of
/// the matcher keep it, so they count as the same rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u64);

impl RuleId {
    pub(crate) fn next() -> Self {
        Self(NEXT_RULE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule#{}", self.0)
    }
}

/// Memory of one derivation: extracted attributes and the single-use rules
/// that already fired.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySession {
    values: AttrValues,
    used: HashSet<RuleId>,
}

impl MemorySession {
    /// Creates a session seeded with already extracted attributes.
    pub fn new(values: AttrValues) -> Self {
        Self {
            values,
            used: HashSet::new(),
        }
    }

    /// Returns an independent copy of this session.
    ///
    /// Nothing written to the fork is visible here and vice versa.
    pub fn fork(&self) -> Self {
        Self {
            values: self.values.clone(),
            used: self.used.clone(),
        }
    }

    pub fn values(&self) -> &AttrValues {
        &self.values
    }

    pub fn into_values(self) -> AttrValues {
        self.values
    }

    pub(crate) fn append(&mut self, attr: AttributeId, values: &[ValueId]) {
        self.values.append(attr, values);
    }

    /// Whether the single-use rule `id` already matched in this derivation.
    pub fn is_used(&self, id: RuleId) -> bool {
        self.used.contains(&id)
    }

    pub(crate) fn mark_used(&mut self, id: RuleId) {
        self.used.insert(id);
    }
}

/// Snapshot of matching progress.
///
/// States are produced by each matcher invocation and never changed
/// afterwards. A failed state carries the tokens it was given, no matched
/// tokens and no memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    matched: bool,
    remaining: Vec<String>,
    matched_tokens: Option<Vec<String>>,
    memory: Option<MemorySession>,
}

impl MatchState {
    /// Initial state of a derivation over `tokens`.
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            matched: false,
            remaining: tokens,
            matched_tokens: None,
            memory: Some(MemorySession::default()),
        }
    }

    /// Builds a state from its parts, e.g. to resume from known attributes.
    pub fn from_parts(
        matched: bool,
        remaining: Vec<String>,
        matched_tokens: Option<Vec<String>>,
        memory: Option<MemorySession>,
    ) -> Self {
        Self {
            matched,
            remaining,
            matched_tokens,
            memory,
        }
    }

    pub(crate) fn success(
        remaining: Vec<String>,
        matched_tokens: Option<Vec<String>>,
        memory: MemorySession,
    ) -> Self {
        Self {
            matched: true,
            remaining,
            matched_tokens,
            memory: Some(memory),
        }
    }

    pub(crate) fn failure(remaining: Vec<String>) -> Self {
        Self {
            matched: false,
            remaining,
            matched_tokens: None,
            memory: None,
        }
    }

    /// Whether the attempt that produced this state succeeded.
    pub fn has_match(&self) -> bool {
        self.matched
    }

    /// Tokens not consumed yet.
    pub fn remaining_tokens(&self) -> &[String] {
        &self.remaining
    }

    /// Tokens recorded by matchers with `keep_matched_tokens` enabled.
    pub fn matched_tokens(&self) -> Option<&[String]> {
        self.matched_tokens.as_deref()
    }

    pub fn memory(&self) -> Option<&MemorySession> {
        self.memory.as_ref()
    }

    /// Extracted attributes, absent on failure.
    pub fn attrs(&self) -> Option<&AttrValues> {
        self.memory.as_ref().map(MemorySession::values)
    }

    /// Matched and nothing left over: the whole input was understood.
    pub fn is_complete(&self) -> bool {
        self.matched && self.remaining.is_empty()
    }

    /// Copy of this state with forked memory, for a speculative attempt.
    pub fn branch(&self) -> Self {
        Self {
            matched: self.matched,
            remaining: self.remaining.clone(),
            matched_tokens: self.matched_tokens.clone(),
            memory: self.memory.as_ref().map(MemorySession::fork),
        }
    }

    /// Splits into remaining tokens, matched tokens and memory.
    ///
    /// A state without memory yields an empty session.
    pub(crate) fn into_parts(self) -> (Vec<String>, Option<Vec<String>>, MemorySession) {
        (
            self.remaining,
            self.matched_tokens,
            self.memory.unwrap_or_default(),
        )
    }

    pub(crate) fn take_remaining(self) -> Vec<String> {
        self.remaining
    }

    pub(crate) fn take_matched_tokens(&mut self) -> Option<Vec<String>> {
        self.matched_tokens.take()
    }
}
