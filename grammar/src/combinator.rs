//! Matchers built from other matchers.
//!
//! Every child attempt runs on a [`MatchState::branch`] of the current state,
//! so a failed child cannot leak memory writes or ledger entries into the
//! caller. Only a successful child's state is carried forward.

use tracing::trace;

use crate::matcher::{Match, Matcher};
use crate::options::MatchOptions;
use crate::state::{MatchState, RuleId};

/// Appends `fragment` to `acc`, keeping `None` while nothing was recorded.
fn extend_tokens(acc: &mut Option<Vec<String>>, fragment: Option<Vec<String>>) {
    let Some(fragment) = fragment else {
        return;
    };
    match acc {
        Some(tokens) => tokens.extend(fragment),
        None => *acc = Some(fragment),
    }
}

/// Applies its children one after another. All or nothing.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    children: Vec<Matcher>,
    options: MatchOptions,
}

impl SequenceMatcher {
    pub fn new(children: Vec<Matcher>, options: MatchOptions) -> Self {
        Self { children, options }
    }

    pub fn children(&self) -> &[Matcher] {
        &self.children
    }
}

impl Match for SequenceMatcher {
    fn apply(&self, state: MatchState) -> MatchState {
        if state.remaining_tokens().is_empty() || self.children.is_empty() {
            return MatchState::failure(state.take_remaining());
        }

        let mut matched = self.options.keep_matched_tokens.then(Vec::new);
        let mut current = state.branch();
        for (idx, child) in self.children.iter().enumerate() {
            current = child.apply(current.branch());
            if !current.has_match() {
                trace!(child = idx, "sequence: child failed");
                return MatchState::failure(state.take_remaining());
            }
            if let Some(tokens) = matched.as_mut() {
                tokens.extend(current.take_matched_tokens().unwrap_or_default());
            }
        }

        let (remaining, _, memory) = current.into_parts();
        MatchState::success(remaining, matched, memory)
    }
}

/// Covers the whole input with its children, in any order and any number of
/// times.
///
/// Each pass tries the children in order and restarts from the first one
/// after a success. The matcher succeeds once no tokens remain and fails
/// when a pass makes no progress. Matched tokens of every successful child
/// are accumulated; those of the input state are not carried over.
#[derive(Debug, Clone)]
pub struct FullTextMatcher {
    children: Vec<Matcher>,
}

impl FullTextMatcher {
    pub fn new(children: Vec<Matcher>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Matcher] {
        &self.children
    }

    /// First child that matches `state`, tried on branches.
    fn first_match(&self, state: &MatchState) -> Option<MatchState> {
        self.children
            .iter()
            .map(|child| child.apply(state.branch()))
            .find(MatchState::has_match)
    }
}

impl Match for FullTextMatcher {
    fn apply(&self, state: MatchState) -> MatchState {
        let mut current = state.branch();
        current.take_matched_tokens();
        loop {
            let Some(mut next) = self.first_match(&current) else {
                trace!(
                    remaining = ?current.remaining_tokens(),
                    "full text: no child advanced"
                );
                return MatchState::failure(state.take_remaining());
            };

            let (_, mut matched, _) = current.into_parts();
            extend_tokens(&mut matched, next.take_matched_tokens());
            let (remaining, _, memory) = next.into_parts();
            let done = remaining.is_empty();
            current = MatchState::success(remaining, matched, memory);
            if done {
                return current;
            }
        }
    }
}

/// Ordered alternation: the first child that matches wins.
#[derive(Debug, Clone)]
pub struct OneOfMatcher {
    children: Vec<Matcher>,
}

impl OneOfMatcher {
    pub fn new(children: Vec<Matcher>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Matcher] {
        &self.children
    }
}

impl Match for OneOfMatcher {
    fn apply(&self, state: MatchState) -> MatchState {
        for child in &self.children {
            let next = child.apply(state.branch());
            if next.has_match() {
                return next;
            }
        }
        MatchState::failure(state.take_remaining())
    }
}

/// Lets its child match at most once per derivation.
///
/// Use is recorded in the memory ledger of the resulting state rather than
/// on the matcher, so one matcher tree can serve any number of derivations,
/// including concurrent ones.
#[derive(Debug, Clone)]
pub struct OnceMatcher {
    id: RuleId,
    child: Box<Matcher>,
}

impl OnceMatcher {
    pub fn new(child: Matcher) -> Self {
        Self {
            id: RuleId::next(),
            child: Box::new(child),
        }
    }

    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn child(&self) -> &Matcher {
        &self.child
    }
}

impl Match for OnceMatcher {
    fn apply(&self, state: MatchState) -> MatchState {
        if state.memory().is_some_and(|memory| memory.is_used(self.id)) {
            trace!(rule = %self.id, "once: already used in this derivation");
            return MatchState::failure(state.take_remaining());
        }

        let next = self.child.apply(state.branch());
        if !next.has_match() {
            return MatchState::failure(state.take_remaining());
        }

        let (remaining, matched, mut memory) = next.into_parts();
        memory.mark_used(self.id);
        MatchState::success(remaining, matched, memory)
    }
}

/// Best-effort conjunction: every child that matches contributes.
///
/// Each child is tried against the state left by the children that matched
/// before it. Succeeds when at least one child matched.
#[derive(Debug, Clone)]
pub struct TryAllMatcher {
    children: Vec<Matcher>,
}

impl TryAllMatcher {
    pub fn new(children: Vec<Matcher>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Matcher] {
        &self.children
    }
}

impl Match for TryAllMatcher {
    fn apply(&self, state: MatchState) -> MatchState {
        let mut current: Option<MatchState> = None;
        let mut matched = None;

        for child in &self.children {
            let base = current.as_ref().unwrap_or(&state);
            let mut next = child.apply(base.branch());
            if next.has_match() {
                extend_tokens(&mut matched, next.take_matched_tokens());
                current = Some(next);
            }
        }

        match current {
            Some(current) => {
                let (remaining, _, memory) = current.into_parts();
                MatchState::success(remaining, matched, memory)
            }
            None => MatchState::failure(state.take_remaining()),
        }
    }
}
