//! Token-level grammar matchers for extracting attributes from search queries.
//!
//! A query is split into tokens and matched against a tree of matchers.
//! Leaf matchers consume words or phrases; dictionary matchers also record
//! value ids under an attribute; combinators compose them:
//!
//! - [`Matcher::word`] - one fixed token
//! - [`Matcher::words`] - longest leading phrase out of a set
//! - [`Matcher::dict`] - longest leading phrase of a dictionary, values recorded
//! - [`Matcher::any_order_dict`] - dictionary phrase anywhere in the input, cut out
//! - [`Matcher::sequence`] - children in order, all or nothing
//! - [`Matcher::full_text`] - children in any order and multiplicity until the input is exhausted
//! - [`Matcher::one_of`] - first child that matches
//! - [`Matcher::once`] - child may match once per derivation
//! - [`Matcher::try_all`] - every child that matches contributes
//!
//! # Example
//!
//! ```rust
//! use querygram_grammar::{AttrValues, MatchOptions, Matcher};
//!
//! let rooms = Matcher::any_order_dict(
//!     [("2 или 3 комнатная".to_string(), vec![2, 3])].into(),
//!     1,
//!     MatchOptions::new(),
//! );
//! let root = Matcher::full_text(vec![
//!     rooms,
//!     Matcher::words(["снять", "у моря"], MatchOptions::new()),
//! ]);
//!
//! let state = root.parse("снять 2 или 3 комнатная у моря");
//! assert!(state.is_complete());
//! assert_eq!(state.attrs(), Some(&AttrValues::from([(1, vec![2, 3])])));
//! ```
//!
//! # Branching
//!
//! Combinators try children on [`MatchState::branch`]es of the current
//! state and keep a child's state only when it matched. Failed states carry
//! no memory, so partial work of a failed subtree is never observed.

mod attrs;
mod combinator;
mod config;
mod dict;
mod error;
mod leaf;
mod matcher;
mod options;
mod state;
mod tokenize;

pub use attrs::{AttrValues, AttributeId, ValueId};
pub use combinator::{FullTextMatcher, OnceMatcher, OneOfMatcher, SequenceMatcher, TryAllMatcher};
pub use config::{Grammar, GrammarConfig, RuleDef, RuleRef};
pub use dict::{AnyOrderDictMatcher, DictMatcher, Dictionary};
pub use error::GrammarError;
pub use leaf::{WordMatcher, WordsMatcher};
pub use matcher::{Match, Matcher};
pub use options::MatchOptions;
pub use state::{MatchState, MemorySession, RuleId};
pub use tokenize::tokenize;
