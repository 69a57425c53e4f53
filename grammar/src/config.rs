//! Declarative grammars loaded from YAML.
//!
//! A grammar file names its rules and the root rule to run:
//!
//! ```yaml
//! root: query
//! rules:
//!   rooms:
//!     kind: any_order_dict
//!     attribute: 1
//!     dict:
//!       "1к": [1]
//!       "2 или 3 комнатная": [2, 3]
//!   query:
//!     kind: full_text
//!     children:
//!       - rooms
//!       - kind: word
//!         word: квартира
//! ```
//!
//! Children are either the name of another rule or an inline rule. A named
//! rule used in several places is built once; single-use rules keep one
//! identity across all those places.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attrs::AttributeId;
use crate::dict::Dictionary;
use crate::error::GrammarError;
use crate::matcher::Matcher;
use crate::options::MatchOptions;
use crate::state::MatchState;

/// Definition of one matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleDef {
    Word {
        word: String,
    },
    Words {
        words: Vec<String>,
        #[serde(default)]
        options: MatchOptions,
    },
    Sequence {
        children: Vec<RuleRef>,
        #[serde(default)]
        options: MatchOptions,
    },
    Dict {
        attribute: AttributeId,
        dict: Dictionary,
        #[serde(default)]
        options: MatchOptions,
    },
    FullText {
        children: Vec<RuleRef>,
    },
    OneOf {
        children: Vec<RuleRef>,
    },
    Once {
        child: Box<RuleRef>,
    },
    AnyOrderDict {
        attribute: AttributeId,
        dict: Dictionary,
        #[serde(default)]
        options: MatchOptions,
    },
    TryAll {
        children: Vec<RuleRef>,
    },
}

/// Reference to a rule from inside another rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleRef {
    /// Name of a rule of the same grammar.
    Name(String),
    Inline(RuleDef),
}

/// A grammar as written in a definition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarConfig {
    /// Rule run for each query.
    pub root: String,

    #[serde(default)]
    pub rules: BTreeMap<String, RuleDef>,
}

impl GrammarConfig {
    /// Parses a grammar definition from YAML (JSON is accepted too).
    pub fn from_yaml(source: &str) -> Result<Self, GrammarError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Reads and parses a grammar definition file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| GrammarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&source)
    }

    /// Resolves rule references and builds every rule.
    ///
    /// # Errors
    /// Returns [`GrammarError::UnknownRule`] for a reference (or root) that
    /// names no rule, and [`GrammarError::CyclicRule`] when a rule contains
    /// itself.
    pub fn build(&self) -> Result<Grammar, GrammarError> {
        let mut builder = Builder {
            rules: &self.rules,
            built: BTreeMap::new(),
            visiting: Vec::new(),
        };
        for name in self.rules.keys() {
            builder.named(name)?;
        }
        let root = builder.named(&self.root)?;

        debug!(rules = builder.built.len(), root = %self.root, "grammar built");
        Ok(Grammar {
            root_name: self.root.clone(),
            root,
            rules: builder.built,
        })
    }
}

struct Builder<'a> {
    rules: &'a BTreeMap<String, RuleDef>,
    built: BTreeMap<String, Matcher>,
    visiting: Vec<&'a str>,
}

impl<'a> Builder<'a> {
    fn named(&mut self, name: &str) -> Result<Matcher, GrammarError> {
        if let Some(matcher) = self.built.get(name) {
            return Ok(matcher.clone());
        }
        let (name, def) = self
            .rules
            .get_key_value(name)
            .ok_or_else(|| GrammarError::UnknownRule(name.to_string()))?;

        if self.visiting.contains(&name.as_str()) {
            let mut chain = self.visiting.join(" -> ");
            chain.push_str(" -> ");
            chain.push_str(name);
            return Err(GrammarError::CyclicRule(chain));
        }

        self.visiting.push(name.as_str());
        let matcher = self.rule(def)?;
        self.visiting.pop();

        self.built.insert(name.clone(), matcher.clone());
        Ok(matcher)
    }

    fn reference(&mut self, reference: &'a RuleRef) -> Result<Matcher, GrammarError> {
        match reference {
            RuleRef::Name(name) => self.named(name),
            RuleRef::Inline(def) => self.rule(def),
        }
    }

    fn children(&mut self, refs: &'a [RuleRef]) -> Result<Vec<Matcher>, GrammarError> {
        refs.iter().map(|r| self.reference(r)).collect()
    }

    fn rule(&mut self, def: &'a RuleDef) -> Result<Matcher, GrammarError> {
        let matcher = match def {
            RuleDef::Word { word } => Matcher::word(word.clone()),
            RuleDef::Words { words, options } => Matcher::words(words.iter().cloned(), *options),
            RuleDef::Sequence { children, options } => {
                Matcher::sequence(self.children(children)?, *options)
            }
            RuleDef::Dict {
                attribute,
                dict,
                options,
            } => Matcher::dict(dict.clone(), *attribute, *options),
            RuleDef::FullText { children } => Matcher::full_text(self.children(children)?),
            RuleDef::OneOf { children } => Matcher::one_of(self.children(children)?),
            RuleDef::Once { child } => Matcher::once(self.reference(child)?),
            RuleDef::AnyOrderDict {
                attribute,
                dict,
                options,
            } => Matcher::any_order_dict(dict.clone(), *attribute, *options),
            RuleDef::TryAll { children } => Matcher::try_all(self.children(children)?),
        };
        Ok(matcher)
    }
}

/// A built grammar: the root matcher plus every named rule.
///
/// Immutable once built; safe to share between threads and to reuse for any
/// number of queries.
#[derive(Debug, Clone)]
pub struct Grammar {
    root_name: String,
    root: Matcher,
    rules: BTreeMap<String, Matcher>,
}

impl Grammar {
    /// Parses and builds a grammar from YAML.
    pub fn from_yaml(source: &str) -> Result<Self, GrammarError> {
        GrammarConfig::from_yaml(source)?.build()
    }

    /// Reads and builds a grammar definition file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        GrammarConfig::from_file(path)?.build()
    }

    pub fn root(&self) -> &Matcher {
        &self.root
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Named rule of the grammar.
    pub fn rule(&self, name: &str) -> Option<&Matcher> {
        self.rules.get(name)
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Runs the root rule over the whitespace tokens of `query`.
    pub fn extract(&self, query: &str) -> MatchState {
        self.root.parse(query)
    }
}
