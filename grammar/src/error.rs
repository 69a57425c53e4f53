use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or building a declarative grammar.
///
/// Matching itself never fails with an error; it only matches or not.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("grammar: read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("grammar: invalid definition: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("grammar: unknown rule {0:?}")]
    UnknownRule(String),

    #[error("grammar: cyclic rule reference: {0}")]
    CyclicRule(String),
}
