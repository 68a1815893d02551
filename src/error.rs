use thiserror::Error;

/// Errors reported by the knowledge base
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KbError {
    /// The query is a rule, or its statement is malformed
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A rule was asserted without antecedents
    #[error("rule has no antecedents: {0}")]
    EmptyAntecedents(String),

    /// A statement has an empty predicate
    #[error("malformed statement: {0}")]
    MalformedStatement(String),

    /// A single assertion installed more derivations than the configured budget
    #[error("derivation budget of {limit} exhausted")]
    DerivationLimit {
        /// The configured budget
        limit: usize,
    },

    /// The text syntax could not be read
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, KbError>;
