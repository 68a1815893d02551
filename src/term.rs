use smallvec::SmallVec;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A term inside a statement
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Term {
    /// A variable that can be unified with any term (written `?x`)
    Variable(String),
    /// A concrete symbol/constant (e.g., `cube1`, `red`)
    Symbol(String),
}

impl Term {
    /// Shorthand for `Term::Variable`
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Shorthand for `Term::Symbol`
    pub fn sym(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// Returns true for `Term::Variable`
    #[must_use]
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(name) => write!(f, "?{name}"),
            Self::Symbol(name) => f.write_str(name),
        }
    }
}

/// An atomic predicate expression (e.g., `(isa cube1 block)`)
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Statement {
    /// The name of the predicate (e.g., `"isa"`)
    pub predicate: String,
    /// The arguments of the predicate
    pub terms: Vec<Term>,
}

impl Statement {
    /// Builds a statement from a predicate and its terms
    pub fn new(predicate: impl Into<String>, terms: impl IntoIterator<Item = Term>) -> Self {
        Self {
            predicate: predicate.into(),
            terms: terms.into_iter().collect(),
        }
    }

    /// True when no term is a variable
    #[must_use]
    pub fn is_ground(&self) -> bool {
        !self.terms.iter().any(Term::is_variable)
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        !self.predicate.is_empty()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.predicate)?;
        for term in &self.terms {
            write!(f, " {term}")?;
        }
        f.write_str(")")
    }
}

/// The structural part of a rule: `antecedents -> consequent`
///
/// Two rules are the same rule iff their implications are equal.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Implication {
    /// Conditions, resolved strictly left to right
    pub antecedents: SmallVec<[Statement; 2]>,
    /// The conclusion
    pub consequent: Statement,
}

impl Implication {
    /// Builds an implication
    pub fn new(antecedents: impl IntoIterator<Item = Statement>, consequent: Statement) -> Self {
        Self {
            antecedents: antecedents.into_iter().collect(),
            consequent,
        }
    }
}

impl fmt::Display for Implication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (idx, antecedent) in self.antecedents.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{antecedent}")?;
        }
        write!(f, ") -> {}", self.consequent)
    }
}

/// Anything that can be told to or asked of the knowledge base
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Sentence {
    /// A single statement
    Fact(Statement),
    /// An implication
    Rule(Implication),
}

impl From<Statement> for Sentence {
    fn from(statement: Statement) -> Self {
        Self::Fact(statement)
    }
}

impl From<Implication> for Sentence {
    fn from(implication: Implication) -> Self {
        Self::Rule(implication)
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fact(statement) => write!(f, "fact: {statement}"),
            Self::Rule(implication) => write!(f, "rule: {implication}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_display() {
        let statement = Statement::new("isa", [Term::var("x"), Term::sym("block")]);
        assert_eq!(statement.to_string(), "(isa ?x block)");
        assert!(!statement.is_ground());
    }

    #[test]
    fn test_rule_display() {
        let rule = Implication::new(
            [
                Statement::new("isa", [Term::var("x"), Term::sym("block")]),
                Statement::new("size", [Term::var("x"), Term::sym("big")]),
            ],
            Statement::new("big", [Term::var("x")]),
        );
        assert_eq!(
            Sentence::Rule(rule).to_string(),
            "rule: ((isa ?x block) (size ?x big)) -> (big ?x)"
        );
    }

    #[test]
    fn test_structural_equality_includes_variable_names() {
        let a = Statement::new("p", [Term::var("x")]);
        let b = Statement::new("p", [Term::var("y")]);
        assert_ne!(a, b);
        assert_eq!(a, Statement::new("p", [Term::var("x")]));
    }
}
