use crate::store::{Fact, Justification, Rule};
use crate::term::{Implication, Sentence};
use crate::trace::{TraceEvent, Tracer};
use crate::unify::{instantiate, instantiate_all, match_statements};

/// A conclusion drawn from one fact and one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    /// The new fact, or the rule with its first antecedent discharged
    pub conclusion: Sentence,
    /// The fact/rule pair it came from
    pub justification: Justification,
}

/// Resolves `fact` against the first antecedent of `rule`
///
/// - One antecedent: the instantiated consequent becomes a new fact
/// - More antecedents: the rest, instantiated, form a new shorter rule
///
/// Only the first antecedent is ever tried. Returns `None` if it does not
/// unify with the fact.
#[must_use]
pub fn infer(fact: &Fact, rule: &Rule, tracer: &dyn Tracer) -> Option<Derivation> {
    tracer.trace(&TraceEvent::Inferring {
        fact: &fact.statement,
        rule: &rule.implication,
    });

    let (first, rest) = rule.antecedents().split_first()?;
    let bindings = match_statements(&fact.statement, first)?;

    let consequent = instantiate(rule.consequent(), &bindings);
    let conclusion = if rest.is_empty() {
        Sentence::Fact(consequent)
    } else {
        Sentence::Rule(Implication::new(instantiate_all(rest, &bindings), consequent))
    };

    Some(Derivation {
        conclusion,
        justification: Justification {
            fact: fact.id,
            rule: rule.id,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FactId, RuleId};
    use crate::term::{Statement, Term};
    use crate::trace::NoopTracer;
    use indexmap::IndexSet;

    fn fact(statement: Statement) -> Fact {
        Fact {
            id: FactId(0),
            statement,
            asserted: true,
            supported_by: IndexSet::new(),
            dependents: IndexSet::new(),
        }
    }

    fn rule(antecedents: Vec<Statement>, consequent: Statement) -> Rule {
        Rule {
            id: RuleId(1),
            implication: Implication::new(antecedents, consequent),
            asserted: true,
            supported_by: IndexSet::new(),
            dependents: IndexSet::new(),
        }
    }

    #[test]
    fn test_single_antecedent_yields_fact() {
        let derivation = infer(
            &fact(Statement::new("p", [Term::sym("a")])),
            &rule(
                vec![Statement::new("p", [Term::var("x")])],
                Statement::new("q", [Term::var("x")]),
            ),
            &NoopTracer,
        )
        .expect("should derive");

        assert_eq!(
            derivation.conclusion,
            Sentence::Fact(Statement::new("q", [Term::sym("a")]))
        );
        assert_eq!(
            derivation.justification,
            Justification {
                fact: FactId(0),
                rule: RuleId(1)
            }
        );
    }

    #[test]
    fn test_multiple_antecedents_yield_shorter_rule() {
        let derivation = infer(
            &fact(Statement::new("p", [Term::sym("a")])),
            &rule(
                vec![
                    Statement::new("p", [Term::var("x")]),
                    Statement::new("r", [Term::var("x"), Term::var("y")]),
                ],
                Statement::new("s", [Term::var("x"), Term::var("y")]),
            ),
            &NoopTracer,
        )
        .expect("should derive");

        assert_eq!(
            derivation.conclusion,
            Sentence::Rule(Implication::new(
                [Statement::new("r", [Term::sym("a"), Term::var("y")])],
                Statement::new("s", [Term::sym("a"), Term::var("y")]),
            ))
        );
    }

    #[test]
    fn test_only_first_antecedent_is_tried() {
        // q(a) would satisfy the second antecedent, but never the first
        let derivation = infer(
            &fact(Statement::new("q", [Term::sym("a")])),
            &rule(
                vec![
                    Statement::new("p", [Term::var("x")]),
                    Statement::new("q", [Term::var("x")]),
                ],
                Statement::new("s", [Term::var("x")]),
            ),
            &NoopTracer,
        );
        assert!(derivation.is_none());
    }

    #[test]
    fn test_no_match_has_no_side_effect() {
        let f = fact(Statement::new("p", [Term::sym("a")]));
        let r = rule(
            vec![Statement::new("p", [Term::sym("b")])],
            Statement::new("q", []),
        );
        assert!(infer(&f, &r, &NoopTracer).is_none());
        assert!(f.dependents.is_empty());
        assert!(r.dependents.is_empty());
    }
}
