//! Matching and instantiation of statements.
//!
//! Both sides of a match may contain variables. A variable binds to whatever
//! term stands opposite it; bindings are not chased transitively.

use crate::term::{Statement, Term};
use indexmap::IndexMap;

/// Variable name to term substitution produced by a successful match
pub type Bindings = IndexMap<String, Term>;

/// Unifies two statements, returning the bindings that make them equal
#[must_use]
pub fn match_statements(left: &Statement, right: &Statement) -> Option<Bindings> {
    match_with(left, right, Bindings::new())
}

/// Unifies two statements on top of existing bindings
#[must_use]
pub fn match_with(left: &Statement, right: &Statement, bindings: Bindings) -> Option<Bindings> {
    if left.predicate != right.predicate || left.terms.len() != right.terms.len() {
        return None;
    }

    let mut bindings = bindings;

    left.terms
        .iter()
        .zip(&right.terms)
        .try_for_each(|(l, r)| {
            if l == r {
                return Ok(());
            }
            match (l, r) {
                (Term::Variable(var), other) | (other, Term::Variable(var)) => {
                    bind(&mut bindings, var, other)
                }
                (Term::Symbol(_), Term::Symbol(_)) => Err(()),
            }
        })
        .ok()?;

    Some(bindings)
}

fn bind(bindings: &mut Bindings, var: &str, term: &Term) -> Result<(), ()> {
    if let Some(bound) = bindings.get(var) {
        (bound == term).then_some(()).ok_or(())
    } else {
        bindings.insert(var.to_string(), term.clone());
        Ok(())
    }
}

/// Substitutes bound variables into a copy of `statement`
#[must_use]
pub fn instantiate(statement: &Statement, bindings: &Bindings) -> Statement {
    Statement {
        predicate: statement.predicate.clone(),
        terms: statement
            .terms
            .iter()
            .map(|term| match term {
                Term::Variable(var) => bindings.get(var).cloned().unwrap_or_else(|| term.clone()),
                Term::Symbol(_) => term.clone(),
            })
            .collect(),
    }
}

/// Instantiates every statement of a list
#[must_use]
pub fn instantiate_all(statements: &[Statement], bindings: &Bindings) -> Vec<Statement> {
    statements
        .iter()
        .map(|statement| instantiate(statement, bindings))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(predicate: &str, terms: &[&str]) -> Statement {
        Statement::new(
            predicate,
            terms.iter().map(|t| match t.strip_prefix('?') {
                Some(var) => Term::var(var),
                None => Term::sym(*t),
            }),
        )
    }

    #[test]
    fn test_ground_statements_match_with_empty_bindings() {
        let bindings = match_statements(&stmt("on", &["a", "b"]), &stmt("on", &["a", "b"]));
        assert_eq!(bindings, Some(Bindings::new()));
    }

    #[test]
    fn test_variable_binds_on_either_side() {
        let bindings = match_statements(&stmt("on", &["a", "?y"]), &stmt("on", &["?x", "b"]))
            .expect("should unify");
        assert_eq!(bindings.get("x"), Some(&Term::sym("a")));
        assert_eq!(bindings.get("y"), Some(&Term::sym("b")));
    }

    #[test]
    fn test_repeated_variable_must_agree() {
        assert!(match_statements(&stmt("same", &["?x", "?x"]), &stmt("same", &["a", "b"])).is_none());
        let bindings = match_statements(&stmt("same", &["?x", "?x"]), &stmt("same", &["c", "c"]))
            .expect("should unify");
        assert_eq!(bindings.get("x"), Some(&Term::sym("c")));
    }

    #[test]
    fn test_predicate_or_arity_mismatch_fails() {
        assert!(match_statements(&stmt("on", &["a"]), &stmt("under", &["a"])).is_none());
        assert!(match_statements(&stmt("on", &["a"]), &stmt("on", &["a", "b"])).is_none());
        assert!(match_statements(&stmt("on", &["a"]), &stmt("on", &["b"])).is_none());
    }

    #[test]
    fn test_instantiate_leaves_unbound_variables() {
        let mut bindings = Bindings::new();
        bindings.insert("x".to_string(), Term::sym("cube"));
        let template = stmt("color", &["?x", "?c"]);
        let result = instantiate(&template, &bindings);
        assert_eq!(result, stmt("color", &["cube", "?c"]));
        // input untouched
        assert_eq!(template, stmt("color", &["?x", "?c"]));
    }

    #[test]
    fn test_instantiate_all() {
        let mut bindings = Bindings::new();
        bindings.insert("x".to_string(), Term::sym("a"));
        let out = instantiate_all(&[stmt("p", &["?x"]), stmt("q", &["?x", "?y"])], &bindings);
        assert_eq!(out, vec![stmt("p", &["a"]), stmt("q", &["a", "?y"])]);
    }
}
