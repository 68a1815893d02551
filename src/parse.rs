//! Reader for the line-oriented text syntax:
//!
//! ```text
//! # blocks world
//! fact: (isa cube1 block)
//! rule: ((isa ?x block) (size ?x big)) -> (big ?x)
//! ```

use crate::error::{KbError, Result};
use crate::term::{Implication, Sentence, Statement, Term};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map},
    multi::{many0, many1},
    sequence::{delimited, pair, preceded, separated_pair, terminated},
    IResult,
};

fn ws<'a, O>(
    inner: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    delimited(multispace0, inner, multispace0)
}

fn name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != '(' && c != ')' && c != '?')(input)
}

fn term(input: &str) -> IResult<&str, Term> {
    ws(alt((
        map(preceded(char('?'), name), Term::var),
        map(name, Term::sym),
    )))(input)
}

fn statement(input: &str) -> IResult<&str, Statement> {
    map(
        ws(delimited(char('('), pair(ws(name), many0(term)), char(')'))),
        |(predicate, terms)| Statement::new(predicate, terms),
    )(input)
}

fn implication(input: &str) -> IResult<&str, Implication> {
    map(
        separated_pair(
            ws(delimited(char('('), many1(statement), char(')'))),
            tag("->"),
            statement,
        ),
        |(antecedents, consequent)| Implication::new(antecedents, consequent),
    )(input)
}

fn sentence(input: &str) -> IResult<&str, Sentence> {
    alt((
        map(preceded(terminated(tag("fact:"), multispace0), statement), Sentence::Fact),
        map(preceded(terminated(tag("rule:"), multispace0), implication), Sentence::Rule),
    ))(input)
}

/// Parses a single statement such as `(on ?x table)`
///
/// # Errors
///
/// [`KbError::Parse`] if `input` is not exactly one statement.
pub fn parse_statement(input: &str) -> Result<Statement> {
    run(statement, input, 1)
}

/// Parses one `fact:` or `rule:` sentence
///
/// # Errors
///
/// [`KbError::Parse`] if `input` is not exactly one sentence.
pub fn parse_sentence(input: &str) -> Result<Sentence> {
    run(sentence, input.trim(), 1)
}

/// Parses one sentence per line, skipping blank lines and `#` comments
///
/// # Errors
///
/// [`KbError::Parse`] naming the first bad line.
pub fn parse_program(source: &str) -> Result<Vec<Sentence>> {
    source
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| run(sentence, line, line_no))
        .collect()
}

fn run<'a, O>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    input: &'a str,
    line: usize,
) -> Result<O> {
    all_consuming(parser)(input)
        .map(|(_, out)| out)
        .map_err(|err| KbError::Parse {
            line,
            message: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_statement() {
        let parsed = parse_statement(" (on ?x  table) ").unwrap();
        assert_eq!(
            parsed,
            Statement::new("on", [Term::var("x"), Term::sym("table")])
        );
    }

    #[test]
    fn test_parse_fact_and_rule() {
        assert_eq!(
            parse_sentence("fact: (isa cube1 block)").unwrap(),
            Sentence::Fact(Statement::new(
                "isa",
                [Term::sym("cube1"), Term::sym("block")]
            ))
        );

        let rule = parse_sentence("rule: ((isa ?x block) (size ?x big)) -> (big ?x)").unwrap();
        assert_eq!(
            rule,
            Sentence::Rule(Implication::new(
                [
                    Statement::new("isa", [Term::var("x"), Term::sym("block")]),
                    Statement::new("size", [Term::var("x"), Term::sym("big")]),
                ],
                Statement::new("big", [Term::var("x")]),
            ))
        );
        // display round-trips through the reader
        assert_eq!(parse_sentence(&rule.to_string()).unwrap(), rule);
    }

    #[test]
    fn test_rule_needs_antecedents() {
        assert!(parse_sentence("rule: () -> (q a)").is_err());
    }

    #[test]
    fn test_program_reports_line_numbers() {
        let source = "# header\nfact: (p a)\n\nfact: (p b\n";
        match parse_program(source) {
            Err(KbError::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_into_knowledge_base() -> anyhow::Result<()> {
        let mut kb = crate::KnowledgeBase::new();
        kb.load(
            "fact: (isa cube1 block)\n\
             fact: (size cube1 big)\n\
             rule: ((isa ?x block) (size ?x big)) -> (big ?x)\n",
        )?;
        assert!(kb.holds(&parse_statement("(big cube1)")?));
        Ok(())
    }
}
