//! The knowledge base: assertion with forward chaining, retraction with
//! truth maintenance, and queries.

use crate::config::KbConfig;
use crate::error::{KbError, Result};
use crate::infer::{infer, Derivation};
use crate::store::{Fact, FactId, ItemId, Justification, Rule, RuleId, Store};
use crate::term::{Implication, Sentence, Statement};
use crate::trace::{NoopTracer, TraceEvent, Tracer};
use crate::unify::{match_statements, Bindings};
use indexmap::IndexSet;
use std::collections::VecDeque;
use std::fmt;

/// One fact that satisfied a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// How the query's variables were bound; empty for a ground query
    pub bindings: Bindings,
    /// The matched fact
    pub fact: FactId,
    /// The matched fact's statement
    pub statement: Statement,
}

/// A sentence waiting to be installed, with the derivation that produced it
#[derive(Debug)]
struct Pending {
    sentence: Sentence,
    justification: Option<Justification>,
}

impl From<Derivation> for Pending {
    fn from(derivation: Derivation) -> Self {
        Self {
            sentence: derivation.conclusion,
            justification: Some(derivation.justification),
        }
    }
}

/// Facts and rules closed under forward chaining
#[derive(Debug)]
pub struct KnowledgeBase {
    store: Store,
    config: KbConfig,
    tracer: Box<dyn Tracer>,
    /// Derivations left over when a budget ran out; drained first by the next `add`
    backlog: VecDeque<Pending>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeBase {
    /// Creates an empty knowledge base
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(KbConfig::default())
    }

    /// Creates an empty knowledge base with the given settings
    #[must_use]
    pub fn with_config(config: KbConfig) -> Self {
        Self {
            store: Store::default(),
            config,
            tracer: Box::new(NoopTracer),
            backlog: VecDeque::new(),
        }
    }

    /// Replaces the tracer
    #[must_use]
    pub fn with_tracer(mut self, tracer: impl Tracer + 'static) -> Self {
        self.tracer = Box::new(tracer);
        self
    }

    /// The active settings
    #[must_use]
    pub fn config(&self) -> &KbConfig {
        &self.config
    }

    /// Asserts a fact or rule as true, then runs forward chaining to a fixed point
    ///
    /// Asserting something already stored marks it asserted and derives
    /// nothing new.
    ///
    /// # Errors
    ///
    /// - [`KbError::EmptyAntecedents`] for a rule with no antecedents
    /// - [`KbError::MalformedStatement`] for a statement with an empty predicate
    /// - [`KbError::DerivationLimit`] when the configured budget runs out;
    ///   everything installed up to that point stays, and the derivations not
    ///   yet installed are kept for the next call (see [`KnowledgeBase::resume`])
    pub fn assert(&mut self, sentence: impl Into<Sentence>) -> Result<()> {
        let sentence = sentence.into();
        self.tracer.trace(&TraceEvent::Asserting(&sentence));
        validate(&sentence)?;
        self.add(Some(Pending {
            sentence,
            justification: None,
        }))
    }

    /// Continues forward chaining that an earlier call left unfinished
    ///
    /// # Errors
    ///
    /// [`KbError::DerivationLimit`] if the budget runs out again.
    pub fn resume(&mut self) -> Result<()> {
        self.add(None)
    }

    /// True while derivations from an interrupted assertion are still waiting;
    /// answers may be incomplete until they are installed
    #[must_use]
    pub fn has_backlog(&self) -> bool {
        !self.backlog.is_empty()
    }

    /// Asserts a fact
    ///
    /// # Errors
    ///
    /// See [`KnowledgeBase::assert`].
    pub fn assert_fact(&mut self, statement: Statement) -> Result<()> {
        self.assert(Sentence::Fact(statement))
    }

    /// Asserts a rule
    ///
    /// # Errors
    ///
    /// See [`KnowledgeBase::assert`].
    pub fn assert_rule(
        &mut self,
        antecedents: impl IntoIterator<Item = Statement>,
        consequent: Statement,
    ) -> Result<()> {
        self.assert(Sentence::Rule(Implication::new(antecedents, consequent)))
    }

    /// Installs the backlog, then `first`, and everything derivable from them
    ///
    /// Forward chaining runs off an explicit queue rather than recursion.
    /// Every (fact, rule) pair is tried exactly once: when the later of the
    /// two is installed. If the budget runs out, the rest of the queue moves
    /// to the backlog untouched.
    fn add(&mut self, first: Option<Pending>) -> Result<()> {
        let mut pending = std::mem::take(&mut self.backlog);
        pending.extend(first);
        let mut derived = 0usize;

        while let Some(next) = pending.pop_front() {
            if next.justification.is_some() {
                if let Some(limit) = self.config.max_derivations {
                    if derived >= limit {
                        pending.push_front(next);
                        self.backlog = pending;
                        return Err(KbError::DerivationLimit { limit });
                    }
                }
                derived += 1;
            }
            let Some(item) = self.install(next) else {
                continue;
            };
            pending.extend(self.derivations_from(item).into_iter().map(Pending::from));
        }

        Ok(())
    }

    /// Inserts a new item, or merges into the equal one already stored.
    /// Returns the id only when something new was inserted.
    fn install(&mut self, pending: Pending) -> Option<ItemId> {
        let Pending {
            sentence,
            justification,
        } = pending;

        let existing = match &sentence {
            Sentence::Fact(statement) => self.store.find_fact(statement).map(ItemId::Fact),
            Sentence::Rule(implication) => self.store.find_rule(implication).map(ItemId::Rule),
        };
        if let Some(item) = existing {
            self.merge(item, justification);
            return None;
        }

        let asserted = justification.is_none();
        let supported_by: IndexSet<Justification> = justification.into_iter().collect();
        let item = match &sentence {
            Sentence::Fact(statement) => ItemId::Fact(self.store.insert_fact(
                statement.clone(),
                asserted,
                supported_by,
            )),
            Sentence::Rule(implication) => ItemId::Rule(self.store.insert_rule(
                implication.clone(),
                asserted,
                supported_by,
            )),
        };
        if let Some(justification) = justification {
            self.link(justification, item);
        }
        self.tracer.trace(&TraceEvent::Added(item, &sentence));
        Some(item)
    }

    fn merge(&mut self, item: ItemId, justification: Option<Justification>) {
        match justification {
            Some(justification) => {
                if let Some(supported_by) = self.store.supported_by_mut(item) {
                    supported_by.insert(justification);
                }
                self.link(justification, item);
            }
            None => match item {
                ItemId::Fact(id) => {
                    if let Some(fact) = self.store.fact_mut(id) {
                        fact.asserted = true;
                    }
                }
                ItemId::Rule(id) => {
                    if let Some(rule) = self.store.rule_mut(id) {
                        rule.asserted = true;
                    }
                }
            },
        }
        self.tracer.trace(&TraceEvent::Merged(item));
    }

    /// Records `item` as a dependent of both premises of `justification`
    fn link(&mut self, justification: Justification, item: ItemId) {
        self.store
            .add_dependent(ItemId::Fact(justification.fact), item);
        self.store
            .add_dependent(ItemId::Rule(justification.rule), item);
    }

    /// Runs the inference step between a newly installed item and every
    /// stored item of the opposite kind it could unify with
    fn derivations_from(&self, item: ItemId) -> Vec<Derivation> {
        let tracer = self.tracer.as_ref();
        match item {
            ItemId::Fact(id) => {
                let Some(fact) = self.store.fact(id) else {
                    return Vec::new();
                };
                self.store
                    .rule_ids_for(&fact.statement.predicate)
                    .into_iter()
                    .filter_map(|rule_id| self.store.rule(rule_id))
                    .filter_map(|rule| infer(fact, rule, tracer))
                    .collect()
            }
            ItemId::Rule(id) => {
                let Some(rule) = self.store.rule(id) else {
                    return Vec::new();
                };
                let Some(first) = rule.antecedents().first() else {
                    return Vec::new();
                };
                self.store
                    .fact_ids_for(&first.predicate)
                    .into_iter()
                    .filter_map(|fact_id| self.store.fact(fact_id))
                    .filter_map(|fact| infer(fact, rule, tracer))
                    .collect()
            }
        }
    }

    /// Retracts an asserted fact and everything that was only derivable from it
    ///
    /// Only a root fact can be retracted: one that is stored, asserted, and
    /// has no justification of its own. Anything else is ignored. The cascade
    /// stops at items that keep another justification and at asserted items.
    ///
    /// Returns how many facts and rules were deleted (0 when ignored).
    pub fn retract(&mut self, statement: &Statement) -> usize {
        self.tracer.trace(&TraceEvent::Retracting(statement));

        let root = self
            .store
            .find_fact(statement)
            .and_then(|id| self.store.fact(id))
            .filter(|fact| fact.asserted && fact.supported_by.is_empty())
            .map(|fact| ItemId::Fact(fact.id));
        let Some(root) = root else {
            self.tracer.trace(&TraceEvent::RetractIgnored(statement));
            return 0;
        };

        let mut queue = VecDeque::from([root]);
        let mut removed = Vec::new();

        while let Some(&current) = queue.front() {
            let mut affected = IndexSet::new();
            for dependent in self.store.dependents(current) {
                let Some(supported_by) = self.store.supported_by_mut(dependent) else {
                    continue;
                };
                let (dropped, kept): (Vec<Justification>, Vec<Justification>) = supported_by
                    .iter()
                    .copied()
                    .partition(|justification| justification.mentions(current));
                if dropped.is_empty() {
                    continue;
                }
                supported_by.retain(|justification| !justification.mentions(current));

                // the other premise no longer supports `dependent` through these pairs
                for justification in dropped {
                    let premise = justification.counterpart(current);
                    if !kept.iter().any(|other| other.mentions(premise)) {
                        self.store.remove_dependent(premise, dependent);
                    }
                }
                affected.insert(dependent);
            }

            for item in affected {
                if self.store.is_orphan(item) && !queue.contains(&item) {
                    queue.push_back(item);
                }
            }

            if self.store.remove(current) {
                removed.push(current);
                self.tracer.trace(&TraceEvent::Removed(current));
            }
            queue.pop_front();
        }

        // waiting derivations built on a deleted premise must not be installed
        self.backlog.retain(|pending| {
            pending.justification.map_or(true, |justification| {
                !removed.iter().any(|item| justification.mentions(*item))
            })
        });

        removed.len()
    }

    /// Returns every stored fact that unifies with `query`, with its bindings
    ///
    /// # Errors
    ///
    /// [`KbError::InvalidQuery`] if the query has an empty predicate.
    pub fn query(&self, query: &Statement) -> Result<Vec<Answer>> {
        if !query.is_well_formed() {
            return Err(KbError::InvalidQuery(query.to_string()));
        }

        Ok(self
            .store
            .fact_ids_for(&query.predicate)
            .into_iter()
            .filter_map(|id| self.store.fact(id))
            .filter_map(|fact| {
                match_statements(query, &fact.statement).map(|bindings| Answer {
                    bindings,
                    fact: fact.id,
                    statement: fact.statement.clone(),
                })
            })
            .collect())
    }

    /// Asks a fact-shaped sentence; rules cannot be asked
    ///
    /// # Errors
    ///
    /// [`KbError::InvalidQuery`] if `sentence` is a rule or is malformed.
    pub fn ask(&self, sentence: &Sentence) -> Result<Vec<Answer>> {
        match sentence {
            Sentence::Fact(statement) => self.query(statement),
            Sentence::Rule(implication) => Err(KbError::InvalidQuery(implication.to_string())),
        }
    }

    /// Returns whether any stored fact unifies with `statement`
    #[must_use]
    pub fn holds(&self, statement: &Statement) -> bool {
        self.query(statement)
            .is_ok_and(|answers| !answers.is_empty())
    }

    /// The stored fact equal to `statement`
    #[must_use]
    pub fn fact(&self, statement: &Statement) -> Option<&Fact> {
        self.store
            .find_fact(statement)
            .and_then(|id| self.store.fact(id))
    }

    /// The stored rule equal to `implication`
    #[must_use]
    pub fn rule(&self, implication: &Implication) -> Option<&Rule> {
        self.store
            .find_rule(implication)
            .and_then(|id| self.store.rule(id))
    }

    /// Looks a fact up by id
    #[must_use]
    pub fn fact_by_id(&self, id: FactId) -> Option<&Fact> {
        self.store.fact(id)
    }

    /// Looks a rule up by id
    #[must_use]
    pub fn rule_by_id(&self, id: RuleId) -> Option<&Rule> {
        self.store.rule(id)
    }

    /// All facts in insertion order
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.store.facts()
    }

    /// All rules in insertion order
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.store.rules()
    }

    /// Number of stored facts
    #[must_use]
    pub fn fact_count(&self) -> usize {
        self.store.fact_count()
    }

    /// Number of stored rules
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.store.rule_count()
    }

    /// True when nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fact_count() == 0 && self.rule_count() == 0
    }

    /// Reads sentences in the text syntax and asserts them in order
    ///
    /// # Errors
    ///
    /// [`KbError::Parse`] if any line is unreadable (nothing is asserted
    /// then), or any error of [`KnowledgeBase::assert`].
    #[cfg(feature = "parsing")]
    pub fn load(&mut self, source: &str) -> Result<()> {
        for sentence in crate::parse::parse_program(source)? {
            self.assert(sentence)?;
        }
        Ok(())
    }
}

impl fmt::Display for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Knowledge Base:")?;
        for fact in self.facts() {
            writeln!(f, "{}", Sentence::Fact(fact.statement.clone()))?;
        }
        for rule in self.rules() {
            writeln!(f, "{}", Sentence::Rule(rule.implication.clone()))?;
        }
        Ok(())
    }
}

fn validate(sentence: &Sentence) -> Result<()> {
    match sentence {
        Sentence::Fact(statement) => {
            if !statement.is_well_formed() {
                return Err(KbError::MalformedStatement(statement.to_string()));
            }
        }
        Sentence::Rule(implication) => {
            if implication.antecedents.is_empty() {
                return Err(KbError::EmptyAntecedents(implication.to_string()));
            }
            let malformed = implication
                .antecedents
                .iter()
                .chain(std::iter::once(&implication.consequent))
                .find(|statement| !statement.is_well_formed());
            if let Some(statement) = malformed {
                return Err(KbError::MalformedStatement(statement.to_string()));
            }
        }
    }
    Ok(())
}
