//! Ordered fact and rule collections with stable identifiers.
//!
//! Identifiers are handed out from a counter that never goes backwards, so a
//! justification can never come to name a newer item than the one it was
//! recorded against.

use crate::term::{Implication, Statement};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier of a stored fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactId(pub(crate) usize);

/// Stable identifier of a stored rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleId(pub(crate) usize);

/// A fact or a rule, by identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ItemId {
    /// A fact
    Fact(FactId),
    /// A rule
    Rule(RuleId),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fact(FactId(id)) => write!(f, "fact#{id}"),
            Self::Rule(RuleId(id)) => write!(f, "rule#{id}"),
        }
    }
}

/// One inference step that produced an item: this fact resolved against this rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Justification {
    /// The supporting fact
    pub fact: FactId,
    /// The supporting rule
    pub rule: RuleId,
}

impl Justification {
    /// True when either half of the pair is `item`
    #[must_use]
    pub fn mentions(&self, item: ItemId) -> bool {
        match item {
            ItemId::Fact(id) => self.fact == id,
            ItemId::Rule(id) => self.rule == id,
        }
    }

    /// The half of the pair that is not `item`
    #[must_use]
    pub fn counterpart(&self, item: ItemId) -> ItemId {
        match item {
            ItemId::Fact(_) => ItemId::Rule(self.rule),
            ItemId::Rule(_) => ItemId::Fact(self.fact),
        }
    }
}

/// A stored fact
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fact {
    /// Identifier
    pub id: FactId,
    /// What the fact says
    pub statement: Statement,
    /// Declared true by the caller, independent of any derivation
    pub asserted: bool,
    /// Derivations of this fact
    pub supported_by: IndexSet<Justification>,
    /// Items derived using this fact as a premise
    pub dependents: IndexSet<ItemId>,
}

/// A stored rule
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rule {
    /// Identifier
    pub id: RuleId,
    /// Antecedents and consequent
    pub implication: Implication,
    /// Declared true by the caller, independent of any derivation
    pub asserted: bool,
    /// Derivations of this rule
    pub supported_by: IndexSet<Justification>,
    /// Items derived using this rule as a premise
    pub dependents: IndexSet<ItemId>,
}

impl Rule {
    /// The antecedents, in resolution order
    #[must_use]
    pub fn antecedents(&self) -> &[Statement] {
        &self.implication.antecedents
    }

    /// The consequent
    #[must_use]
    pub fn consequent(&self) -> &Statement {
        &self.implication.consequent
    }
}

/// Facts and rules keyed by id, with structural lookup and predicate indexes
#[derive(Debug, Default)]
pub(crate) struct Store {
    next_id: usize,
    facts: IndexMap<FactId, Fact>,
    rules: IndexMap<RuleId, Rule>,
    fact_lookup: HashMap<Statement, FactId>,
    rule_lookup: HashMap<Implication, RuleId>,
    /// Facts grouped by predicate, in insertion order
    facts_by_pred: IndexMap<String, IndexSet<FactId>>,
    /// Rules grouped by the predicate of their first antecedent
    rules_by_pred: IndexMap<String, IndexSet<RuleId>>,
}

impl Store {
    fn fresh_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn find_fact(&self, statement: &Statement) -> Option<FactId> {
        self.fact_lookup.get(statement).copied()
    }

    pub(crate) fn find_rule(&self, implication: &Implication) -> Option<RuleId> {
        self.rule_lookup.get(implication).copied()
    }

    pub(crate) fn fact(&self, id: FactId) -> Option<&Fact> {
        self.facts.get(&id)
    }

    pub(crate) fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(&id)
    }

    pub(crate) fn fact_mut(&mut self, id: FactId) -> Option<&mut Fact> {
        self.facts.get_mut(&id)
    }

    pub(crate) fn rule_mut(&mut self, id: RuleId) -> Option<&mut Rule> {
        self.rules.get_mut(&id)
    }

    pub(crate) fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.facts.values()
    }

    pub(crate) fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    pub(crate) fn fact_count(&self) -> usize {
        self.facts.len()
    }

    pub(crate) fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Facts that could unify with a statement of this predicate
    pub(crate) fn fact_ids_for(&self, predicate: &str) -> Vec<FactId> {
        self.facts_by_pred
            .get(predicate)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Rules whose first antecedent could unify with a fact of this predicate
    pub(crate) fn rule_ids_for(&self, predicate: &str) -> Vec<RuleId> {
        self.rules_by_pred
            .get(predicate)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    pub(crate) fn insert_fact(
        &mut self,
        statement: Statement,
        asserted: bool,
        supported_by: IndexSet<Justification>,
    ) -> FactId {
        let id = FactId(self.fresh_id());
        self.fact_lookup.insert(statement.clone(), id);
        self.facts_by_pred
            .entry(statement.predicate.clone())
            .or_default()
            .insert(id);
        self.facts.insert(
            id,
            Fact {
                id,
                statement,
                asserted,
                supported_by,
                dependents: IndexSet::new(),
            },
        );
        id
    }

    /// Inserts a rule; `implication` must have at least one antecedent
    pub(crate) fn insert_rule(
        &mut self,
        implication: Implication,
        asserted: bool,
        supported_by: IndexSet<Justification>,
    ) -> RuleId {
        let id = RuleId(self.fresh_id());
        self.rule_lookup.insert(implication.clone(), id);
        if let Some(first) = implication.antecedents.first() {
            self.rules_by_pred
                .entry(first.predicate.clone())
                .or_default()
                .insert(id);
        }
        self.rules.insert(
            id,
            Rule {
                id,
                implication,
                asserted,
                supported_by,
                dependents: IndexSet::new(),
            },
        );
        id
    }

    pub(crate) fn supported_by_mut(&mut self, item: ItemId) -> Option<&mut IndexSet<Justification>> {
        match item {
            ItemId::Fact(id) => self.fact_mut(id).map(|fact| &mut fact.supported_by),
            ItemId::Rule(id) => self.rule_mut(id).map(|rule| &mut rule.supported_by),
        }
    }

    pub(crate) fn dependents(&self, item: ItemId) -> Vec<ItemId> {
        let dependents = match item {
            ItemId::Fact(id) => self.fact(id).map(|fact| &fact.dependents),
            ItemId::Rule(id) => self.rule(id).map(|rule| &rule.dependents),
        };
        dependents
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub(crate) fn add_dependent(&mut self, premise: ItemId, dependent: ItemId) {
        let dependents = match premise {
            ItemId::Fact(id) => self.fact_mut(id).map(|fact| &mut fact.dependents),
            ItemId::Rule(id) => self.rule_mut(id).map(|rule| &mut rule.dependents),
        };
        if let Some(dependents) = dependents {
            dependents.insert(dependent);
        }
    }

    pub(crate) fn remove_dependent(&mut self, premise: ItemId, dependent: ItemId) {
        let dependents = match premise {
            ItemId::Fact(id) => self.fact_mut(id).map(|fact| &mut fact.dependents),
            ItemId::Rule(id) => self.rule_mut(id).map(|rule| &mut rule.dependents),
        };
        if let Some(dependents) = dependents {
            dependents.shift_remove(&dependent);
        }
    }

    /// Stored, not asserted, and without any remaining justification
    pub(crate) fn is_orphan(&self, item: ItemId) -> bool {
        match item {
            ItemId::Fact(id) => self
                .fact(id)
                .is_some_and(|fact| !fact.asserted && fact.supported_by.is_empty()),
            ItemId::Rule(id) => self
                .rule(id)
                .is_some_and(|rule| !rule.asserted && rule.supported_by.is_empty()),
        }
    }

    /// Deletes an item and unhooks it from the lookup tables; order of the
    /// remaining items is preserved
    pub(crate) fn remove(&mut self, item: ItemId) -> bool {
        match item {
            ItemId::Fact(id) => {
                let Some(fact) = self.facts.shift_remove(&id) else {
                    return false;
                };
                self.fact_lookup.remove(&fact.statement);
                if let Some(ids) = self.facts_by_pred.get_mut(&fact.statement.predicate) {
                    ids.shift_remove(&id);
                }
                true
            }
            ItemId::Rule(id) => {
                let Some(rule) = self.rules.shift_remove(&id) else {
                    return false;
                };
                self.rule_lookup.remove(&rule.implication);
                if let Some(first) = rule.implication.antecedents.first() {
                    if let Some(ids) = self.rules_by_pred.get_mut(&first.predicate) {
                        ids.shift_remove(&id);
                    }
                }
                true
            }
        }
    }
}
