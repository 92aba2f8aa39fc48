//! Fact conditions (spec §4.1, C2): a disjunction over a single fact name,
//! nested on a stack during import, evaluated against the process's fact map
//! at ingest time (spec invariant 4).

use std::collections::{BTreeMap, BTreeSet};

use crate::engine::error::EngineError;

/// A single `#if fact == v1 | v2 | ...` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactCondition {
    /// Name of the fact this condition tests.
    pub fact_name: String,
    /// The disjunction of values that satisfy this condition.
    pub allowed_values: BTreeSet<String>,
}

impl FactCondition {
    /// Create a condition from an already-split list of allowed values.
    #[must_use]
    pub fn new(fact_name: impl Into<String>, allowed_values: Vec<String>) -> Self {
        Self {
            fact_name: fact_name.into(),
            allowed_values: allowed_values.into_iter().collect(),
        }
    }
}

/// The stack of nested fact conditions in effect at an import point. Empty
/// for elements outside any `#if` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionStack(Vec<FactCondition>);

impl ConditionStack {
    /// An empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Push a condition, enforcing that the same fact name is never nested
    /// within itself (spec §4.1).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Ingest`]-shaped error text if `condition`'s
    /// fact name already appears in the stack.
    pub fn push(&mut self, condition: FactCondition) -> Result<(), String> {
        if self.0.iter().any(|c| c.fact_name == condition.fact_name) {
            return Err(format!(
                "fact '{}' is already open on this #if stack",
                condition.fact_name
            ));
        }
        self.0.push(condition);
        Ok(())
    }

    /// Pop the innermost condition; called on `#endif`.
    pub fn pop(&mut self) -> Option<FactCondition> {
        self.0.pop()
    }

    /// Nesting depth, used to annotate [`crate::engine::location::StorageLocation`].
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Whether `facts` satisfies every condition on the stack (spec §4.1).
    /// A missing fact always fails; an empty-string fact value is rejected
    /// by [`FactMap::insert`] so absence is never ambiguous with `""`.
    #[must_use]
    pub fn is_satisfied_by(&self, facts: &FactMap) -> bool {
        self.0.iter().all(|cond| {
            facts
                .get(&cond.fact_name)
                .is_some_and(|v| cond.allowed_values.contains(v))
        })
    }

    /// Conditions from outermost to innermost.
    #[must_use]
    pub fn conditions(&self) -> &[FactCondition] {
        &self.0
    }
}

/// The process's fact map. Facts may only be added, never redefined (spec
/// invariant 4); empty-string values are rejected so a missing fact is never
/// confusable with a present-but-empty one.
#[derive(Debug, Clone, Default)]
pub struct FactMap(BTreeMap<String, String>);

impl FactMap {
    /// An empty fact map.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Parse `AVCONFIG2_ADD_FACTS`-style input: `key=value;key=value` pairs
    /// using the same nested-aware split primitive as the rest of the
    /// universal grammar.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError::Ingest`]-shaped error for a malformed pair
    /// or a redefinition attempt.
    pub fn parse_add_facts(input: &str) -> Result<Self, String> {
        let mut map = Self::new();
        for pair in crate::engine::value::split_nested_aware(input, ';') {
            let (k, v) = pair
                .split_once('=')
                .ok_or_else(|| format!("malformed fact definition '{pair}'"))?;
            map.insert(k.trim(), v.trim())?;
        }
        Ok(map)
    }

    /// Add a fact, rejecting redefinition (spec invariant 4) and empty
    /// values (spec §4.1).
    ///
    /// # Errors
    ///
    /// Returns a message describing why the fact could not be inserted.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<(), String> {
        let name = name.into();
        let value = value.into();
        if value.is_empty() {
            return Err(format!("fact '{name}' may not be the empty string"));
        }
        if let Some(existing) = self.0.get(&name) {
            if existing != &value {
                return Err(format!(
                    "fact '{name}' already defined as '{existing}', cannot redefine as '{value}'"
                ));
            }
            return Ok(());
        }
        self.0.insert(name, value);
        Ok(())
    }

    /// Look up a fact's current value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&String> {
        self.0.get(name)
    }
}
