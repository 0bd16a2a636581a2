//! Contracts for the collaborators that feed the engine.
//!
//! The engine owns no storage. A participant directory resolves display
//! names for reports and an expense provider hands over the recorded
//! expenses of a group, already checked for referential integrity.

use crate::core::expense::{ExpenseRecord, ExpenseSet};
use crate::core::group::Group;
use crate::core::party::ParticipantId;
use std::collections::{BTreeMap, HashMap};

/// Read-only lookup of participant display names.
pub trait ParticipantDirectory {
    fn display_name(&self, id: &ParticipantId) -> Option<String>;
}

impl ParticipantDirectory for HashMap<ParticipantId, String> {
    fn display_name(&self, id: &ParticipantId) -> Option<String> {
        self.get(id).cloned()
    }
}

impl ParticipantDirectory for Group {
    fn display_name(&self, id: &ParticipantId) -> Option<String> {
        self.members()
            .iter()
            .find(|m| &m.id == id)
            .map(|m| m.name.clone())
    }
}

/// Source of the recorded expenses for a group.
pub trait ExpenseProvider {
    /// All expenses of `group`; empty when the group is unknown.
    fn expenses_for(&self, group: &str) -> Vec<ExpenseRecord>;
}

/// In-memory store keyed by group name.
impl ExpenseProvider for BTreeMap<String, ExpenseSet> {
    fn expenses_for(&self, group: &str) -> Vec<ExpenseRecord> {
        self.get(group)
            .map(|set| set.expenses().to_vec())
            .unwrap_or_default()
    }
}
