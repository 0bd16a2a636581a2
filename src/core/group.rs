use crate::core::error::{Result, SettleError};
use crate::core::party::{Participant, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Snapshot of a group's membership, in join order.
///
/// Member order is part of the contract: equal splits hand the
/// rounding remainder to the last member, so the same order must be
/// supplied every time for splits to be reproducible.
///
/// # Examples
///
/// ```
/// use settleup_engine::core::group::Group;
/// use settleup_engine::core::party::Participant;
///
/// let group = Group::from_participants("Trip", vec![
///     Participant::new("a", "Alice"),
///     Participant::new("b", "Bob"),
/// ]).unwrap();
///
/// assert_eq!(group.len(), 2);
/// assert_eq!(group.member_ids()[1].as_str(), "b");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Group {
    name: String,
    members: Vec<Participant>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Build a group from participants in join order.
    pub fn from_participants(
        name: impl Into<String>,
        participants: impl IntoIterator<Item = Participant>,
    ) -> Result<Self> {
        let mut group = Self::new(name);
        for p in participants {
            group.add_member(p)?;
        }
        Ok(group)
    }

    /// Append a member. Joining twice is a business rule violation.
    pub fn add_member(&mut self, participant: Participant) -> Result<()> {
        if self.is_member(&participant.id) {
            return Err(SettleError::business_rule(format!(
                "participant {} is already a member of group '{}'",
                participant.id, self.name
            )));
        }
        self.members.push(participant);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    /// Member ids in join order.
    pub fn member_ids(&self) -> Vec<ParticipantId> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }

    pub fn member_set(&self) -> HashSet<ParticipantId> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }

    pub fn is_member(&self, id: &ParticipantId) -> bool {
        self.members.iter().any(|m| &m.id == id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
