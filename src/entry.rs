// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed selection entries.
//!
//! The selection set holds real options and per-group sentinels in one
//! collection. Keeping them as a tagged union rules out collisions between
//! option ids and generated sentinel ids; the flat string representation only
//! exists at the external boundary (see [`Selection`](crate::Selection)).

use serde::{Deserialize, Serialize};

/// Interned handle for a visible option.
///
/// Handles are allocated by [`GroupIndex::build`](crate::GroupIndex::build)
/// and are only meaningful together with the index that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OptionId(pub(crate) u32);

/// Interned handle for a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub(crate) u32);

/// A single member of the selection set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SelectionEntry {
    /// An individually selected option.
    Option(OptionId),

    /// The group is fully selected; its child options are not enumerated
    /// while this entry is present.
    GroupAll(GroupId),

    /// None of the group's options are selected.
    GroupNone(GroupId),

    /// Some but not all of the group's options are selected.
    GroupPartial(GroupId),
}

impl SelectionEntry {
    /// Return `true` if this entry is a real option, not a group sentinel.
    pub fn is_option(&self) -> bool {
        matches!(self, SelectionEntry::Option(_))
    }

    /// The group a sentinel entry belongs to, if this is a sentinel.
    pub fn sentinel_group(&self) -> Option<GroupId> {
        match self {
            SelectionEntry::Option(_) => None,
            SelectionEntry::GroupAll(group)
            | SelectionEntry::GroupNone(group)
            | SelectionEntry::GroupPartial(group) => Some(*group),
        }
    }
}

/// The visual state of a group derived from the selection set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupSelectionState {
    /// The group's ALL sentinel is present.
    All,

    /// At least one of the group's options is selected.
    Partial,

    /// No option of the group is selected.
    None,
}

impl GroupSelectionState {
    /// The sentinel entry matching this state for the given group.
    pub fn sentinel(&self, group: GroupId) -> SelectionEntry {
        match self {
            GroupSelectionState::All => SelectionEntry::GroupAll(group),
            GroupSelectionState::Partial => SelectionEntry::GroupPartial(group),
            GroupSelectionState::None => SelectionEntry::GroupNone(group),
        }
    }
}
