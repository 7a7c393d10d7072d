// SPDX-License-Identifier: MIT OR Apache-2.0

//! Selection set and tri-state group resolution.
//!
//! A [`Selection`] holds typed entries: individually selected options plus
//! one sentinel per group describing its ALL/PARTIAL/NONE state. All
//! mutations are synchronous and deterministic; [`Selection::normalize`]
//! re-establishes the sentinel invariants after any batch of changes.

use std::collections::HashSet;

use tracing::{trace, warn};

use crate::entry::{GroupId, GroupSelectionState, OptionId, SelectionEntry};
use crate::index::{GroupIndex, SentinelKind};

/// The set of currently checked entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    entries: HashSet<SelectionEntry>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Project an external flat id list into a typed selection.
    ///
    /// Accepts option ids, group ids (meaning the group's ALL state) and
    /// generated NONE/PARTIAL sentinel ids. Unknown ids are dropped with a
    /// warning; they usually point at catalog drift between the host and the
    /// stored value.
    pub fn from_values(index: &GroupIndex, values: &[String]) -> Self {
        let mut selection = Selection::new();
        selection.add_entries(index, Self::resolve_values(index, values));
        selection
    }

    /// Resolve external ids to typed entries, dropping unknown ids.
    pub fn resolve_values(index: &GroupIndex, values: &[String]) -> Vec<SelectionEntry> {
        let mut entries = Vec::new();
        for value in values {
            if let Some(option) = index.option_id(value) {
                entries.push(SelectionEntry::Option(option));
            } else if let Some(group) = index.group_id(value) {
                entries.push(SelectionEntry::GroupAll(group));
            } else if let Some(owner) = index.sentinel_owner(value) {
                entries.push(match owner.kind {
                    SentinelKind::None => SelectionEntry::GroupNone(owner.group),
                    SentinelKind::Partial => SelectionEntry::GroupPartial(owner.group),
                });
            } else {
                warn!(id = %value, "dropping unknown id from bound value");
            }
        }
        entries
    }

    pub fn contains(&self, entry: SelectionEntry) -> bool {
        self.entries.contains(&entry)
    }

    pub fn insert(&mut self, entry: SelectionEntry) -> bool {
        self.entries.insert(entry)
    }

    pub fn remove(&mut self, entry: SelectionEntry) -> bool {
        self.entries.remove(&entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectionEntry> {
        self.entries.iter()
    }

    /// `true` if the option is present as an individual entry.
    pub fn is_option_selected(&self, option: OptionId) -> bool {
        self.contains(SelectionEntry::Option(option))
    }

    /// `true` if the option is selected individually or covered by its
    /// group's ALL sentinel.
    pub fn is_option_satisfied(&self, option: OptionId, index: &GroupIndex) -> bool {
        self.is_option_selected(option)
            || self.contains(SelectionEntry::GroupAll(index.option(option).group))
    }

    /// Individually selected options of a group, in catalog order.
    pub fn selected_options(&self, index: &GroupIndex, group: GroupId) -> Vec<OptionId> {
        index
            .group(group)
            .options
            .iter()
            .copied()
            .filter(|&option| self.is_option_selected(option))
            .collect()
    }

    /// Derive a group's tri-state from the selection.
    ///
    /// ALL only when the group's own sentinel is present; individually
    /// selecting every child keeps the group PARTIAL until the group itself
    /// is toggled.
    pub fn group_state(&self, index: &GroupIndex, group: GroupId) -> GroupSelectionState {
        if self.contains(SelectionEntry::GroupAll(group)) {
            GroupSelectionState::All
        } else if self.selected_options(index, group).is_empty() {
            GroupSelectionState::None
        } else {
            GroupSelectionState::Partial
        }
    }

    /// Re-establish the one-sentinel-per-group invariant.
    ///
    /// For every group exactly the sentinel matching its derived state is
    /// kept; an active ALL sentinel additionally evicts the group's
    /// individual child entries.
    pub fn normalize(&mut self, index: &GroupIndex) {
        for (group, entry) in index.groups() {
            if self.contains(SelectionEntry::GroupAll(group)) {
                self.entries.remove(&SelectionEntry::GroupNone(group));
                self.entries.remove(&SelectionEntry::GroupPartial(group));
                for &option in &entry.options {
                    self.entries.remove(&SelectionEntry::Option(option));
                }
                continue;
            }

            let state = self.group_state(index, group);
            trace!(group = %entry.id, ?state, "normalized group");
            match state {
                GroupSelectionState::Partial => {
                    self.entries.remove(&SelectionEntry::GroupNone(group));
                    self.entries.insert(SelectionEntry::GroupPartial(group));
                }
                GroupSelectionState::None => {
                    self.entries.remove(&SelectionEntry::GroupPartial(group));
                    self.entries.insert(SelectionEntry::GroupNone(group));
                }
                GroupSelectionState::All => unreachable!("ALL handled above"),
            }
        }
    }

    /// Insert entries, letting an ALL entry supersede individual picks.
    ///
    /// Adding an already-present entry is a no-op, so the operation is
    /// idempotent.
    pub fn add_entries<I>(&mut self, index: &GroupIndex, entries: I)
    where
        I: IntoIterator<Item = SelectionEntry>,
    {
        for entry in entries {
            if let SelectionEntry::GroupAll(group) = entry {
                self.set_group_all(index, group);
            } else {
                self.entries.insert(entry);
            }
        }
    }

    /// Insert options by handle.
    pub fn add_options(&mut self, index: &GroupIndex, options: &[OptionId]) {
        self.add_entries(index, options.iter().map(|&option| SelectionEntry::Option(option)));
    }

    /// Switch a group to its ALL state, evicting individual child entries
    /// and the NONE/PARTIAL sentinels.
    pub fn set_group_all(&mut self, index: &GroupIndex, group: GroupId) {
        self.entries.insert(SelectionEntry::GroupAll(group));
        self.entries.remove(&SelectionEntry::GroupNone(group));
        self.entries.remove(&SelectionEntry::GroupPartial(group));
        for &option in &index.group(group).options {
            self.entries.remove(&SelectionEntry::Option(option));
        }
    }

    /// Switch a group to its NONE state, clearing the ALL sentinel and every
    /// individual child entry.
    pub fn set_group_none(&mut self, index: &GroupIndex, group: GroupId) {
        self.entries.remove(&SelectionEntry::GroupAll(group));
        self.entries.remove(&SelectionEntry::GroupPartial(group));
        self.entries.insert(SelectionEntry::GroupNone(group));
        for &option in &index.group(group).options {
            self.entries.remove(&SelectionEntry::Option(option));
        }
    }

    /// Expand a group's ALL state into individually selected children.
    ///
    /// Toggling a single child of a fully selected group needs the full
    /// child list materialized first, so the result is "all options except
    /// the toggled one" rather than an empty group.
    pub fn materialize_group(&mut self, index: &GroupIndex, group: GroupId) {
        if !self.entries.remove(&SelectionEntry::GroupAll(group)) {
            return;
        }
        for &option in &index.group(group).options {
            self.entries.insert(SelectionEntry::Option(option));
        }
    }

    /// Re-insert always-selected options that the current selection does not
    /// satisfy. Called whenever the bound value is replaced wholesale.
    pub fn initialize_default_values(&mut self, index: &GroupIndex) {
        for (option, entry) in index.options() {
            if entry.always_selected && !self.is_option_satisfied(option, index) {
                trace!(option = %entry.id, "re-inserting always-selected option");
                self.entries.insert(SelectionEntry::Option(option));
            }
        }
    }

    /// Project to the committed external value: individually selected option
    /// ids plus the group ids of fully selected groups. Generated sentinels
    /// never appear here.
    ///
    /// Group ids come first in catalog order, then option ids in catalog
    /// order, so the emitted array is stable for persistence diffing.
    pub fn to_values(&self, index: &GroupIndex) -> Vec<String> {
        let mut values = Vec::new();
        for (group, entry) in index.groups() {
            if self.contains(SelectionEntry::GroupAll(group)) {
                values.push(entry.id.clone());
            }
        }
        for (option, entry) in index.options() {
            if self.is_option_selected(option) {
                values.push(entry.id.clone());
            }
        }
        values
    }

    /// Project to the open-panel display value, which additionally carries
    /// the generated NONE/PARTIAL sentinel ids so group rows can render
    /// radio-like state.
    pub fn to_display_values(&self, index: &GroupIndex) -> Vec<String> {
        let mut values = Vec::new();
        for (group, entry) in index.groups() {
            if self.contains(SelectionEntry::GroupAll(group)) {
                values.push(entry.id.clone());
            } else if self.contains(SelectionEntry::GroupPartial(group)) {
                values.push(entry.partial_sentinel.clone());
            } else if self.contains(SelectionEntry::GroupNone(group)) {
                values.push(entry.none_sentinel.clone());
            }
            for &option in &entry.options {
                if self.is_option_selected(option) {
                    values.push(index.option(option).id.clone());
                }
            }
        }
        values
    }
}
