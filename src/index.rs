// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-mostly index built once from an authored catalog.
//!
//! [`GroupIndex::build`] interns every visible option and group, allocates
//! the per-group NONE/PARTIAL sentinel ids and resolves `requires` references
//! into a directed graph. Malformed definitions degrade (the offending entry
//! is skipped with a warning) instead of failing the whole catalog, so a
//! broken authoring change renders an incomplete picker rather than none.

use std::collections::{HashMap, HashSet};

use petgraph::algo::is_cyclic_directed;
use petgraph::prelude::DiGraphMap;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::catalog::GroupDef;
use crate::entry::{GroupId, OptionId};

/// Which of the two generated sentinels an id refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SentinelKind {
    None,
    Partial,
}

/// Generated sentinel id resolved back to its owning group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SentinelOwner {
    pub group: GroupId,
    pub kind: SentinelKind,
}

/// An interned group with its generated sentinel ids.
#[derive(Clone, Debug)]
pub struct GroupEntry {
    /// The group's authored id, which doubles as its ALL sentinel.
    pub id: String,
    pub label: String,

    /// Generated id representing the NONE state, stable for the lifetime of
    /// this index.
    pub none_sentinel: String,

    /// Generated id representing the PARTIAL state.
    pub partial_sentinel: String,

    /// Visible options in authored order.
    pub options: Vec<OptionId>,
}

/// An interned option with resolved requirements.
#[derive(Clone, Debug)]
pub struct OptionEntry {
    pub id: String,
    pub label: String,
    pub group: GroupId,

    /// Resolved requirement handles in authored order. Dangling and hidden
    /// references are dropped during the build.
    pub requires: Vec<OptionId>,

    pub always_selected: bool,
}

/// Immutable lookup structure over an authored catalog.
#[derive(Clone, Debug, Default)]
pub struct GroupIndex {
    groups: Vec<GroupEntry>,
    options: Vec<OptionEntry>,
    option_lookup: HashMap<String, OptionId>,
    group_lookup: HashMap<String, GroupId>,
    sentinel_lookup: HashMap<String, SentinelOwner>,
    requires_graph: DiGraphMap<OptionId, ()>,
}

impl GroupIndex {
    /// Build an index from authored group definitions.
    ///
    /// Definitions with an empty id, ids already taken by an earlier group or
    /// option, and `requires` references to unknown options are skipped with
    /// a warning. Hidden options are excluded entirely; references to them
    /// are treated as satisfied. The build never fails: a fully malformed
    /// catalog produces an empty index.
    pub fn build(defs: &[GroupDef]) -> GroupIndex {
        let mut index = GroupIndex::default();
        let mut hidden_ids: HashSet<String> = HashSet::new();
        let mut pending_requires: Vec<(OptionId, Vec<String>)> = Vec::new();

        for def in defs {
            if def.id.is_empty() {
                warn!("skipping group with empty id");
                continue;
            }
            if index.group_lookup.contains_key(&def.id) || index.option_lookup.contains_key(&def.id)
            {
                warn!(group = %def.id, "skipping group with duplicate id");
                continue;
            }

            let group_id = GroupId(index.groups.len() as u32);
            let mut entry = GroupEntry {
                id: def.id.clone(),
                label: def.label.clone(),
                none_sentinel: Uuid::new_v4().to_string(),
                partial_sentinel: Uuid::new_v4().to_string(),
                options: Vec::new(),
            };

            for option in &def.options {
                if option.hidden {
                    hidden_ids.insert(option.id.clone());
                    continue;
                }
                if option.id.is_empty() {
                    warn!(group = %def.id, "skipping option with empty id");
                    continue;
                }
                if index.option_lookup.contains_key(&option.id)
                    || index.group_lookup.contains_key(&option.id)
                    || option.id == def.id
                {
                    warn!(option = %option.id, "skipping option with duplicate id");
                    continue;
                }

                let option_id = OptionId(index.options.len() as u32);
                index.options.push(OptionEntry {
                    id: option.id.clone(),
                    label: option.label.clone(),
                    group: group_id,
                    requires: Vec::new(),
                    always_selected: option.always_selected,
                });
                index.option_lookup.insert(option.id.clone(), option_id);
                index.requires_graph.add_node(option_id);
                pending_requires.push((option_id, option.requires.clone()));
                entry.options.push(option_id);
            }

            index
                .sentinel_lookup
                .insert(entry.none_sentinel.clone(), SentinelOwner {
                    group: group_id,
                    kind: SentinelKind::None,
                });
            index
                .sentinel_lookup
                .insert(entry.partial_sentinel.clone(), SentinelOwner {
                    group: group_id,
                    kind: SentinelKind::Partial,
                });
            index.group_lookup.insert(def.id.clone(), group_id);
            index.groups.push(entry);
        }

        // Requirements can reference options from any group, so they resolve
        // only after every group has been interned.
        for (option_id, requires) in pending_requires {
            for required in requires {
                match index.option_lookup.get(&required) {
                    Some(&required_id) if required_id == option_id => {
                        warn!(option = %required, "ignoring self-requirement");
                    }
                    Some(&required_id) => {
                        index.options[option_id.0 as usize].requires.push(required_id);
                        index.requires_graph.add_edge(option_id, required_id, ());
                    }
                    None if hidden_ids.contains(&required) => {
                        // Hidden targets stay invisible and count as satisfied.
                        debug!(requirement = %required, "requirement targets a hidden option");
                    }
                    None => {
                        warn!(requirement = %required, "dropping dangling requirement");
                    }
                }
            }
        }

        if is_cyclic_directed(&index.requires_graph) {
            warn!("requirement graph contains at least one cycle");
        }

        index
    }

    /// All interned groups in authored order.
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &GroupEntry)> {
        self.groups
            .iter()
            .enumerate()
            .map(|(raw, entry)| (GroupId(raw as u32), entry))
    }

    /// All interned options in authored order.
    pub fn options(&self) -> impl Iterator<Item = (OptionId, &OptionEntry)> {
        self.options
            .iter()
            .enumerate()
            .map(|(raw, entry)| (OptionId(raw as u32), entry))
    }

    pub fn group(&self, id: GroupId) -> &GroupEntry {
        &self.groups[id.0 as usize]
    }

    pub fn option(&self, id: OptionId) -> &OptionEntry {
        &self.options[id.0 as usize]
    }

    /// Resolve an authored option id to its handle.
    pub fn option_id(&self, id: &str) -> Option<OptionId> {
        self.option_lookup.get(id).copied()
    }

    /// Resolve an authored group id to its handle.
    pub fn group_id(&self, id: &str) -> Option<GroupId> {
        self.group_lookup.get(id).copied()
    }

    /// Resolve a generated NONE/PARTIAL sentinel id to its owning group.
    pub fn sentinel_owner(&self, id: &str) -> Option<SentinelOwner> {
        self.sentinel_lookup.get(id).copied()
    }

    /// The requirement relation as a directed graph over option handles.
    pub fn requires_graph(&self) -> &DiGraphMap<OptionId, ()> {
        &self.requires_graph
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
