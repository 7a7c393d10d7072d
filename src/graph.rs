// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graph functions for resolving option requirements against a selection.

use std::collections::HashSet;

use petgraph::Direction;

use crate::entry::{GroupId, OptionId, SelectionEntry};
use crate::index::GroupIndex;
use crate::selection::Selection;

/// Something in the current selection that depends on a given option.
///
/// A fully selected group counts as a single dependent, regardless of how
/// many of its options carry the requirement; removing the dependency means
/// unchecking the group as a whole.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dependent {
    Option(OptionId),
    Group(GroupId),
}

/// Everything a demotion away from a group's ALL state would strand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DemotionImpact {
    /// Options of the demoted group which something still depends on. These
    /// are the candidates for a "keep only what is required" resolution.
    pub required_group_options: Vec<OptionId>,

    /// Union of the dependents across all retained options, in discovery
    /// order, for display in the confirmation prompt.
    pub dependents: Vec<Dependent>,
}

/// Recursively collect unsatisfied transitive requirements of one option.
///
/// Outgoing edges iterate in insertion order, which the index builder fills
/// in authored order, so discovery order is stable.
fn walk_requirements(
    index: &GroupIndex,
    selection: &Selection,
    option: OptionId,
    visited: &mut HashSet<OptionId>,
    missing: &mut Vec<OptionId>,
) {
    let required: Vec<OptionId> = index
        .requires_graph()
        .neighbors_directed(option, Direction::Outgoing)
        .collect();
    for required in required {
        if !visited.insert(required) {
            continue;
        }
        if selection.is_option_satisfied(required, index) {
            // Satisfied requirements are not walked further; their own
            // requirements were resolved when they were selected.
            continue;
        }
        missing.push(required);
        walk_requirements(index, selection, required, visited, missing);
    }
}

/// All transitively required options of `option` which the selection does not
/// yet satisfy, in pre-order discovery order and free of duplicates.
///
/// The origin option is seeded into the visited set, so cyclic requirement
/// chains terminate without reporting the origin back to itself.
pub fn missing_requirements(
    index: &GroupIndex,
    selection: &Selection,
    option: OptionId,
) -> Vec<OptionId> {
    let mut visited = HashSet::from([option]);
    let mut missing = Vec::new();
    walk_requirements(index, selection, option, &mut visited, &mut missing);
    missing
}

/// Batched [`missing_requirements`] across several origins sharing one
/// visited set, so requirements common to multiple origins appear once.
pub fn missing_requirements_batch(
    index: &GroupIndex,
    selection: &Selection,
    options: &[OptionId],
) -> Vec<OptionId> {
    let mut visited: HashSet<OptionId> = options.iter().copied().collect();
    let mut missing = Vec::new();
    for &option in options {
        walk_requirements(index, selection, option, &mut visited, &mut missing);
    }
    missing
}

/// Everything in the current selection that directly requires `target`.
///
/// Individually selected options are reported one by one; a group selected
/// through its ALL sentinel is reported once if any of its options carries
/// the requirement. Results follow catalog order, so prompt item order is
/// deterministic.
pub fn required_by(
    index: &GroupIndex,
    selection: &Selection,
    target: OptionId,
) -> Vec<Dependent> {
    let mut dependents = Vec::new();

    for source in index
        .requires_graph()
        .neighbors_directed(target, Direction::Incoming)
    {
        let dependent = if selection.contains(SelectionEntry::Option(source)) {
            Dependent::Option(source)
        } else {
            let group = index.option(source).group;
            if !selection.contains(SelectionEntry::GroupAll(group)) {
                continue;
            }
            Dependent::Group(group)
        };
        if !dependents.contains(&dependent) {
            dependents.push(dependent);
        }
    }

    dependents
}

/// Compute which options of a fully selected group must be retained when the
/// group is demoted to a single chosen option.
///
/// Every option other than `chosen` is checked for dependents in the current
/// selection; options with at least one dependent land in
/// [`DemotionImpact::required_group_options`].
pub fn group_demotion_impact(
    index: &GroupIndex,
    selection: &Selection,
    group: GroupId,
    chosen: OptionId,
) -> DemotionImpact {
    let mut impact = DemotionImpact::default();

    for &option in &index.group(group).options {
        if option == chosen {
            continue;
        }
        let dependents = required_by(index, selection, option);
        if dependents.is_empty() {
            continue;
        }
        impact.required_group_options.push(option);
        for dependent in dependents {
            if !impact.dependents.contains(&dependent) {
                impact.dependents.push(dependent);
            }
        }
    }

    impact
}
