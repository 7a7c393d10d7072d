// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authored definitions for grouped option catalogs.
//!
//! A catalog is a list of [`GroupDef`]s, each owning a list of [`OptionDef`]s.
//! Catalogs are authored data (usually deserialized from host application
//! configuration) and are never mutated at runtime; the engine consumes them
//! once through [`GroupIndex::build`](crate::GroupIndex::build).

use serde::{Deserialize, Serialize};

/// A selectable option belonging to exactly one group.
///
/// Option ids are globally unique across the whole catalog, not only within
/// their owning group. The `requires` list references other options by id and
/// expresses a directed "this option depends on" relation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDef {
    /// Globally unique identifier.
    pub id: String,

    /// Display label, typically an i18n token resolved by the host.
    pub label: String,

    /// Ids of options this option depends on.
    #[serde(default)]
    pub requires: Vec<String>,

    /// Hidden options are excluded from the index and from group state
    /// calculations but remain valid, auto-satisfied `requires` targets.
    #[serde(default)]
    pub hidden: bool,

    /// Always-selected options are re-inserted whenever the bound value is
    /// replaced and cannot be removed by normal toggling.
    #[serde(default)]
    pub always_selected: bool,
}

impl OptionDef {
    /// Create a visible option with no requirements.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            requires: Vec::new(),
            hidden: false,
            always_selected: false,
        }
    }

    /// Attach requirement ids to this option.
    pub fn with_requires<I, S>(mut self, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires = requires.into_iter().map(Into::into).collect();
        self
    }

    /// Mark this option as hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Mark this option as always-selected.
    pub fn always_selected(mut self) -> Self {
        self.always_selected = true;
        self
    }
}

/// A named group of options.
///
/// The group id doubles as the group's "fully selected" sentinel in emitted
/// values, so it shares the global id namespace with option ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDef {
    /// Globally unique identifier, also used as the ALL sentinel.
    pub id: String,

    /// Display label, typically an i18n token resolved by the host.
    pub label: String,

    /// Options owned by this group.
    #[serde(default)]
    pub options: Vec<OptionDef>,
}

impl GroupDef {
    /// Create an empty group.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            options: Vec::new(),
        }
    }

    /// Append an option to this group.
    pub fn option(mut self, option: OptionDef) -> Self {
        self.options.push(option);
        self
    }
}
