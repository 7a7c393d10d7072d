// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tri-state grouped multi-select engine with dependency resolution.
//!
//! Options are organized into groups, each group deriving an ALL, PARTIAL or
//! NONE state from the selection. Options can require other options; the
//! engine keeps that relation consistent by computing the transitive set of
//! missing requirements when something is checked and the reverse set of
//! dependents when something is unchecked, driving a confirmation workflow
//! through an external dialog collaborator.
//!
//! The crate owns no rendering, persistence or i18n content. Hosts bind a
//! flat list of string ids (option ids plus fully selected group ids),
//! implement the [`traits::ConfirmationDialog`] and [`traits::LabelResolver`]
//! contracts and drive a [`SelectionController`] from their UI events.

mod catalog;
mod controller;
mod entry;
pub mod graph;
mod index;
mod selection;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod traits;

pub use catalog::{GroupDef, OptionDef};
pub use controller::{
    Commit, ControllerError, PromptButtons, PromptRequest, PromptResponse, SecondaryAction,
    SelectionController, tokens,
};
pub use entry::{GroupId, GroupSelectionState, OptionId, SelectionEntry};
pub use graph::{Dependent, DemotionImpact};
pub use index::{GroupEntry, GroupIndex, OptionEntry, SentinelKind, SentinelOwner};
pub use selection::Selection;
