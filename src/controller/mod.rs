// SPDX-License-Identifier: MIT OR Apache-2.0

//! Confirmation workflow around selection mutations.
//!
//! The controller owns one [`Selection`] and one [`GroupIndex`] and funnels
//! every user interaction through the dependency resolver. Interactions that
//! strand or miss requirements suspend on the [`ConfirmationDialog`]
//! collaborator; everything else applies synchronously. At most one prompt
//! is open at a time, cancellation never partially applies, and every
//! accepted outcome ends in a normalize-and-commit step.

use thiserror::Error;
use tracing::{debug, warn};

use crate::entry::{GroupId, GroupSelectionState, OptionId, SelectionEntry};
use crate::graph::{self, Dependent};
use crate::index::GroupIndex;
use crate::selection::Selection;
use crate::traits::{ConfirmationDialog, LabelResolver};

mod prompt;
#[cfg(test)]
mod tests;

pub use prompt::{PromptButtons, PromptRequest, PromptResponse, SecondaryAction, tokens};

/// Interaction errors. All of these point at host programming mistakes; user
/// cancellation is not an error and data problems degrade inside the index
/// builder instead.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// A prompt is still awaiting its response.
    #[error("an interaction is already awaiting a prompt response")]
    Busy,

    #[error("unknown option id: {0}")]
    UnknownOption(String),

    #[error("unknown group id: {0}")]
    UnknownGroup(String),

    /// The option cannot be toggled individually while its group is fully
    /// selected; the group has to be demoted or materialized first.
    #[error("option {option} is covered by fully selected group {group}")]
    CoveredByGroup { option: String, group: String },

    #[error("option {option} does not belong to group {group}")]
    NotInGroup { option: String, group: String },

    /// Demotion is only defined for a group in its ALL state.
    #[error("group {0} is not fully selected")]
    NotFullySelected(String),
}

/// Result of a committed interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    /// The external value: option ids plus fully selected group ids.
    pub value: Vec<String>,

    /// Whether the value differs from the previously emitted one.
    pub changed: bool,
}

/// Drives the tri-state selection and its confirmation workflow.
pub struct SelectionController<D, L> {
    index: GroupIndex,
    selection: Selection,
    dialog: D,
    labels: L,
    busy: bool,
    last_value: Vec<String>,
}

impl<D, L> SelectionController<D, L>
where
    D: ConfirmationDialog,
    L: LabelResolver,
{
    /// Create a controller with an empty selection. Always-selected options
    /// are applied immediately.
    pub fn new(index: GroupIndex, dialog: D, labels: L) -> Self {
        let mut selection = Selection::new();
        selection.initialize_default_values(&index);
        selection.normalize(&index);
        let last_value = selection.to_values(&index);
        Self {
            index,
            selection,
            dialog,
            labels,
            busy: false,
            last_value,
        }
    }

    pub fn index(&self) -> &GroupIndex {
        &self.index
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// `true` while a prompt is awaiting its response; hosts should disable
    /// input for the duration.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The current committed external value.
    pub fn value(&self) -> Vec<String> {
        self.selection.to_values(&self.index)
    }

    /// The open-panel projection including generated group sentinels.
    pub fn display_values(&self) -> Vec<String> {
        self.selection.to_display_values(&self.index)
    }

    /// Tri-state of a group, for rendering its row.
    pub fn group_state(&self, group_id: &str) -> Result<GroupSelectionState, ControllerError> {
        let group = self.group_handle(group_id)?;
        Ok(self.selection.group_state(&self.index, group))
    }

    /// Normalize and return the display projection; called when the host
    /// opens the picker panel.
    pub fn open_panel(&mut self) -> Result<Vec<String>, ControllerError> {
        self.guard()?;
        self.selection.normalize(&self.index);
        let values = self.selection.to_display_values(&self.index);
        self.busy = false;
        Ok(values)
    }

    /// Strip the display projection back to the committed value; called when
    /// the host closes the picker panel.
    pub fn close_panel(&mut self) -> Result<Commit, ControllerError> {
        self.guard()?;
        let commit = self.commit();
        self.busy = false;
        Ok(commit)
    }

    /// Replace the bound value wholesale, e.g. when a different record is
    /// loaded. Never prompts; always-selected defaults are re-applied.
    pub fn replace_value(&mut self, values: &[String]) -> Result<Commit, ControllerError> {
        self.guard()?;
        self.selection = Selection::from_values(&self.index, values);
        self.selection.initialize_default_values(&self.index);
        let commit = self.commit();
        self.busy = false;
        Ok(commit)
    }

    /// Check a single option.
    ///
    /// Missing transitive requirements raise one confirmation listing them;
    /// accepting adds them, cancelling keeps just the checked option.
    pub async fn check_option(&mut self, id: &str) -> Result<Commit, ControllerError> {
        self.guard()?;
        let result = self.check_option_inner(id).await;
        self.busy = false;
        result
    }

    /// Uncheck a single option.
    ///
    /// If anything still selected requires the option, one confirmation is
    /// raised: primary reverts the uncheck, the caller-supplied secondary
    /// action (if any) applies a replacement set instead, cancel lets the
    /// uncheck stand.
    pub async fn uncheck_option(
        &mut self,
        id: &str,
        secondary: Option<SecondaryAction>,
    ) -> Result<Commit, ControllerError> {
        self.guard()?;
        let result = self.uncheck_option_inner(id, secondary).await;
        self.busy = false;
        result
    }

    /// Expand a fully selected group into individually selected children
    /// without dropping any of them. Never prompts; coverage is unchanged.
    pub fn materialize_group(&mut self, group_id: &str) -> Result<Commit, ControllerError> {
        self.guard()?;
        let result = self.materialize_group_inner(group_id);
        self.busy = false;
        result
    }

    /// Switch a fully selected group to one specific child option.
    ///
    /// Siblings that something still depends on raise a confirmation first
    /// (revert / keep only the required ones / drop them all); afterwards the
    /// chosen option's own requirements are resolved like a plain check.
    pub async fn demote_group(
        &mut self,
        group_id: &str,
        chosen_id: &str,
    ) -> Result<Commit, ControllerError> {
        self.guard()?;
        let result = self.demote_group_inner(group_id, chosen_id).await;
        self.busy = false;
        result
    }

    /// Switch a group to its ALL state.
    ///
    /// Requirements of the group's options that live outside the group are
    /// collected into one consolidated confirmation.
    pub async fn set_group_all(&mut self, group_id: &str) -> Result<Commit, ControllerError> {
        self.guard()?;
        let result = self.set_group_all_inner(group_id).await;
        self.busy = false;
        result
    }

    /// Switch a group to its NONE state.
    ///
    /// Options dropped by the clear that are still required elsewhere raise
    /// one consolidated confirmation with a "keep only the required ones"
    /// resolution.
    pub async fn set_group_none(&mut self, group_id: &str) -> Result<Commit, ControllerError> {
        self.guard()?;
        let result = self.set_group_none_inner(group_id).await;
        self.busy = false;
        result
    }

    async fn check_option_inner(&mut self, id: &str) -> Result<Commit, ControllerError> {
        let option = self.option_handle(id)?;
        let missing = graph::missing_requirements(&self.index, &self.selection, option);

        // The triggering check always stands; only the extra requirements
        // are up for confirmation.
        self.selection.insert(SelectionEntry::Option(option));

        if !missing.is_empty() {
            let request = self.requirements_request(&self.option_label(option), &missing);
            match self.ask(request).await {
                PromptResponse::Primary => {
                    self.selection.add_options(&self.index, &missing);
                }
                PromptResponse::Secondary | PromptResponse::Cancel => {}
            }
        }

        Ok(self.commit())
    }

    async fn uncheck_option_inner(
        &mut self,
        id: &str,
        secondary: Option<SecondaryAction>,
    ) -> Result<Commit, ControllerError> {
        let option = self.option_handle(id)?;
        let entry = self.index.option(option);

        if entry.always_selected {
            debug!(option = %entry.id, "ignoring uncheck of always-selected option");
            return Ok(self.commit());
        }
        if self.selection.contains(SelectionEntry::GroupAll(entry.group)) {
            return Err(ControllerError::CoveredByGroup {
                option: entry.id.clone(),
                group: self.index.group(entry.group).id.clone(),
            });
        }

        let before = self.selection.clone();
        self.selection.remove(SelectionEntry::Option(option));

        let dependents = graph::required_by(&self.index, &self.selection, option);
        if !dependents.is_empty() {
            let secondary_token = secondary.as_ref().map(|action| action.label_token.clone());
            let request = self.dependents_request(
                &self.option_label(option),
                &dependents,
                secondary_token.as_deref(),
            );
            match self.ask(request).await {
                PromptResponse::Primary => {
                    // Revert the uncheck exactly.
                    self.selection = before;
                }
                PromptResponse::Secondary => {
                    if let Some(action) = secondary {
                        let entries = Selection::resolve_values(&self.index, &action.replacement);
                        self.selection.add_entries(&self.index, entries);
                    }
                }
                PromptResponse::Cancel => {}
            }
        }

        Ok(self.commit())
    }

    fn materialize_group_inner(&mut self, group_id: &str) -> Result<Commit, ControllerError> {
        let group = self.group_handle(group_id)?;
        if !self.selection.contains(SelectionEntry::GroupAll(group)) {
            return Err(ControllerError::NotFullySelected(
                self.index.group(group).id.clone(),
            ));
        }
        self.selection.materialize_group(&self.index, group);
        Ok(self.commit())
    }

    async fn demote_group_inner(
        &mut self,
        group_id: &str,
        chosen_id: &str,
    ) -> Result<Commit, ControllerError> {
        let group = self.group_handle(group_id)?;
        let chosen = self.option_handle(chosen_id)?;
        if self.index.option(chosen).group != group {
            return Err(ControllerError::NotInGroup {
                option: chosen_id.to_string(),
                group: group_id.to_string(),
            });
        }
        if !self.selection.contains(SelectionEntry::GroupAll(group)) {
            return Err(ControllerError::NotFullySelected(
                self.index.group(group).id.clone(),
            ));
        }

        let before = self.selection.clone();

        // Impact is computed while the ALL sentinel is still in place, so
        // sibling dependencies within the group surface as well.
        let impact = graph::group_demotion_impact(&self.index, &self.selection, group, chosen);

        self.selection.remove(SelectionEntry::GroupAll(group));
        self.selection.insert(SelectionEntry::Option(chosen));

        let mut reverted = false;
        if !impact.dependents.is_empty() {
            let request = self.dependents_request(
                &self.group_label(group),
                &impact.dependents,
                Some(tokens::BUTTON_KEEP_REQUIRED),
            );
            match self.ask(request).await {
                PromptResponse::Primary => {
                    self.selection = before;
                    reverted = true;
                }
                PromptResponse::Secondary => {
                    self.selection
                        .add_options(&self.index, &impact.required_group_options);
                }
                PromptResponse::Cancel => {}
            }
        }

        // A demotion can surface new requirements for the surviving child.
        if !reverted {
            let missing = graph::missing_requirements(&self.index, &self.selection, chosen);
            if !missing.is_empty() {
                let request = self.requirements_request(&self.option_label(chosen), &missing);
                match self.ask(request).await {
                    PromptResponse::Primary => {
                        self.selection.add_options(&self.index, &missing);
                    }
                    PromptResponse::Secondary | PromptResponse::Cancel => {}
                }
            }
        }

        Ok(self.commit())
    }

    async fn set_group_all_inner(&mut self, group_id: &str) -> Result<Commit, ControllerError> {
        let group = self.group_handle(group_id)?;
        self.selection.set_group_all(&self.index, group);

        // With the ALL sentinel applied the group's own options count as
        // satisfied; what remains are requirements in other groups.
        let members = self.index.group(group).options.clone();
        let missing = graph::missing_requirements_batch(&self.index, &self.selection, &members);

        if !missing.is_empty() {
            let request = self.requirements_request(&self.group_label(group), &missing);
            match self.ask(request).await {
                PromptResponse::Primary => {
                    self.selection.add_options(&self.index, &missing);
                }
                PromptResponse::Secondary | PromptResponse::Cancel => {}
            }
        }

        Ok(self.commit())
    }

    async fn set_group_none_inner(&mut self, group_id: &str) -> Result<Commit, ControllerError> {
        let group = self.group_handle(group_id)?;
        let before = self.selection.clone();

        // Everything the clear drops, whether selected individually or
        // covered by the ALL sentinel.
        let dropped: Vec<OptionId> =
            if self.selection.contains(SelectionEntry::GroupAll(group)) {
                self.index.group(group).options.clone()
            } else {
                self.selection.selected_options(&self.index, group)
            };

        self.selection.set_group_none(&self.index, group);

        let mut retained: Vec<OptionId> = Vec::new();
        let mut dependents: Vec<Dependent> = Vec::new();
        for &option in &dropped {
            let deps = graph::required_by(&self.index, &self.selection, option);
            if deps.is_empty() {
                continue;
            }
            retained.push(option);
            for dependent in deps {
                if !dependents.contains(&dependent) {
                    dependents.push(dependent);
                }
            }
        }

        if !dependents.is_empty() {
            let request = self.dependents_request(
                &self.group_label(group),
                &dependents,
                Some(tokens::BUTTON_KEEP_REQUIRED),
            );
            match self.ask(request).await {
                PromptResponse::Primary => {
                    self.selection = before;
                }
                PromptResponse::Secondary => {
                    self.selection.add_options(&self.index, &retained);
                }
                PromptResponse::Cancel => {}
            }
        }

        Ok(self.commit())
    }

    fn guard(&mut self) -> Result<(), ControllerError> {
        if self.busy {
            return Err(ControllerError::Busy);
        }
        self.busy = true;
        Ok(())
    }

    fn commit(&mut self) -> Commit {
        self.selection.normalize(&self.index);
        let value = self.selection.to_values(&self.index);
        let changed = value != self.last_value;
        if changed {
            debug!(values = value.len(), "selection committed");
            self.last_value = value.clone();
        }
        Commit { value, changed }
    }

    async fn ask(&self, request: PromptRequest) -> PromptResponse {
        let has_secondary = request.buttons.secondary.is_some();
        debug!(title = %request.title, items = request.items.len(), "awaiting confirmation");
        let response = self.dialog.confirm(request).await;
        match response {
            PromptResponse::Secondary if !has_secondary => {
                warn!("secondary response without a secondary button, treating as cancel");
                PromptResponse::Cancel
            }
            other => other,
        }
    }

    fn option_handle(&self, id: &str) -> Result<OptionId, ControllerError> {
        self.index
            .option_id(id)
            .ok_or_else(|| ControllerError::UnknownOption(id.to_string()))
    }

    fn group_handle(&self, id: &str) -> Result<GroupId, ControllerError> {
        self.index
            .group_id(id)
            .ok_or_else(|| ControllerError::UnknownGroup(id.to_string()))
    }

    fn option_label(&self, option: OptionId) -> String {
        self.labels.translate(&self.index.option(option).label, &[])
    }

    fn group_label(&self, group: GroupId) -> String {
        self.labels.translate(&self.index.group(group).label, &[])
    }

    fn dependent_label(&self, dependent: Dependent) -> String {
        match dependent {
            Dependent::Option(option) => self.option_label(option),
            Dependent::Group(group) => self.group_label(group),
        }
    }

    fn requirements_request(&self, trigger: &str, missing: &[OptionId]) -> PromptRequest {
        PromptRequest {
            title: self
                .labels
                .translate(tokens::REQUIREMENTS_TITLE, &[("label", trigger)]),
            items: missing.iter().map(|&o| self.option_label(o)).collect(),
            buttons: PromptButtons {
                primary: self.labels.translate(tokens::BUTTON_ADD, &[]),
                secondary: None,
                cancel: self.labels.translate(tokens::BUTTON_CANCEL, &[]),
            },
        }
    }

    fn dependents_request(
        &self,
        trigger: &str,
        dependents: &[Dependent],
        secondary_token: Option<&str>,
    ) -> PromptRequest {
        PromptRequest {
            title: self
                .labels
                .translate(tokens::DEPENDENTS_TITLE, &[("label", trigger)]),
            items: dependents
                .iter()
                .map(|&dependent| self.dependent_label(dependent))
                .collect(),
            buttons: PromptButtons {
                primary: self.labels.translate(tokens::BUTTON_REVERT, &[]),
                secondary: secondary_token
                    .map(|token| self.labels.translate(token, &[])),
                cancel: self.labels.translate(tokens::BUTTON_CANCEL, &[]),
            },
        }
    }
}
