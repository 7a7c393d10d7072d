// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value types exchanged with the confirmation dialog collaborator.

use serde::{Deserialize, Serialize};

/// Translation tokens used to assemble prompt text.
///
/// Hosts provide translations for these through their
/// [`LabelResolver`](crate::traits::LabelResolver); the `label` param carries
/// the display label of the option or group that triggered the prompt.
pub mod tokens {
    /// Title of the "this option needs further options" prompt.
    pub const REQUIREMENTS_TITLE: &str = "multiselect.prompt.requirements.title";

    /// Title of the "this option is still needed" prompt.
    pub const DEPENDENTS_TITLE: &str = "multiselect.prompt.dependents.title";

    pub const BUTTON_ADD: &str = "multiselect.prompt.button.add";
    pub const BUTTON_REVERT: &str = "multiselect.prompt.button.revert";
    pub const BUTTON_KEEP_REQUIRED: &str = "multiselect.prompt.button.keep_required";
    pub const BUTTON_CANCEL: &str = "multiselect.prompt.button.cancel";
}

/// Button captions for a prompt. `secondary` is only present when the
/// interaction offers a third resolution besides accept and cancel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptButtons {
    pub primary: String,
    pub secondary: Option<String>,
    pub cancel: String,
}

/// A fully rendered confirmation prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub title: String,

    /// Affected labels in display order.
    pub items: Vec<String>,

    pub buttons: PromptButtons,
}

/// The user's decision for a prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptResponse {
    /// The primary button was pressed.
    Primary,

    /// The secondary button was pressed. Only valid for prompts that carried
    /// a secondary caption; the controller treats a stray secondary answer
    /// as a cancellation.
    Secondary,

    /// The prompt was cancelled or dismissed.
    Cancel,
}

/// A caller-supplied third resolution for an uncheck prompt, applied instead
/// of a plain revert when the user picks the secondary button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecondaryAction {
    /// Translation token for the secondary button caption.
    pub label_token: String,

    /// External ids added to the selection when the action is chosen.
    pub replacement: Vec<String>,
}
