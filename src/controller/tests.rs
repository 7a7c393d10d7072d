// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::controller::{PromptResponse, SecondaryAction, SelectionController, tokens};
use crate::entry::GroupSelectionState;
use crate::index::GroupIndex;
use crate::test_utils::{ScriptedDialog, StaticLabels, case_management_catalog};
use crate::traits::IdentityLabels;
use crate::{ControllerError, GroupDef, OptionDef};

type TestController = SelectionController<ScriptedDialog, IdentityLabels>;

/// Controller over the case management fixture with a scripted dialog. The
/// returned dialog clone shares the request log for assertions.
fn controller<I>(script: I) -> (TestController, ScriptedDialog)
where
    I: IntoIterator<Item = PromptResponse>,
{
    let dialog = ScriptedDialog::new(script);
    let handle = dialog.clone();
    let index = GroupIndex::build(&case_management_catalog());
    (SelectionController::new(index, dialog, IdentityLabels), handle)
}

#[tokio::test]
async fn checking_with_missing_requirements_prompts_and_accepts() {
    let (mut controller, dialog) = controller([PromptResponse::Primary]);

    // Delete transitively requires edit and view, none of which are
    // selected yet.
    let commit = controller.check_option("perm_case_delete").await.unwrap();

    let requests = dialog.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].items, vec!["Edit cases", "View cases"]);
    assert!(requests[0].buttons.secondary.is_none());

    assert!(commit.changed);
    assert_eq!(commit.value, vec![
        "perm_case_view",
        "perm_case_edit",
        "perm_case_delete",
    ]);

    // Three of three options selected individually keeps the group partial.
    assert_eq!(
        controller.group_state("perm_cases").unwrap(),
        GroupSelectionState::Partial
    );
}

#[tokio::test]
async fn cancelling_requirements_keeps_the_triggering_check() {
    let (mut controller, dialog) = controller([PromptResponse::Cancel]);

    let commit = controller.check_option("perm_case_delete").await.unwrap();

    assert_eq!(dialog.requests().len(), 1);
    assert!(commit.changed);
    assert_eq!(commit.value, vec!["perm_case_delete"]);
}

#[tokio::test]
async fn checking_satisfied_requirements_never_prompts() {
    let (mut controller, _dialog) = controller([]);

    controller
        .replace_value(&["perm_case_view".to_string()])
        .unwrap();

    // Edit only requires view, which is already selected; the silent dialog
    // would panic on any prompt.
    let commit = controller.check_option("perm_case_edit").await.unwrap();
    assert_eq!(commit.value, vec!["perm_case_view", "perm_case_edit"]);
}

#[tokio::test]
async fn rechecking_an_option_is_idempotent() {
    let (mut controller, _dialog) = controller([]);

    controller
        .replace_value(&["perm_case_view".to_string()])
        .unwrap();
    let commit = controller.check_option("perm_case_view").await.unwrap();

    assert!(!commit.changed);
    assert_eq!(commit.value, vec!["perm_case_view"]);
}

#[tokio::test]
async fn unchecking_a_required_option_can_revert() {
    let (mut controller, dialog) = controller([PromptResponse::Primary]);

    controller
        .replace_value(&["perm_case_view".to_string(), "perm_case_edit".to_string()])
        .unwrap();

    // Edit still requires view, so the uncheck offers a revert.
    let commit = controller.uncheck_option("perm_case_view", None).await.unwrap();

    let requests = dialog.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].items, vec!["Edit cases"]);

    assert!(!commit.changed);
    assert_eq!(commit.value, vec!["perm_case_view", "perm_case_edit"]);
}

#[tokio::test]
async fn cancelled_dependents_prompt_lets_the_uncheck_stand() {
    let (mut controller, _dialog) = controller([PromptResponse::Cancel]);

    controller
        .replace_value(&["perm_case_view".to_string(), "perm_case_edit".to_string()])
        .unwrap();

    let commit = controller.uncheck_option("perm_case_view", None).await.unwrap();

    assert!(commit.changed);
    assert_eq!(commit.value, vec!["perm_case_edit"]);
}

#[tokio::test]
async fn uncheck_secondary_action_applies_replacement() {
    let (mut controller, dialog) = controller([PromptResponse::Secondary]);

    controller
        .replace_value(&[
            "perm_case_view".to_string(),
            "perm_case_edit".to_string(),
            "perm_case_delete".to_string(),
        ])
        .unwrap();

    let commit = controller
        .uncheck_option(
            "perm_case_edit",
            Some(SecondaryAction {
                label_token: tokens::BUTTON_KEEP_REQUIRED.to_string(),
                replacement: vec!["perm_report_share".to_string()],
            }),
        )
        .await
        .unwrap();

    let requests = dialog.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].items, vec!["Delete cases"]);
    assert!(requests[0].buttons.secondary.is_some());

    // The uncheck stands and the replacement set is added on top.
    assert_eq!(commit.value, vec![
        "perm_case_view",
        "perm_case_delete",
        "perm_report_share",
    ]);
}

#[tokio::test]
async fn unchecking_under_group_all_is_rejected() {
    let (mut controller, _dialog) = controller([]);

    controller.replace_value(&["perm_cases".to_string()]).unwrap();

    let error = controller
        .uncheck_option("perm_case_view", None)
        .await
        .unwrap_err();
    assert!(matches!(error, ControllerError::CoveredByGroup { .. }));
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn materialize_then_uncheck_prompts_dependents() {
    let (mut controller, dialog) = controller([PromptResponse::Primary]);

    controller.replace_value(&["perm_cases".to_string()]).unwrap();

    // Expanding ALL materializes every child individually.
    let commit = controller.materialize_group("perm_cases").unwrap();
    assert_eq!(commit.value, vec![
        "perm_case_view",
        "perm_case_edit",
        "perm_case_delete",
    ]);

    // Now the uncheck reaches the individual option and finds its
    // dependent.
    let commit = controller.uncheck_option("perm_case_view", None).await.unwrap();
    assert_eq!(dialog.requests()[0].items, vec!["Edit cases"]);
    assert_eq!(commit.value, vec![
        "perm_case_view",
        "perm_case_edit",
        "perm_case_delete",
    ]);
}

#[tokio::test]
async fn demotion_keep_required_retains_dependency_chain() {
    let (mut controller, dialog) = controller([PromptResponse::Secondary]);

    controller.replace_value(&["perm_cases".to_string()]).unwrap();

    let commit = controller
        .demote_group("perm_cases", "perm_case_delete")
        .await
        .unwrap();

    // View and edit are still required (by the group's own chain), so the
    // keep-required resolution carries them over; afterwards delete's own
    // requirements are already satisfied and no second prompt appears.
    assert_eq!(dialog.requests().len(), 1);
    assert!(dialog.requests()[0].buttons.secondary.is_some());
    assert_eq!(commit.value, vec![
        "perm_case_view",
        "perm_case_edit",
        "perm_case_delete",
    ]);
    assert_eq!(
        controller.group_state("perm_cases").unwrap(),
        GroupSelectionState::Partial
    );
}

#[tokio::test]
async fn demotion_drop_then_requirements_chain() {
    let (mut controller, dialog) = controller([
        // Drop the siblings entirely...
        PromptResponse::Cancel,
        // ...which immediately surfaces delete's missing requirements.
        PromptResponse::Primary,
    ]);

    controller.replace_value(&["perm_cases".to_string()]).unwrap();

    let commit = controller
        .demote_group("perm_cases", "perm_case_delete")
        .await
        .unwrap();

    let requests = dialog.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].items, vec!["Edit cases", "View cases"]);

    assert_eq!(commit.value, vec![
        "perm_case_view",
        "perm_case_edit",
        "perm_case_delete",
    ]);
}

#[tokio::test]
async fn demotion_revert_restores_the_all_state() {
    let (mut controller, dialog) = controller([PromptResponse::Primary]);

    controller.replace_value(&["perm_cases".to_string()]).unwrap();

    let commit = controller
        .demote_group("perm_cases", "perm_case_delete")
        .await
        .unwrap();

    // Reverting restores ALL exactly; the chained requirements check is
    // skipped because nothing was demoted.
    assert_eq!(dialog.requests().len(), 1);
    assert!(!commit.changed);
    assert_eq!(commit.value, vec!["perm_cases"]);
    assert_eq!(
        controller.group_state("perm_cases").unwrap(),
        GroupSelectionState::All
    );
}

#[tokio::test]
async fn demoting_a_group_that_is_not_all_is_rejected() {
    let (mut controller, _dialog) = controller([]);

    let error = controller
        .demote_group("perm_cases", "perm_case_view")
        .await
        .unwrap_err();
    assert!(matches!(error, ControllerError::NotFullySelected(_)));

    let error = controller
        .demote_group("perm_cases", "perm_report_share")
        .await
        .unwrap_err();
    assert!(matches!(error, ControllerError::NotInGroup { .. }));
}

#[tokio::test]
async fn group_all_consolidates_outside_requirements() {
    let (mut controller, dialog) = controller([PromptResponse::Primary]);

    // Export requires a cases option; share requires nothing. One
    // consolidated prompt covers the whole group switch.
    let commit = controller.set_group_all("perm_reports").await.unwrap();

    let requests = dialog.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].items, vec!["View cases"]);

    assert_eq!(commit.value, vec!["perm_reports", "perm_case_view"]);
    assert_eq!(
        controller.group_state("perm_reports").unwrap(),
        GroupSelectionState::All
    );
}

#[tokio::test]
async fn group_internal_requirements_never_prompt_on_all() {
    let (mut controller, _dialog) = controller([]);

    // The view/edit/delete chain lives entirely inside the group; the ALL
    // sentinel satisfies it without a prompt.
    let commit = controller.set_group_all("perm_cases").await.unwrap();
    assert_eq!(commit.value, vec!["perm_cases"]);
}

#[tokio::test]
async fn group_none_offers_keep_required() {
    let (mut controller, dialog) = controller([PromptResponse::Secondary]);

    controller
        .replace_value(&["perm_reports".to_string(), "perm_case_view".to_string()])
        .unwrap();

    // Clearing the cases group would drop view, which the fully selected
    // reports group still requires.
    let commit = controller.set_group_none("perm_cases").await.unwrap();

    let requests = dialog.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].items, vec!["Reports"]);

    assert!(!commit.changed);
    assert_eq!(commit.value, vec!["perm_reports", "perm_case_view"]);
}

#[tokio::test]
async fn group_none_clear_stands_on_cancel() {
    let (mut controller, _dialog) = controller([PromptResponse::Cancel]);

    controller
        .replace_value(&["perm_reports".to_string(), "perm_case_view".to_string()])
        .unwrap();

    let commit = controller.set_group_none("perm_cases").await.unwrap();
    assert_eq!(commit.value, vec!["perm_reports"]);
    assert_eq!(
        controller.group_state("perm_cases").unwrap(),
        GroupSelectionState::None
    );
}

#[tokio::test]
async fn group_all_then_none_round_trips() {
    let (mut controller, _dialog) = controller([PromptResponse::Cancel]);

    // Accepting nothing extra on the way up keeps the round trip clean.
    controller.set_group_all("perm_reports").await.unwrap();
    let commit = controller.set_group_none("perm_reports").await.unwrap();

    assert_eq!(commit.value, Vec::<String>::new());
    assert_eq!(
        controller.group_state("perm_reports").unwrap(),
        GroupSelectionState::None
    );
}

#[tokio::test]
async fn replace_value_applies_defaults_without_prompting() {
    let index = GroupIndex::build(&[
        GroupDef::new("perm_cases", "Cases")
            .option(OptionDef::new("perm_case_view", "View cases").always_selected())
            .option(
                OptionDef::new("perm_case_edit", "Edit cases")
                    .with_requires(["perm_case_view"]),
            ),
    ]);
    let mut controller = SelectionController::new(index, ScriptedDialog::silent(), IdentityLabels);

    // A freshly constructed controller already carries the default.
    assert_eq!(controller.value(), vec!["perm_case_view"]);

    // Loading a record that lost the default re-inserts it, silently.
    let commit = controller
        .replace_value(&["perm_case_edit".to_string()])
        .unwrap();
    assert_eq!(commit.value, vec!["perm_case_view", "perm_case_edit"]);

    // And normal toggling cannot remove it.
    let commit = controller.uncheck_option("perm_case_view", None).await.unwrap();
    assert!(!commit.changed);
    assert_eq!(commit.value, vec!["perm_case_view", "perm_case_edit"]);
}

#[tokio::test]
async fn stray_secondary_response_is_treated_as_cancel() {
    // The requirements prompt has no secondary button; a scripted secondary
    // answer degrades to cancel and only the check itself applies.
    let (mut controller, dialog) = controller([PromptResponse::Secondary]);

    let commit = controller.check_option("perm_case_delete").await.unwrap();

    assert!(dialog.requests()[0].buttons.secondary.is_none());
    assert_eq!(commit.value, vec!["perm_case_delete"]);
}

#[tokio::test]
async fn panel_projection_round_trip() {
    let (mut controller, _dialog) = controller([]);

    controller
        .replace_value(&["perm_case_view".to_string()])
        .unwrap();

    let display = controller.open_panel().unwrap();
    let partial = controller
        .index()
        .group(controller.index().group_id("perm_cases").unwrap())
        .partial_sentinel
        .clone();
    let none = controller
        .index()
        .group(controller.index().group_id("perm_reports").unwrap())
        .none_sentinel
        .clone();
    assert_eq!(display, vec![partial, "perm_case_view".to_string(), none]);

    // Closing strips the generated sentinels back out of the emitted value.
    let commit = controller.close_panel().unwrap();
    assert!(!commit.changed);
    assert_eq!(commit.value, vec!["perm_case_view"]);
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn prompt_text_runs_through_the_label_resolver() {
    let labels = StaticLabels::new([
        (tokens::REQUIREMENTS_TITLE, "{label} needs more permissions"),
        (tokens::BUTTON_ADD, "Add them"),
        (tokens::BUTTON_CANCEL, "Leave it"),
    ]);
    let dialog = ScriptedDialog::new([PromptResponse::Primary]);
    let handle = dialog.clone();
    let index = GroupIndex::build(&case_management_catalog());
    let mut controller = SelectionController::new(index, dialog, labels);

    controller.check_option("perm_case_delete").await.unwrap();

    let request = &handle.requests()[0];
    assert_eq!(request.title, "Delete cases needs more permissions");
    assert_eq!(request.buttons.primary, "Add them");
    assert_eq!(request.buttons.cancel, "Leave it");
}
