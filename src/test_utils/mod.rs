// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted collaborators and catalog fixtures for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::catalog::{GroupDef, OptionDef};
use crate::controller::{PromptRequest, PromptResponse};
use crate::traits::{ConfirmationDialog, LabelResolver};

#[derive(Debug, Default)]
struct ScriptedDialogInner {
    responses: Mutex<VecDeque<PromptResponse>>,
    requests: Mutex<Vec<PromptRequest>>,
}

/// Dialog fake answering prompts from a pre-recorded script.
///
/// Clones share the same script and request log, so a test can keep one
/// clone for assertions after moving the other into a controller. Receiving
/// more prompts than scripted responses panics, which doubles as the
/// assertion that an interaction must not prompt.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDialog {
    inner: Arc<ScriptedDialogInner>,
}

impl ScriptedDialog {
    pub fn new<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = PromptResponse>,
    {
        Self {
            inner: Arc::new(ScriptedDialogInner {
                responses: Mutex::new(responses.into_iter().collect()),
                requests: Mutex::new(Vec::new()),
            }),
        }
    }

    /// A dialog that panics on any prompt.
    pub fn silent() -> Self {
        Self::new([])
    }

    /// All requests received so far, in order.
    pub fn requests(&self) -> Vec<PromptRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    /// Number of scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.inner.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl ConfirmationDialog for ScriptedDialog {
    async fn confirm(&self, request: PromptRequest) -> PromptResponse {
        self.inner.requests.lock().unwrap().push(request);
        self.inner
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected confirmation prompt")
    }
}

/// Label resolver backed by a static token map with `{param}` substitution.
#[derive(Clone, Debug, Default)]
pub struct StaticLabels {
    entries: HashMap<String, String>,
}

impl StaticLabels {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl LabelResolver for StaticLabels {
    fn translate(&self, token: &str, params: &[(&str, &str)]) -> String {
        let mut text = match self.entries.get(token) {
            Some(text) => text.clone(),
            None => return token.to_string(),
        };
        for (name, value) in params {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}

/// Catalog modeled on a case management permission picker: a cases group
/// with a view/edit/delete requirement chain and a reports group depending
/// into it.
pub fn case_management_catalog() -> Vec<GroupDef> {
    vec![
        GroupDef::new("perm_cases", "Cases")
            .option(OptionDef::new("perm_case_view", "View cases"))
            .option(
                OptionDef::new("perm_case_edit", "Edit cases").with_requires(["perm_case_view"]),
            )
            .option(
                OptionDef::new("perm_case_delete", "Delete cases")
                    .with_requires(["perm_case_edit"]),
            ),
        GroupDef::new("perm_reports", "Reports")
            .option(
                OptionDef::new("perm_report_export", "Export reports")
                    .with_requires(["perm_case_view"]),
            )
            .option(OptionDef::new("perm_report_share", "Share reports")),
    ]
}
