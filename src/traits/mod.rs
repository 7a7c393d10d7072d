// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contracts for the external collaborators of the engine.

mod dialog;
mod labels;

pub use dialog::ConfirmationDialog;
pub use labels::{IdentityLabels, LabelResolver};
