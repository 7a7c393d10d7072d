// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;

use crate::controller::{PromptRequest, PromptResponse};

/// Presents a confirmation prompt to the user and resolves their decision.
///
/// The engine opens at most one prompt at a time per control instance and
/// awaits the response before processing further interactions. Item order in
/// the request is display order and must be preserved. A dismissed or
/// cancelled prompt must resolve to [`PromptResponse::Cancel`] and carry no
/// side effects.
#[async_trait]
pub trait ConfirmationDialog: Send + Sync {
    async fn confirm(&self, request: PromptRequest) -> PromptResponse;
}
